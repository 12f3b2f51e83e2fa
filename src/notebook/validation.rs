use std::fmt;

/// Problems found while loading a notebook
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub location: Option<IssueLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Notebook entry an issue refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLocation {
    /// Field of the n-th `[[constant]]` table, before the entry is accepted
    ConstantEntry { index: usize, field: &'static str },
    /// Field of the n-th `[[problem]]` table, before the entry is accepted
    ProblemEntry { index: usize, field: &'static str },
    /// Key of the `[values]` table
    Value(String),
    Constant(String),
    Problem(String),
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLocation::ConstantEntry { index, field } => {
                write!(f, "constant[{}]/{}", index, field)
            }
            IssueLocation::ProblemEntry { index, field } => {
                write!(f, "problem[{}]/{}", index, field)
            }
            IssueLocation::Value(name) => write!(f, "values/{}", name),
            IssueLocation::Constant(name) => write!(f, "constant/{}", name),
            IssueLocation::Problem(name) => write!(f, "problem/{}", name),
        }
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: String, location: Option<IssueLocation>) {
        self.errors.push(ValidationIssue {
            severity: IssueSeverity::Error,
            message,
            location,
        });
    }

    pub fn add_warning(&mut self, message: String, location: Option<IssueLocation>) {
        self.warnings.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            message,
            location,
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    /// Send every issue to the logger at its severity
    pub fn log_issues(&self) {
        for issue in self.errors.iter().chain(&self.warnings) {
            match issue.severity {
                IssueSeverity::Error => log::error!("{}", issue),
                IssueSeverity::Warning => log::warn!("{}", issue),
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "[{}] {}", loc, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.errors.is_empty() {
            writeln!(f, "Errors:")?;
            for error in &self.errors {
                writeln!(f, "  {}", error)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }

        Ok(())
    }
}
