use crate::dim::units::lookup_atom;
use crate::dim::{parse_unit, Expression, UnitProcessor, UnitValue};
use crate::notebook::models::*;
use crate::notebook::validation::{IssueLocation, ValidationResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub fn load_notebook_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<(Notebook, ValidationResult), Box<dyn std::error::Error>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(format!("Notebook does not exist: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Notebook is not a file: {}", path.display()).into());
    }

    let content = fs::read_to_string(path)?;

    // Title falls back to the file stem ("pem.toml" -> "pem")
    let default_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("notebook");

    log::info!("Loading notebook from {}", path.display());
    load_notebook_from_str(&content, default_title)
}

/// Load a notebook from TOML text.
/// Malformed entries are reported in the validation result and left out.
pub fn load_notebook_from_str(
    content: &str,
    default_title: &str,
) -> Result<(Notebook, ValidationResult), Box<dyn std::error::Error>> {
    let file: NotebookFile = toml::from_str(content)?;
    let processor = UnitProcessor::new();
    let mut validation = ValidationResult::new();
    let mut constants = Vec::new();

    for (idx, entry) in file.constants.iter().enumerate() {
        let location = IssueLocation::ConstantEntry {
            index: idx,
            field: "value",
        };
        match processor.process_value(&entry.value) {
            Ok(UnitValue::Parsed(result)) => constants.push(Constant {
                name: entry.name.clone(),
                quantity: result.quantity,
                citation: entry.citation.clone(),
                note: entry.note.clone(),
            }),
            Ok(UnitValue::Unparsed(s)) => validation.add_error(
                format!("Constant '{}': value '{}' is not a quantity", entry.name, s),
                Some(location),
            ),
            Err(e) => validation.add_error(
                format!("Constant '{}': {}", entry.name, e),
                Some(location),
            ),
        }
    }

    for (name, value) in processor.process_table(&file.values) {
        let location = IssueLocation::Value(name.clone());
        match value {
            Ok(UnitValue::Parsed(result)) => constants.push(Constant {
                name,
                quantity: result.quantity,
                citation: None,
                note: None,
            }),
            Ok(UnitValue::Unparsed(s)) => validation.add_error(
                format!("Value '{}' = '{}' is not a quantity", name, s),
                Some(location),
            ),
            Err(e) => validation.add_error(format!("Value '{}': {}", name, e), Some(location)),
        }
    }

    let mut problems = Vec::new();
    for (idx, entry) in file.problems.iter().enumerate() {
        let expression = match Expression::parse(&entry.expression) {
            Ok(expression) => expression,
            Err(e) => {
                validation.add_error(
                    format!("Problem '{}': {}", entry.name, e),
                    Some(IssueLocation::ProblemEntry {
                        index: idx,
                        field: "expression",
                    }),
                );
                continue;
            }
        };
        let unit = match entry.unit.as_deref().map(parse_unit).transpose() {
            Ok(unit) => unit,
            Err(e) => {
                validation.add_error(
                    format!("Problem '{}': {}", entry.name, e),
                    Some(IssueLocation::ProblemEntry {
                        index: idx,
                        field: "unit",
                    }),
                );
                continue;
            }
        };
        problems.push(Problem {
            name: entry.name.clone(),
            title: entry.title.clone(),
            expression,
            unit,
        });
    }

    let notebook = Notebook {
        title: file.title.unwrap_or_else(|| default_title.to_string()),
        constants,
        problems,
    };

    validation.merge(validate_notebook(&notebook));

    Ok((notebook, validation))
}

/// Structural checks: unique names, straight-line references, citations
pub fn validate_notebook(notebook: &Notebook) -> ValidationResult {
    let mut validation = ValidationResult::new();
    let mut defined: HashSet<&str> = HashSet::new();
    let mut used: HashSet<String> = HashSet::new();

    for constant in &notebook.constants {
        if !defined.insert(&constant.name) {
            validation.add_error(
                format!("Duplicate name '{}'", constant.name),
                Some(IssueLocation::Constant(constant.name.clone())),
            );
        }
        if constant.citation.is_none() {
            validation.add_warning(
                format!("Constant '{}' has no citation", constant.name),
                Some(IssueLocation::Constant(constant.name.clone())),
            );
        }
    }

    let problem_names: HashSet<&str> = notebook.problems.iter().map(|p| p.name.as_str()).collect();

    for problem in &notebook.problems {
        for name in problem.expression.names() {
            // Notebook names shadow unit symbols, as in evaluation
            if defined.contains(name.as_str()) {
                used.insert(name);
                continue;
            }
            let message = if problem_names.contains(name.as_str()) {
                format!(
                    "Problem '{}' uses '{}' before it is computed",
                    problem.name, name
                )
            } else if lookup_atom(&name).is_some() {
                continue;
            } else {
                format!("Problem '{}' refers to undefined name '{}'", problem.name, name)
            };
            validation.add_error(message, Some(IssueLocation::Problem(problem.name.clone())));
        }

        if !defined.insert(&problem.name) {
            validation.add_error(
                format!("Duplicate name '{}'", problem.name),
                Some(IssueLocation::Problem(problem.name.clone())),
            );
        }
    }

    for constant in &notebook.constants {
        if !used.contains(&constant.name) {
            validation.add_warning(
                format!("Constant '{}' is not used by any problem", constant.name),
                Some(IssueLocation::Constant(constant.name.clone())),
            );
        }
    }

    validation
}
