use crate::dim::{Expression, Quantity, Unit};
use serde::{Deserialize, Serialize};
use toml::Value;

/// Constant entry as written in a notebook file (`[[constant]]`)
#[derive(Debug, Clone, Deserialize)]
pub struct ConstantEntry {
    pub name: String,

    /// Quantity string such as "2e5 kg/yr", or a bare number
    pub value: Value,

    #[serde(default)]
    pub citation: Option<String>,

    #[serde(default)]
    pub note: Option<String>,
}

/// Problem entry as written in a notebook file (`[[problem]]`)
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemEntry {
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    pub expression: String,

    /// Unit the result is converted to
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotebookFile {
    #[serde(default)]
    pub title: Option<String>,

    // TOML uses [[constant]] / [[problem]] array syntax
    #[serde(rename = "constant", default)]
    pub constants: Vec<ConstantEntry>,

    #[serde(rename = "problem", default)]
    pub problems: Vec<ProblemEntry>,

    /// Shorthand `[values]` table for constants without citations
    #[serde(default)]
    pub values: toml::map::Map<String, Value>,
}

/// A named literal quantity and where it comes from
#[derive(Debug, Clone, Serialize)]
pub struct Constant {
    pub name: String,
    pub quantity: Quantity,
    pub citation: Option<String>,
    pub note: Option<String>,
}

/// A named formula whose result later problems may reuse by name
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub title: Option<String>,
    pub expression: Expression,
    pub unit: Option<Unit>,
}

impl Problem {
    pub fn title_display(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Notebook {
    pub title: String,
    pub constants: Vec<Constant>,
    pub problems: Vec<Problem>,
}

impl Notebook {
    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn problem(&self, name: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.name == name)
    }
}
