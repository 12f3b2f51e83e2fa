use crate::dim::{parse_quantity, NameResolver, Quantity};
use crate::notebook::Notebook;
use std::collections::HashMap;

/// Where a name was found during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    /// Command-line `--set name=value`
    Override,
    /// Result of an earlier problem
    Result,
    /// Notebook constant
    Constant,
}

fn default_scope_chain() -> Vec<ScopeLevel> {
    vec![ScopeLevel::Override, ScopeLevel::Result, ScopeLevel::Constant]
}

/// Named quantities visible to formulas, resolved through a scope chain
#[derive(Debug, Clone)]
pub struct Environment {
    overrides: HashMap<String, Quantity>,
    results: HashMap<String, Quantity>,
    constants: HashMap<String, Quantity>,
    chain: Vec<ScopeLevel>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            results: HashMap::new(),
            constants: HashMap::new(),
            chain: default_scope_chain(),
        }
    }

    pub fn from_notebook(notebook: &Notebook) -> Self {
        let mut env = Self::new();
        for constant in &notebook.constants {
            env.constants
                .insert(constant.name.clone(), constant.quantity.clone());
        }
        env
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, Quantity>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn bind_result(&mut self, name: &str, quantity: Quantity) {
        self.results.insert(name.to_string(), quantity);
    }

    pub fn resolve_with_scope(&self, name: &str) -> Option<(Quantity, ScopeLevel)> {
        // Walk the chain until a value is found
        for scope in &self.chain {
            let found = match scope {
                ScopeLevel::Override => self.overrides.get(name),
                ScopeLevel::Result => self.results.get(name),
                ScopeLevel::Constant => self.constants.get(name),
            };
            if let Some(quantity) = found {
                return Some((quantity.clone(), *scope));
            }
        }
        None
    }

    pub fn scope_chain(&self) -> &[ScopeLevel] {
        &self.chain
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver for Environment {
    fn resolve(&self, name: &str) -> Option<Quantity> {
        self.resolve_with_scope(name).map(|(quantity, scope)| {
            log::trace!("resolved '{}' from {:?} scope", name, scope);
            quantity
        })
    }
}

/// Parse a `name=value` override such as `platinum_loading=0.5 mg/cm^2`
pub fn parse_assignment(input: &str) -> Result<(String, Quantity), Box<dyn std::error::Error>> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{}'", input))?;

    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(format!("Invalid name '{}' in '{}'", name, input).into());
    }

    let quantity = parse_quantity(value.trim())?;
    Ok((name.to_string(), quantity))
}
