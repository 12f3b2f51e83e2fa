use crate::dim::detector::looks_like_unit_string;
use crate::dim::error::DimError;
use crate::dim::parser::DimParser;
use crate::dim::quantity::Quantity;
use crate::dim::types::{UnitParseResult, UnitValue};
use std::collections::BTreeMap;
use toml::Value;

/// Turn TOML values from notebook files into quantities
#[derive(Debug, Default)]
pub struct UnitProcessor {
    parser: DimParser,
}

impl UnitProcessor {
    pub fn new() -> Self {
        Self {
            parser: DimParser::new(),
        }
    }

    /// Process a TOML value.
    /// Quantity strings are parsed (and must parse), bare numbers become pure numbers,
    /// everything else is kept as text.
    pub fn process_value(&self, value: &Value) -> Result<UnitValue, DimError> {
        match value {
            Value::String(s) => {
                if looks_like_unit_string(s) {
                    let result = self.parser.parse_unit_string(s.trim())?;
                    log::debug!("parsed '{}' as {}", s, result.quantity);
                    Ok(UnitValue::Parsed(result))
                } else {
                    // Plain numbers written as strings are still numbers
                    match s.trim().replace('_', "").parse::<f64>() {
                        Ok(n) => Ok(UnitValue::Parsed(UnitParseResult {
                            quantity: Quantity::scalar(n),
                            original: s.clone(),
                        })),
                        Err(_) => Ok(UnitValue::Unparsed(s.clone())),
                    }
                }
            }
            Value::Integer(i) => Ok(UnitValue::Parsed(UnitParseResult {
                quantity: Quantity::scalar(*i as f64),
                original: i.to_string(),
            })),
            Value::Float(f) => Ok(UnitValue::Parsed(UnitParseResult {
                quantity: Quantity::scalar(*f),
                original: f.to_string(),
            })),
            other => Ok(UnitValue::Unparsed(other.to_string())),
        }
    }

    /// Process a flat TOML table such as `[values]`, one result per key (sorted by key).
    /// A bad entry does not affect its neighbours.
    pub fn process_table(
        &self,
        table: &toml::map::Map<String, Value>,
    ) -> BTreeMap<String, Result<UnitValue, DimError>> {
        table
            .iter()
            .map(|(key, value)| (key.clone(), self.process_value(value)))
            .collect()
    }
}
