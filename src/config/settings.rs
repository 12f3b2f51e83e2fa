use crate::dim::formatter::DEFAULT_SIGNIFICANT_DIGITS;
use crate::dim::validator::dimension_by_name;
use crate::dim::{Unit, UnitPreferences};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    // Preferred display unit per named dimension, e.g. power = "GW"
    #[serde(default)]
    pub units: HashMap<String, Unit>,

    // Preferred display unit per result name
    #[serde(default)]
    pub results: HashMap<String, Unit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_significant_digits")]
    pub significant_digits: usize,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            significant_digits: default_significant_digits(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_significant_digits() -> usize {
    DEFAULT_SIGNIFICANT_DIGITS
}

impl Config {
    pub fn load_from_file<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self {
            output: OutputConfig::default(),
            units: HashMap::new(),
            results: HashMap::new(),
        }
    }

    /// Reject settings that can never apply; unknown dimension names only warn.
    /// Unit strings themselves are checked while deserializing.
    fn check(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.output.significant_digits == 0 || self.output.significant_digits > 17 {
            return Err(format!(
                "output.significant_digits must be between 1 and 17, got {}",
                self.output.significant_digits
            )
            .into());
        }

        for (dimension, unit) in &self.units {
            match dimension_by_name(dimension) {
                Some(expected) if expected != unit.dimension() => {
                    return Err(format!(
                        "units.{}: '{}' is not a unit of {}",
                        dimension, unit, dimension
                    )
                    .into());
                }
                Some(_) => {}
                None => log::warn!("Unknown dimension '{}' in [units]", dimension),
            }
        }

        Ok(())
    }

    pub fn unit_preferences(&self) -> UnitPreferences {
        UnitPreferences {
            overrides: self.results.clone(),
            dimensions: self.units.clone(),
            significant_digits: self.output.significant_digits,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::empty();
        assert_eq!(config.output.significant_digits, 5);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.unit_preferences().dimensions.is_empty());
    }

    #[test]
    fn test_load_config() {
        let file = write_config(
            r#"
[output]
significant_digits = 3
format = "json"

[units]
power = "MW"
mass_rate = "t/yr"

[results]
max_deployment_rate_pem_anode = "MW/d"
"#,
        );
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);

        let preferences = config.unit_preferences();
        assert_eq!(preferences.significant_digits, 3);
        assert_eq!(preferences.dimensions["power"].to_string(), "MW");
        assert_eq!(
            preferences.overrides["max_deployment_rate_pem_anode"].to_string(),
            "MW/d"
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = write_config("[units]\ntime = \"d\"\n");
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.output.significant_digits, 5);
        assert_eq!(config.units["time"].to_string(), "d");
    }

    #[test]
    fn test_unknown_dimension_is_tolerated() {
        let file = write_config("[units]\nwarp_factor = \"GW\"\n");
        assert!(Config::load_from_file(file.path()).is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let wrong_dimension = write_config("[units]\npower = \"kg\"\n");
        let err = Config::load_from_file(wrong_dimension.path()).unwrap_err();
        assert!(err.to_string().contains("not a unit of power"));

        let unknown_unit = write_config("[results]\nx = \"furlong\"\n");
        let err = Config::load_from_file(unknown_unit.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown unit: furlong"));

        let zero_digits = write_config("[output]\nsignificant_digits = 0\n");
        assert!(Config::load_from_file(zero_digits.path()).is_err());

        let bad_format = write_config("[output]\nformat = \"yaml\"\n");
        assert!(Config::load_from_file(bad_format.path()).is_err());
    }
}
