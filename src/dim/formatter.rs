use crate::dim::quantity::Quantity;
use crate::dim::types::Unit;
use crate::dim::validator::dimension_name;
use std::collections::HashMap;

pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 5;

/// Format quantities for console output, applying unit preferences
#[derive(Debug, Default)]
pub struct UnitFormatter {
    preferences: UnitPreferences,
}

/// Unit preferences for formatting
#[derive(Debug, Clone)]
pub struct UnitPreferences {
    /// Per-result overrides (highest priority)
    pub overrides: HashMap<String, Unit>, // result name -> unit
    /// Dimension-level defaults from config
    pub dimensions: HashMap<String, Unit>, // dimension name -> unit
    pub significant_digits: usize,
}

impl Default for UnitPreferences {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            dimensions: HashMap::new(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

impl UnitFormatter {
    pub fn new(preferences: UnitPreferences) -> Self {
        Self { preferences }
    }

    /// Express a quantity in its preferred unit.
    ///
    /// Precedence: per-name override, then dimension-level preference,
    /// then the unit the quantity already has. `pinned` quantities (results
    /// whose formula names an explicit unit) only honour per-name overrides.
    pub fn preferred(&self, name: Option<&str>, quantity: &Quantity, pinned: bool) -> Quantity {
        let preferred_unit = name
            .and_then(|n| self.preferences.overrides.get(n))
            .or_else(|| {
                if pinned {
                    return None;
                }
                dimension_name(&quantity.dimension())
                    .and_then(|dim| self.preferences.dimensions.get(dim))
            });

        let preferred_unit = match preferred_unit {
            Some(unit) => unit,
            None => return quantity.clone(),
        };

        match quantity.convert_to(preferred_unit) {
            Ok(converted) => converted,
            Err(e) => {
                log::warn!(
                    "Failed to express {} in preferred unit '{}': {}",
                    quantity,
                    preferred_unit,
                    e
                );
                quantity.clone()
            }
        }
    }

    /// Render as "magnitude unit" with the configured significant digits
    pub fn display(&self, quantity: &Quantity) -> String {
        let magnitude = format_magnitude(quantity.magnitude, self.preferences.significant_digits);
        if quantity.unit.is_empty() {
            magnitude
        } else {
            format!("{} {}", magnitude, quantity.unit)
        }
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Round to `significant_digits`, trimming trailing zeros.
/// Values outside [1e-3, 1e6) use scientific notation.
pub fn format_magnitude(value: f64, significant_digits: usize) -> String {
    let digits = significant_digits.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = round_significant(value, digits);
    let abs = rounded.abs();
    if !(1e-3..1e6).contains(&abs) {
        let s = format!("{:.*e}", digits - 1, rounded);
        return match s.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_zeros(mantissa), exponent),
            None => s,
        };
    }

    let exponent = abs.log10().floor() as i32;
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, rounded))
}

/// Round to `digits` significant digits, also in the integer part (44542.7 -> 44500 for 3)
fn round_significant(value: f64, digits: usize) -> f64 {
    let exponent = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - exponent;
    let factor = 10f64.powi(shift.abs());
    if !factor.is_finite() {
        return value;
    }
    if shift >= 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::parser::{parse_quantity, parse_unit};

    #[test]
    fn test_format_magnitude() {
        assert_eq!(format_magnitude(246.00000000000003, 5), "246");
        assert_eq!(format_magnitude(6.097560975609756, 5), "6.0976");
        assert_eq!(format_magnitude(121.95121951219512, 5), "121.95");
        assert_eq!(format_magnitude(200000.0, 5), "200000");
        assert_eq!(format_magnitude(2e7, 5), "2e7");
        assert_eq!(format_magnitude(1.2345678e-5, 3), "1.23e-5");
        assert_eq!(format_magnitude(-0.5, 5), "-0.5");
        assert_eq!(format_magnitude(0.0, 5), "0");
    }

    #[test]
    fn test_format_magnitude_rounds_integer_digits() {
        assert_eq!(format_magnitude(123456.7, 5), "123460");
        assert_eq!(format_magnitude(44542.68, 3), "44500");
        assert_eq!(format_magnitude(246.4, 2), "250");
        assert_eq!(format_magnitude(-246.4, 2), "-250");
        // carries into the next decade
        assert_eq!(format_magnitude(9.99996, 5), "10");
        assert_eq!(format_magnitude(999999.7, 3), "1e6");
    }

    #[test]
    fn test_display() {
        let formatter = UnitFormatter::default();
        let q = parse_quantity("246 GW/yr").unwrap();
        assert_eq!(formatter.display(&q), "246 GW/yr");
        assert_eq!(formatter.display(&Quantity::scalar(0.25)), "0.25");
    }

    #[test]
    fn test_dimension_preference() {
        let mut preferences = UnitPreferences::default();
        preferences
            .dimensions
            .insert("power".to_string(), parse_unit("GW").unwrap());
        let formatter = UnitFormatter::new(preferences);

        let q = parse_quantity("1500000 kW").unwrap();
        let preferred = formatter.preferred(None, &q, false);
        assert_eq!(formatter.display(&preferred), "1.5 GW");

        // pinned results keep their unit
        let pinned = formatter.preferred(None, &q, true);
        assert_eq!(pinned.unit.to_string(), "kW");
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut preferences = UnitPreferences::default();
        preferences
            .dimensions
            .insert("deployment_rate".to_string(), parse_unit("GW/yr").unwrap());
        preferences
            .overrides
            .insert("rate".to_string(), parse_unit("MW/d").unwrap());
        let formatter = UnitFormatter::new(preferences);

        let q = parse_quantity("365.25 GW/yr").unwrap();
        let preferred = formatter.preferred(Some("rate"), &q, true);
        assert_eq!(formatter.display(&preferred), "1000 MW/d");
    }

    #[test]
    fn test_bad_preference_keeps_value() {
        let mut preferences = UnitPreferences::default();
        preferences
            .overrides
            .insert("rate".to_string(), parse_unit("kg").unwrap());
        let formatter = UnitFormatter::new(preferences);

        let q = parse_quantity("246 GW/yr").unwrap();
        assert_eq!(formatter.preferred(Some("rate"), &q, false), q);
    }
}
