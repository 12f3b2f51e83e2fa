use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex pattern to detect quantity strings
    /// Matches: number (optional leading or inner decimal point, optional scientific notation) + optional whitespace + unit symbol
    /// Examples: "2e5 kg/yr", "2 mg/cm²", "1.23 V", "1500 GW", "5%"
    static ref QUANTITY_PATTERN: Regex = Regex::new(
        r"^-?(\d[\d_]*(\.\d+)?|\.\d+)([eE][+-]?\d+)?\s*[a-zA-Zµμ%(Ω/*·]"
    ).unwrap();
}

/// Check if a string looks like a quantity literal
pub fn looks_like_unit_string(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return false;
    }

    QUANTITY_PATTERN.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_detection() {
        assert!(looks_like_unit_string("2e5 kg/yr"));
        assert!(looks_like_unit_string("2 mg/cm²"));
        assert!(looks_like_unit_string("1.23 V"));
        assert!(looks_like_unit_string("1500 GW"));
        assert!(looks_like_unit_string("-20 K"));
        assert!(looks_like_unit_string("5%"));
        assert!(looks_like_unit_string("  10 µg "));
        assert!(looks_like_unit_string("1/yr"));
        assert!(looks_like_unit_string(".5 GW"));
        assert!(looks_like_unit_string("-.25 kg"));

        assert!(!looks_like_unit_string("100"));
        assert!(!looks_like_unit_string("GW"));
        assert!(!looks_like_unit_string("hello world"));
        assert!(!looks_like_unit_string(""));
        assert!(!looks_like_unit_string(".GW"));
    }
}
