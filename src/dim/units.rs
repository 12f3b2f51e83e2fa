// Unit table: SI prefixes plus the units needed for electrochemistry,
// energy-system and commodity estimates.

use crate::dim::types::{Dimension, UnitAtom};

// symbol, scale
const PREFIXES: &[(&str, f64)] = &[
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("da", 1e1),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("µ", 1e-6),
    ("μ", 1e-6),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
];

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

struct UnitDef {
    symbol: &'static str,
    name: &'static str,
    factor: f64,
    dimension: Dimension,
    prefixable: bool,
}

const fn def(
    symbol: &'static str,
    name: &'static str,
    factor: f64,
    dimension: [i32; 7],
    prefixable: bool,
) -> UnitDef {
    UnitDef {
        symbol,
        name,
        factor,
        dimension: Dimension::new(dimension),
        prefixable,
    }
}

//                      L  M   T  I  Θ  N  J
const UNITS: &[UnitDef] = &[
    def("m", "metre", 1.0, [1, 0, 0, 0, 0, 0, 0], true),
    def("g", "gram", 1e-3, [0, 1, 0, 0, 0, 0, 0], true),
    def("t", "tonne", 1e3, [0, 1, 0, 0, 0, 0, 0], true),
    def("s", "second", 1.0, [0, 0, 1, 0, 0, 0, 0], true),
    def("min", "minute", 60.0, [0, 0, 1, 0, 0, 0, 0], false),
    def("h", "hour", 3600.0, [0, 0, 1, 0, 0, 0, 0], false),
    def("d", "day", SECONDS_PER_DAY, [0, 0, 1, 0, 0, 0, 0], false),
    def("yr", "year", SECONDS_PER_YEAR, [0, 0, 1, 0, 0, 0, 0], true),
    def("A", "ampere", 1.0, [0, 0, 0, 1, 0, 0, 0], true),
    def("K", "kelvin", 1.0, [0, 0, 0, 0, 1, 0, 0], true),
    def("mol", "mole", 1.0, [0, 0, 0, 0, 0, 1, 0], true),
    def("cd", "candela", 1.0, [0, 0, 0, 0, 0, 0, 1], false),
    def("L", "litre", 1e-3, [3, 0, 0, 0, 0, 0, 0], true),
    def("Hz", "hertz", 1.0, [0, 0, -1, 0, 0, 0, 0], true),
    def("N", "newton", 1.0, [1, 1, -2, 0, 0, 0, 0], true),
    def("Pa", "pascal", 1.0, [-1, 1, -2, 0, 0, 0, 0], true),
    def("bar", "bar", 1e5, [-1, 1, -2, 0, 0, 0, 0], true),
    def("J", "joule", 1.0, [2, 1, -2, 0, 0, 0, 0], true),
    def("Wh", "watt-hour", 3600.0, [2, 1, -2, 0, 0, 0, 0], true),
    def("eV", "electronvolt", ELEMENTARY_CHARGE, [2, 1, -2, 0, 0, 0, 0], true),
    def("W", "watt", 1.0, [2, 1, -3, 0, 0, 0, 0], true),
    def("C", "coulomb", 1.0, [0, 0, 1, 1, 0, 0, 0], true),
    def("Ah", "ampere-hour", 3600.0, [0, 0, 1, 1, 0, 0, 0], true),
    def("V", "volt", 1.0, [2, 1, -3, -1, 0, 0, 0], true),
    def("Ω", "ohm", 1.0, [2, 1, -3, -2, 0, 0, 0], true),
    def("ohm", "ohm", 1.0, [2, 1, -3, -2, 0, 0, 0], false),
    def("%", "percent", 1e-2, [0, 0, 0, 0, 0, 0, 0], false),
    def("ppm", "parts per million", 1e-6, [0, 0, 0, 0, 0, 0, 0], false),
];

const BASE_SYMBOLS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];

fn normalize_prefix(prefix: &str) -> &str {
    match prefix {
        "u" | "μ" => "µ",
        other => other,
    }
}

/// Resolve a unit symbol, trying an exact match before splitting off an SI prefix
pub fn lookup_atom(symbol: &str) -> Option<UnitAtom> {
    if let Some(unit) = UNITS.iter().find(|u| u.symbol == symbol) {
        return Some(UnitAtom {
            symbol: unit.symbol.to_string(),
            factor: unit.factor,
            dimension: unit.dimension,
        });
    }

    for (prefix, scale) in PREFIXES {
        if let Some(rest) = symbol.strip_prefix(prefix) {
            if rest.is_empty() {
                continue;
            }
            if let Some(unit) = UNITS.iter().find(|u| u.symbol == rest && u.prefixable) {
                return Some(UnitAtom {
                    symbol: format!("{}{}", normalize_prefix(prefix), unit.symbol),
                    factor: scale * unit.factor,
                    dimension: unit.dimension,
                });
            }
        }
    }

    None
}

/// Coherent SI atom for base dimension `index` (0 = length ... 6 = luminous intensity)
pub fn base_atom(index: usize) -> Option<UnitAtom> {
    BASE_SYMBOLS.get(index).and_then(|s| lookup_atom(s))
}

/// Long name of an unprefixed unit symbol, for listings
pub fn unit_name(symbol: &str) -> Option<&'static str> {
    UNITS.iter().find(|u| u.symbol == symbol).map(|u| u.name)
}

/// All unprefixed unit symbols in table order
pub fn known_symbols() -> Vec<&'static str> {
    UNITS.iter().map(|u| u.symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_symbols_win_over_prefixes() {
        let minute = lookup_atom("min").unwrap();
        assert_eq!(minute.dimension, Dimension::TIME);
        assert_relative_eq!(minute.factor, 60.0);

        let pascal = lookup_atom("Pa").unwrap();
        assert_relative_eq!(pascal.factor, 1.0);

        let mole = lookup_atom("mol").unwrap();
        assert_eq!(mole.dimension, Dimension::AMOUNT);
    }

    #[test]
    fn test_prefixed_symbols() {
        let mg = lookup_atom("mg").unwrap();
        assert_relative_eq!(mg.factor, 1e-6);
        assert_eq!(mg.dimension, Dimension::MASS);

        let gw = lookup_atom("GW").unwrap();
        assert_relative_eq!(gw.factor, 1e9);

        let kwh = lookup_atom("kWh").unwrap();
        assert_relative_eq!(kwh.factor, 3.6e6);

        let kg = lookup_atom("kg").unwrap();
        assert_relative_eq!(kg.factor, 1.0);
        assert_eq!(kg.symbol, "kg");
    }

    #[test]
    fn test_micro_spellings_are_one_atom() {
        let a = lookup_atom("ug").unwrap();
        let b = lookup_atom("µg").unwrap();
        let c = lookup_atom("μg").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.symbol, "µg");
    }

    #[test]
    fn test_unprefixable_units() {
        assert!(lookup_atom("kmin").is_none());
        assert!(lookup_atom("k%").is_none());
        assert!(lookup_atom("furlong").is_none());
        assert!(lookup_atom("k").is_none());
    }

    #[test]
    fn test_base_atoms() {
        for i in 0..7 {
            let atom = base_atom(i).unwrap();
            assert_relative_eq!(atom.factor, 1.0);
            assert_eq!(atom.dimension.exponents()[i], 1);
        }
        assert!(base_atom(7).is_none());
    }
}
