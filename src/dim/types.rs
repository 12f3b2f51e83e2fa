use crate::dim::error::{DimError, DimResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Div, Mul};

/// Number of SI base dimensions tracked by [`Dimension`]
pub const BASE_DIMENSIONS: usize = 7;

const BASE_SYMBOLS: [&str; BASE_DIMENSIONS] = ["L", "M", "T", "I", "Θ", "N", "J"];

/// Largest absolute exponent a unit term may carry
pub const MAX_EXPONENT: i32 = 100;

/// Exponents over the SI base dimensions, in the order
/// length, mass, time, current, temperature, amount, luminous intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension([i32; BASE_DIMENSIONS]);

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension([0, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: Dimension = Dimension([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Dimension = Dimension([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: Dimension = Dimension([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: Dimension = Dimension([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: Dimension = Dimension([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT: Dimension = Dimension([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOSITY: Dimension = Dimension([0, 0, 0, 0, 0, 0, 1]);

    pub const fn new(exponents: [i32; BASE_DIMENSIONS]) -> Self {
        Self(exponents)
    }

    pub fn exponents(&self) -> [i32; BASE_DIMENSIONS] {
        self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| *e == 0)
    }

    pub fn powi(self, n: i32) -> DimResult<Self> {
        let mut out = self.0;
        for e in out.iter_mut() {
            *e = e
                .checked_mul(n)
                .ok_or_else(|| DimError::InvalidExponent(format!("{} * {}", e, n)))?;
        }
        Ok(Self(out))
    }

    /// Exponent signature such as `[L^2 M T^-3]`, or `[1]` when dimensionless
    pub fn signature(&self) -> String {
        if self.is_dimensionless() {
            return "[1]".to_string();
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .zip(BASE_SYMBOLS.iter())
            .filter(|(e, _)| **e != 0)
            .map(|(e, s)| {
                if *e == 1 {
                    s.to_string()
                } else {
                    format!("{}^{}", s, e)
                }
            })
            .collect();
        format!("[{}]", parts.join(" "))
    }
}

impl Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Dimension) -> Dimension {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e += r;
        }
        Dimension(out)
    }
}

impl Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e -= r;
        }
        Dimension(out)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::dim::validator::dimension_name(self) {
            Some(name) => write!(f, "{} {}", name, self.signature()),
            None => write!(f, "{}", self.signature()),
        }
    }
}

/// A single, possibly prefixed, unit symbol such as `mg`, `GW` or `yr`
#[derive(Debug, Clone)]
pub struct UnitAtom {
    pub symbol: String,
    /// Size of one of this atom in SI base units
    pub factor: f64,
    pub dimension: Dimension,
}

impl PartialEq for UnitAtom {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

/// Product of unit atoms raised to integer powers
#[derive(Debug, Clone, Default)]
pub struct Unit {
    terms: Vec<(UnitAtom, i32)>,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn from_atom(atom: UnitAtom) -> Self {
        Self {
            terms: vec![(atom, 1)],
        }
    }

    pub fn terms(&self) -> &[(UnitAtom, i32)] {
        &self.terms
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension().is_dimensionless()
    }

    /// True when the unit has no atoms at all (a pure number)
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Scale of this unit relative to the coherent SI unit of its dimension
    pub fn factor(&self) -> f64 {
        self.terms
            .iter()
            .map(|(atom, exp)| atom.factor.powi(*exp))
            .product()
    }

    pub fn dimension(&self) -> Dimension {
        // Exponents are bounded, so these sums stay far from overflow
        let mut out = [0; BASE_DIMENSIONS];
        for (atom, exp) in &self.terms {
            for (o, e) in out.iter_mut().zip(atom.dimension.exponents()) {
                *o += e * exp;
            }
        }
        Dimension(out)
    }

    fn push_term(&mut self, atom: &UnitAtom, exp: i32) -> DimResult<()> {
        if exp == 0 {
            return Ok(());
        }
        let pos = self.terms.iter().position(|(a, _)| a == atom);
        let current = pos.map(|p| self.terms[p].1).unwrap_or(0);
        let total = current
            .checked_add(exp)
            .filter(|t| t.abs() <= MAX_EXPONENT)
            .ok_or_else(|| {
                DimError::InvalidExponent(format!(
                    "{}^{} exceeds the limit of {}",
                    atom.symbol,
                    current as i64 + exp as i64,
                    MAX_EXPONENT
                ))
            })?;
        match pos {
            Some(p) if total == 0 => {
                self.terms.remove(p);
            }
            Some(p) => self.terms[p].1 = total,
            None => self.terms.push((atom.clone(), total)),
        }
        Ok(())
    }

    pub fn multiply(&self, other: &Unit) -> DimResult<Unit> {
        let mut out = self.clone();
        for (atom, exp) in &other.terms {
            out.push_term(atom, *exp)?;
        }
        Ok(out)
    }

    pub fn divide(&self, other: &Unit) -> DimResult<Unit> {
        let mut out = self.clone();
        for (atom, exp) in &other.terms {
            out.push_term(atom, -exp)?;
        }
        Ok(out)
    }

    pub fn powi(&self, n: i32) -> DimResult<Unit> {
        let mut out = Unit::dimensionless();
        for (atom, exp) in &self.terms {
            let scaled = exp.checked_mul(n).ok_or_else(|| {
                DimError::InvalidExponent(format!("({}^{})^{}", atom.symbol, exp, n))
            })?;
            out.push_term(atom, scaled)?;
        }
        Ok(out)
    }

    /// Coherent SI unit for a dimension, built from m, kg, s, A, K, mol and cd
    pub fn si(dimension: Dimension) -> Unit {
        let terms = dimension
            .exponents()
            .iter()
            .enumerate()
            .filter(|(_, exp)| **exp != 0)
            .filter_map(|(i, exp)| crate::dim::units::base_atom(i).map(|atom| (atom, *exp)))
            .collect();
        Unit { terms }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.terms.len() == other.terms.len()
            && self
                .terms
                .iter()
                .all(|(atom, exp)| other.terms.iter().any(|(a, e)| a == atom && e == exp))
    }
}

fn write_term(f: &mut fmt::Formatter<'_>, atom: &UnitAtom, exp: i32) -> fmt::Result {
    if exp == 1 {
        write!(f, "{}", atom.symbol)
    } else {
        write!(f, "{}^{}", atom.symbol, exp)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator: Vec<_> = self.terms.iter().filter(|(_, e)| *e > 0).collect();
        let denominator: Vec<_> = self.terms.iter().filter(|(_, e)| *e < 0).collect();

        if numerator.is_empty() {
            if denominator.is_empty() {
                return Ok(());
            }
            write!(f, "1")?;
        }
        for (i, (atom, exp)) in numerator.iter().enumerate() {
            if i > 0 {
                write!(f, "·")?;
            }
            write_term(f, atom, *exp)?;
        }

        if !denominator.is_empty() {
            write!(f, "/")?;
            if denominator.len() > 1 {
                write!(f, "(")?;
            }
            for (i, (atom, exp)) in denominator.iter().enumerate() {
                if i > 0 {
                    write!(f, "·")?;
                }
                write_term(f, atom, -*exp)?;
            }
            if denominator.len() > 1 {
                write!(f, ")")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        crate::dim::parser::parse_unit(&s).map_err(serde::de::Error::custom)
    }
}

/// Result of parsing a quantity string
#[derive(Debug, Clone)]
pub struct UnitParseResult {
    /// Parsed quantity in the units it was written in
    pub quantity: crate::dim::quantity::Quantity,
    /// Original input string for display
    pub original: String,
}

/// Represents a value that may or may not be a unit expression
#[derive(Debug, Clone)]
pub enum UnitValue {
    /// Successfully parsed into a quantity
    Parsed(UnitParseResult),
    /// Could not parse as unit expression (keep as-is)
    Unparsed(String),
}

pub(crate) fn checked_exponent(text: &str) -> DimResult<i32> {
    text.parse::<i32>()
        .map_err(|_| DimError::InvalidExponent(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::units::lookup_atom;

    fn unit(symbol: &str) -> Unit {
        Unit::from_atom(lookup_atom(symbol).unwrap())
    }

    #[test]
    fn test_dimension_arithmetic() {
        let velocity = Dimension::LENGTH / Dimension::TIME;
        assert_eq!(velocity.exponents(), [1, 0, -1, 0, 0, 0, 0]);
        assert_eq!(velocity * Dimension::TIME, Dimension::LENGTH);
        assert!((Dimension::MASS / Dimension::MASS).is_dimensionless());
        assert_eq!(Dimension::LENGTH.powi(2).unwrap().signature(), "[L^2]");
        assert!(matches!(
            Dimension::LENGTH.powi(2).unwrap().powi(i32::MAX),
            Err(DimError::InvalidExponent(_))
        ));
    }

    #[test]
    fn test_signature() {
        let power = Dimension::new([2, 1, -3, 0, 0, 0, 0]);
        assert_eq!(power.signature(), "[L^2 M T^-3]");
        assert_eq!(Dimension::DIMENSIONLESS.signature(), "[1]");
    }

    #[test]
    fn test_unit_terms_merge_and_cancel() {
        let rate = unit("kg").divide(&unit("yr")).unwrap();
        let area = unit("cm").powi(2).unwrap();
        let back = rate.multiply(&area).unwrap().divide(&area).unwrap();
        assert_eq!(back, rate);
        assert_eq!(back.terms().len(), 2);
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(unit("GW").divide(&unit("yr")).unwrap().to_string(), "GW/yr");
        let cm2 = unit("cm").powi(2).unwrap();
        assert_eq!(unit("mg").divide(&cm2).unwrap().to_string(), "mg/cm^2");
        assert_eq!(
            Unit::dimensionless().divide(&unit("yr")).unwrap().to_string(),
            "1/yr"
        );
        assert_eq!(
            unit("kg")
                .divide(&unit("mg"))
                .and_then(|u| u.divide(&unit("yr")))
                .unwrap()
                .to_string(),
            "kg/(mg·yr)"
        );
        assert_eq!(Unit::dimensionless().to_string(), "");
    }

    #[test]
    fn test_unit_factor() {
        let loading = unit("mg").divide(&unit("cm").powi(2).unwrap()).unwrap();
        // 1 mg/cm^2 = 1e-6 kg / 1e-4 m^2
        assert!((loading.factor() - 1e-2).abs() < 1e-15);
    }

    #[test]
    fn test_exponent_limit() {
        let m = unit("m");
        assert_eq!(m.powi(MAX_EXPONENT).unwrap().terms()[0].1, MAX_EXPONENT);
        assert!(matches!(
            m.powi(MAX_EXPONENT + 1),
            Err(DimError::InvalidExponent(_))
        ));
        assert!(matches!(
            m.powi(2_000_000_000).and_then(|u| u.powi(2)),
            Err(DimError::InvalidExponent(_))
        ));

        let big = m.powi(60).unwrap();
        assert!(big.multiply(&big).is_err());
        // cancelling terms stay within the limit
        assert!(big.divide(&big).unwrap().is_empty());
    }

    #[test]
    fn test_si_unit_for_dimension() {
        let power = Dimension::new([2, 1, -3, 0, 0, 0, 0]);
        let si = Unit::si(power);
        assert_eq!(si.dimension(), power);
        assert!((si.factor() - 1.0).abs() < 1e-12);
    }
}
