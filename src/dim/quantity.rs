use crate::dim::error::{DimError, DimResult};
use crate::dim::types::{Dimension, Unit};
use serde::Serialize;
use std::fmt;
use std::ops::Neg;

/// A magnitude paired with the unit it is expressed in.
///
/// Multiplication and division combine the units and only fail on division
/// by zero or an exponent past [`MAX_EXPONENT`](crate::dim::types::MAX_EXPONENT).
/// Addition, subtraction and conversion require matching dimensions and
/// return [`DimError::DimensionMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    /// A pure number
    pub fn scalar(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::dimensionless())
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Magnitude expressed in coherent SI units
    pub fn si_magnitude(&self) -> f64 {
        self.magnitude * self.unit.factor()
    }

    pub fn convert_to(&self, target: &Unit) -> DimResult<Quantity> {
        if self.unit == *target {
            return Ok(self.clone());
        }
        if self.dimension() != target.dimension() {
            return Err(DimError::mismatch(
                format!("conversion to '{}'", target),
                self.dimension().to_string(),
                target.dimension().to_string(),
            ));
        }
        Ok(Quantity::new(
            self.magnitude * self.unit.factor() / target.factor(),
            target.clone(),
        ))
    }

    pub fn to_base_units(&self) -> Quantity {
        let si = Unit::si(self.dimension());
        Quantity::new(self.si_magnitude(), si)
    }

    fn combine(&self, other: &Quantity, operation: &str) -> DimResult<f64> {
        if self.dimension() != other.dimension() {
            return Err(DimError::mismatch(
                operation,
                self.dimension().to_string(),
                other.dimension().to_string(),
            ));
        }
        Ok(other.convert_to(&self.unit)?.magnitude)
    }

    /// Sum in the left operand's unit
    pub fn try_add(&self, other: &Quantity) -> DimResult<Quantity> {
        let rhs = self.combine(other, "addition")?;
        Ok(Quantity::new(self.magnitude + rhs, self.unit.clone()))
    }

    /// Difference in the left operand's unit
    pub fn try_sub(&self, other: &Quantity) -> DimResult<Quantity> {
        let rhs = self.combine(other, "subtraction")?;
        Ok(Quantity::new(self.magnitude - rhs, self.unit.clone()))
    }

    pub fn try_mul(&self, other: &Quantity) -> DimResult<Quantity> {
        Ok(Quantity::new(
            self.magnitude * other.magnitude,
            self.unit.multiply(&other.unit)?,
        ))
    }

    pub fn try_div(&self, other: &Quantity) -> DimResult<Quantity> {
        if other.magnitude == 0.0 {
            return Err(DimError::DivisionByZero);
        }
        Ok(Quantity::new(
            self.magnitude / other.magnitude,
            self.unit.divide(&other.unit)?,
        ))
    }

    pub fn try_powi(&self, n: i32) -> DimResult<Quantity> {
        Ok(Quantity::new(self.magnitude.powi(n), self.unit.powi(n)?))
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::new(-self.magnitude, self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit)
        }
    }
}
