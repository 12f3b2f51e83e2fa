use crate::dim::error::{DimError, DimResult};
use crate::dim::quantity::Quantity;
use crate::dim::types::Dimension;

//                                            L  M   T   I  Θ  N  J
const NAMED_DIMENSIONS: &[(&str, [i32; 7])] = &[
    ("dimensionless", [0, 0, 0, 0, 0, 0, 0]),
    ("length", [1, 0, 0, 0, 0, 0, 0]),
    ("mass", [0, 1, 0, 0, 0, 0, 0]),
    ("time", [0, 0, 1, 0, 0, 0, 0]),
    ("current", [0, 0, 0, 1, 0, 0, 0]),
    ("temperature", [0, 0, 0, 0, 1, 0, 0]),
    ("amount", [0, 0, 0, 0, 0, 1, 0]),
    ("luminous_intensity", [0, 0, 0, 0, 0, 0, 1]),
    ("area", [2, 0, 0, 0, 0, 0, 0]),
    ("volume", [3, 0, 0, 0, 0, 0, 0]),
    ("velocity", [1, 0, -1, 0, 0, 0, 0]),
    ("frequency", [0, 0, -1, 0, 0, 0, 0]),
    ("force", [1, 1, -2, 0, 0, 0, 0]),
    ("pressure", [-1, 1, -2, 0, 0, 0, 0]),
    ("energy", [2, 1, -2, 0, 0, 0, 0]),
    ("power", [2, 1, -3, 0, 0, 0, 0]),
    ("charge", [0, 0, 1, 1, 0, 0, 0]),
    ("voltage", [2, 1, -3, -1, 0, 0, 0]),
    ("resistance", [2, 1, -3, -2, 0, 0, 0]),
    ("mass_rate", [0, 1, -1, 0, 0, 0, 0]),
    ("areal_density", [-2, 1, 0, 0, 0, 0, 0]),
    ("current_density", [-2, 0, 0, 1, 0, 0, 0]),
    ("deployment_rate", [2, 1, -4, 0, 0, 0, 0]),
    ("area_rate", [2, 0, -1, 0, 0, 0, 0]),
    ("specific_energy", [2, 0, -2, 0, 0, 0, 0]),
];

/// Name of a well-known dimension, if there is one
pub fn dimension_name(dimension: &Dimension) -> Option<&'static str> {
    NAMED_DIMENSIONS
        .iter()
        .find(|(_, exps)| *exps == dimension.exponents())
        .map(|(name, _)| *name)
}

pub fn dimension_by_name(name: &str) -> Option<Dimension> {
    NAMED_DIMENSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, exps)| Dimension::new(*exps))
}

/// All dimension names in table order
pub fn dimension_names() -> Vec<&'static str> {
    NAMED_DIMENSIONS.iter().map(|(name, _)| *name).collect()
}

/// Validate that a quantity has the expected named dimension
pub fn validate_dimension(quantity: &Quantity, expected_dimension: &str) -> DimResult<()> {
    let expected = dimension_by_name(expected_dimension).ok_or_else(|| {
        DimError::UnknownName(format!("dimension '{}'", expected_dimension))
    })?;

    if quantity.dimension() != expected {
        return Err(DimError::mismatch(
            format!("validation of '{}'", quantity),
            quantity.dimension().to_string(),
            expected.to_string(),
        ));
    }

    Ok(())
}

/// Get the dimension name of a quantity, falling back to its exponent signature
pub fn get_dimension(quantity: &Quantity) -> String {
    let dimension = quantity.dimension();
    dimension_name(&dimension)
        .map(str::to_string)
        .unwrap_or_else(|| dimension.signature())
}
