use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimError {
    /// Two operands (or a quantity and a target unit) have different dimensions
    #[error("Dimension mismatch in {operation}: {left} is not compatible with {right}")]
    DimensionMismatch {
        operation: String,
        left: String,
        right: String,
    },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown name: {0}")]
    UnknownName(String),

    #[error("Parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    #[error("Invalid exponent: {0}")]
    InvalidExponent(String),

    #[error("Division by zero")]
    DivisionByZero,
}

impl DimError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        DimError::ParseError {
            position,
            message: message.into(),
        }
    }

    pub fn mismatch(
        operation: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        DimError::DimensionMismatch {
            operation: operation.into(),
            left: left.into(),
            right: right.into(),
        }
    }
}

pub type DimResult<T> = Result<T, DimError>;
