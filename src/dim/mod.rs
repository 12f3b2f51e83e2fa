// Dimensional analysis: quantities, units, and the expression language
// used by notebook formulas.

pub mod detector;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod processor;
pub mod quantity;
pub mod types;
pub mod units;
pub mod validator;

pub use detector::looks_like_unit_string;
pub use error::{DimError, DimResult};
pub use formatter::{format_magnitude, UnitFormatter, UnitPreferences};
pub use parser::{parse_quantity, parse_unit, DimParser, Expression, NameResolver};
pub use processor::UnitProcessor;
pub use quantity::Quantity;
pub use types::{Dimension, Unit, UnitAtom, UnitParseResult, UnitValue};
pub use validator::{get_dimension, validate_dimension};
