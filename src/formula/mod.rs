pub mod environment;
pub mod evaluator;
pub mod report;

pub use environment::*;
pub use evaluator::*;
pub use report::*;
