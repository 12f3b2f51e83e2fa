pub mod config;
pub mod dim;
pub mod formula;
pub mod notebook;
