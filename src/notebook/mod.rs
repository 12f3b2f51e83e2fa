pub mod builtin;
pub mod loader;
pub mod models;
pub mod validation;


pub use builtin::builtin_notebook;
pub use loader::*;
pub use models::*;
pub use validation::*;
