pub mod registry;
pub mod types;
pub mod validate;

pub use registry::*;
pub use types::*;
