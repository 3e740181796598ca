pub mod approve;
pub mod types;
pub mod view;

pub use approve::*;
pub use types::*;
pub use view::*;
