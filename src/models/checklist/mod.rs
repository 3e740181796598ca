pub mod draft;
pub mod guard;
pub mod state;
pub mod submit;

pub use draft::*;
pub use guard::*;
pub use state::*;
pub use submit::*;
