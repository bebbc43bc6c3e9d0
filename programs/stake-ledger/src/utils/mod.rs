pub mod registry;
pub use registry::*;

pub mod token;
pub use token::*;
