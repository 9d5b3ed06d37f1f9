mod encoder;
mod error;

pub use encoder::*;
pub use error::*;
