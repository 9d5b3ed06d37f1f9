mod decomposition;
mod sonyflake;

pub use decomposition::*;
pub use sonyflake::*;
