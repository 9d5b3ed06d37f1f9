#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod base58;
mod error;
mod generator;
mod guid;
mod id;
pub mod machine;
mod time;

pub use crate::base58::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::guid::*;
pub use crate::id::*;
pub use crate::machine::MachineIdSource;
pub use crate::time::*;
