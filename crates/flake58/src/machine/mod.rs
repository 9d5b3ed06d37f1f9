//! Strategies for choosing the 16-bit machine discriminator.
//!
//! The discriminator is resolved exactly once, when a generator is built. The
//! default, [`OutboundIp`], touches the network stack; tests and deployments
//! with an external allocator should pass a literal `u16` or a closure via
//! [`from_fn`] instead.

mod interface;
mod outbound;

pub use interface::*;
pub use outbound::*;
