use crate::base58::Base58Error;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flake58` can emit.
///
/// None of these are retried internally: retrying a [`Error::TimeOverflow`] or
/// decoding the same malformed string again can never succeed, so every
/// failure is handed back to the immediate caller unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The id string could not be decoded (empty, foreign character, or a value
    /// larger than 64 bits), or a codec was built from a bad alphabet.
    #[error(transparent)]
    Base58(#[from] Base58Error),

    /// The caller-supplied validator rejected the machine discriminator.
    #[error("invalid machine id: {machine_id}")]
    InvalidMachineId { machine_id: u16 },

    /// The machine discriminator source failed to produce a value, e.g. no
    /// routable local address was found.
    #[error("machine id unavailable: {reason}")]
    MachineIdUnavailable { reason: String },

    /// The configured start epoch lies in the future.
    #[error("start time is ahead of the current time")]
    StartTimeAhead,

    /// The 39-bit elapsed-tick budget is exhausted. No id was minted.
    #[error("time overflow: tick {tick} exceeds the 39-bit time field")]
    TimeOverflow { tick: u64 },

    /// The generator state lock was poisoned by a panicking thread.
    ///
    /// Only reachable with the std mutex; `parking-lot` mutexes do not poison.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
