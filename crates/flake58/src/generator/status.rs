use crate::SonyflakeId;
use core::time::Duration;

/// The outcome of one non-blocking mint, see
/// [`LockSonyflakeGenerator::try_poll_id`].
///
/// [`LockSonyflakeGenerator::try_poll_id`]: crate::LockSonyflakeGenerator::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// The ID belongs to a tick that has already started and may be handed
    /// out immediately.
    Ready {
        /// The generated ID.
        id: SonyflakeId,
    },
    /// The sequence of the current tick was exhausted, so the ID was reserved
    /// at sequence zero of the next tick.
    ///
    /// The reservation is final; the caller should hold the ID back for
    /// `yield_for` so it is not released before its tick begins.
    Pending {
        /// The reserved ID.
        id: SonyflakeId,
        /// Time remaining until the reserved tick starts.
        yield_for: Duration,
    },
}

impl IdGenStatus {
    /// The minted ID, whether or not its tick has started.
    pub const fn id(&self) -> SonyflakeId {
        match self {
            Self::Ready { id } | Self::Pending { id, .. } => *id,
        }
    }
}
