use crate::{
    Decomposition, Error, IdGenStatus, Mutex, MutexGuard, Result, SonyflakeId, TICK_MILLIS,
    TimeSource,
};
use core::time::Duration;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A lock-based Sonyflake ID generator suitable for multi-threaded
/// environments.
///
/// The last minted ID doubles as the generator state (current tick and
/// sequence) and lives behind one mutex. The lock guards only the
/// decide-and-update step; encoding, decoding and decomposition never take it.
///
/// Cloning the generator shares that state, so clones are the same generator
/// instance and never mint the same ID twice.
///
/// ## Guarantees
/// - IDs from one instance never decrease and never repeat, even with many
///   concurrent callers.
/// - At most 256 IDs per 10ms tick; the 257th is reserved in the next tick and
///   the caller waits (at most about one tick) for that tick to start.
/// - Nothing is promised across instances beyond coarse ordering by time, and
///   two instances sharing a machine ID can collide.
pub struct LockSonyflakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<SonyflakeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<SonyflakeId>>,
    pub(crate) machine_id: u16,
    pub(crate) time: T,
}

impl<T> LockSonyflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator for `machine_id`, with tick and sequence
    /// starting at zero.
    ///
    /// # Example
    /// ```
    /// use flake58::{LockSonyflakeGenerator, MonotonicClock};
    ///
    /// let generator = LockSonyflakeGenerator::new(7, MonotonicClock::new().unwrap());
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.machine_id(), 7);
    /// ```
    pub fn new(machine_id: u16, time: T) -> Self {
        Self::from_components(0, machine_id, 0, time)
    }

    /// Creates a generator from explicit state.
    ///
    /// Mostly useful in tests to place the generator at a particular tick or
    /// sequence. Prefer [`Self::new`].
    pub fn from_components(timestamp: u64, machine_id: u16, sequence: u64, time: T) -> Self {
        let id = SonyflakeId::from_components(timestamp, u64::from(machine_id), sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            machine_id,
            time,
        }
    }

    /// The machine discriminator embedded in every ID.
    pub const fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// The clock driving this generator.
    pub const fn time(&self) -> &T {
        &self.time
    }

    /// Mints the next ID, blocking on sequence overflow.
    ///
    /// When more than 256 IDs are requested within one tick the ID is taken
    /// from the next tick, and this call sleeps until that tick begins. The
    /// lock stays held during that short sleep so no other caller can observe
    /// the tick before it has started.
    ///
    /// # Errors
    ///
    /// - [`Error::TimeOverflow`] once the elapsed ticks no longer fit in 39
    ///   bits
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (std mutex only)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SonyflakeId> {
        let now = self.time.current_millis();
        let mut state = self.lock()?;

        match Self::advance(&mut state, now)? {
            IdGenStatus::Ready { id } => Ok(id),
            IdGenStatus::Pending { id, yield_for } => {
                std::thread::sleep(yield_for);
                drop(state);
                Ok(id)
            }
        }
    }

    /// Mints the next ID without sleeping.
    ///
    /// Returns [`IdGenStatus::Pending`] when the ID was reserved in a tick
    /// that has not started yet; the caller decides how to wait. See
    /// [`IdGenStatus`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    ///
    /// # Example
    /// ```
    /// use flake58::{IdGenStatus, LockSonyflakeGenerator, MonotonicClock};
    ///
    /// let generator = LockSonyflakeGenerator::new(1, MonotonicClock::new().unwrap());
    /// let id = match generator.try_poll_id().unwrap() {
    ///     IdGenStatus::Ready { id } => id,
    ///     IdGenStatus::Pending { id, yield_for } => {
    ///         std::thread::sleep(yield_for);
    ///         id
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 1);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();
        let mut state = self.lock()?;
        Self::advance(&mut state, now)
    }

    /// Splits `id` into its fields, resolving the tick against this
    /// generator's start epoch.
    pub fn decompose(&self, id: SonyflakeId) -> Decomposition {
        Decomposition::new(id, self.time.start_millis())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SonyflakeId>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// The decide-and-update step. `state` is only written once the new tick
    /// is known to fit, so a failed mint leaves it untouched.
    fn advance(state: &mut SonyflakeId, now: u64) -> Result<IdGenStatus> {
        let elapsed = now / TICK_MILLIS;

        if elapsed > state.timestamp() {
            check_tick(elapsed)?;
            *state = state.rollover_to_timestamp(elapsed);
            return Ok(IdGenStatus::Ready { id: *state });
        }

        // Same tick, or the clock is behind a tick reserved earlier.
        if state.has_sequence_room() {
            *state = state.increment_sequence();
            return Ok(IdGenStatus::Ready { id: *state });
        }

        Self::cold_sequence_exhausted(state, now)
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(state: &mut SonyflakeId, now: u64) -> Result<IdGenStatus> {
        let tick = state.timestamp() + 1;
        check_tick(tick)?;
        *state = state.rollover_to_timestamp(tick);

        let yield_for = Duration::from_millis((tick * TICK_MILLIS).saturating_sub(now));
        #[cfg(feature = "tracing")]
        tracing::debug!(tick, ?yield_for, "sequence exhausted, reserving next tick");

        Ok(IdGenStatus::Pending {
            id: *state,
            yield_for,
        })
    }
}

fn check_tick(tick: u64) -> Result<()> {
    if tick > SonyflakeId::max_timestamp() {
        #[cfg(feature = "tracing")]
        tracing::error!(tick, "elapsed time no longer fits in the timestamp field");
        return Err(Error::TimeOverflow { tick });
    }
    Ok(())
}

impl<T> Clone for LockSonyflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            machine_id: self.machine_id,
            time: self.time.clone(),
        }
    }
}

impl<T> core::fmt::Debug for LockSonyflakeGenerator<T>
where
    T: TimeSource + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockSonyflakeGenerator")
            .field("machine_id", &self.machine_id)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}
