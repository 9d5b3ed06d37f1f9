use crate::{DEFAULT_START, Error, Result, TimeSource};
use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic time source that returns the time elapsed since a start epoch.
///
/// The wall clock is read exactly once, at construction, to find how far the
/// start epoch lies in the past. From then on elapsed time is measured with
/// [`Instant`], so NTP steps or manual clock changes never move generated
/// timestamps backwards.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    anchor: Instant,
    epoch_offset: u64, // in milliseconds
    start: u64,        // in milliseconds since UNIX_EPOCH
}

impl MonotonicClock {
    /// Constructs a clock whose zero point is `start`, given as a [`Duration`]
    /// since 1970-01-01 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartTimeAhead`] if `start` lies in the future (or the
    /// system clock reads earlier than the Unix epoch).
    ///
    /// # Example
    ///
    /// ```
    /// use flake58::{MonotonicClock, TimeSource, DEFAULT_START};
    ///
    /// let clock = MonotonicClock::with_start(DEFAULT_START).unwrap();
    /// assert!(clock.current_millis() > 0);
    /// ```
    pub fn with_start(start: Duration) -> Result<Self> {
        let anchor = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::StartTimeAhead)?;
        let offset = system_now
            .checked_sub(start)
            .ok_or(Error::StartTimeAhead)?;

        Ok(Self {
            anchor,
            epoch_offset: offset.as_millis() as u64,
            start: start.as_millis() as u64,
        })
    }

    /// Like [`Self::with_start`], anchored to [`DEFAULT_START`].
    pub fn new() -> Result<Self> {
        Self::with_start(DEFAULT_START)
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.anchor.elapsed().as_millis() as u64
    }

    fn start_millis(&self) -> u64 {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Duration {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap()
    }

    #[test]
    fn future_start_is_rejected() {
        let start = now() + Duration::from_secs(3600);
        assert_eq!(
            MonotonicClock::with_start(start).unwrap_err(),
            Error::StartTimeAhead
        );
    }

    #[test]
    fn counts_from_start() {
        let start = now() - Duration::from_secs(10);
        let clock = MonotonicClock::with_start(start).unwrap();
        let elapsed = clock.current_millis();
        assert!((10_000..20_000).contains(&elapsed), "elapsed = {elapsed}");
        assert_eq!(clock.start_millis(), start.as_millis() as u64);
    }

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::new().unwrap();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }
}
