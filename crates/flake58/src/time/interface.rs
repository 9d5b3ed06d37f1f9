use core::time::Duration;

/// Length of one tick, the unit of the timestamp field.
pub const TICK: Duration = Duration::from_millis(TICK_MILLIS);

/// [`TICK`] in milliseconds.
pub const TICK_MILLIS: u64 = 10;

/// Default start epoch: Monday, September 1, 2014 00:00:00 UTC
pub const DEFAULT_START: Duration = Duration::from_millis(1_409_529_600_000);

/// A trait for time sources that return the time elapsed since a generator's
/// start epoch.
///
/// This abstraction allows you to plug in a real clock, or a mocked time source
/// in tests. The unit is **milliseconds**; generators divide by
/// [`TICK_MILLIS`] themselves so they can also compute how long to wait for the
/// next tick boundary.
///
/// # Example
///
/// ```
/// use flake58::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the start epoch.
    fn current_millis(&self) -> u64;

    /// Returns the start epoch in milliseconds since the Unix epoch, used to
    /// resolve decomposed ticks back to wall-clock time.
    fn start_millis(&self) -> u64 {
        0
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn start_millis(&self) -> u64 {
        (**self).start_millis()
    }
}
