use crate::{
    Decomposition, Encoder, Error, LockSonyflakeGenerator, MonotonicClock, Result, Settings,
    SonyflakeId, TimeSource,
};
use core::fmt;

/// Mints Sonyflake IDs and renders them as base-58 strings.
///
/// The facade owns one [`LockSonyflakeGenerator`] and one [`Encoder`] and adds
/// no state of its own: minting takes the generator's lock, encoding and
/// decoding take none.
///
/// # Example
///
/// ```
/// use flake58::{Generator, Settings};
///
/// let generator = Generator::new(Settings::default().with_machine_id(65535_u16)).unwrap();
/// let id = generator.next_id().unwrap();
///
/// let parts = generator.decompose(&id).unwrap();
/// assert_eq!(parts.machine_id, 65535);
/// ```
pub struct Generator<T = MonotonicClock>
where
    T: TimeSource,
{
    packer: LockSonyflakeGenerator<T>,
    encoder: Encoder,
}

impl Generator<MonotonicClock> {
    /// Builds a generator on a [`MonotonicClock`] anchored at the configured
    /// start time.
    ///
    /// # Errors
    ///
    /// - [`Error::StartTimeAhead`] if the start time is in the future
    /// - [`Error::MachineIdUnavailable`] if the machine ID source fails
    /// - [`Error::InvalidMachineId`] if the machine ID check rejects the value
    pub fn new(settings: Settings) -> Result<Self> {
        let clock = MonotonicClock::with_start(settings.start_time)?;
        Self::with_clock(settings, clock)
    }
}

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Builds a generator on an explicit clock. The clock defines tick zero,
    /// so [`Settings::with_start_time`] is not consulted.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::new`], minus the start time check.
    pub fn with_clock(settings: Settings, time: T) -> Result<Self> {
        let Settings {
            machine_id,
            check_machine_id,
            encoder,
            ..
        } = settings;

        let machine_id = machine_id.machine_id()?;
        if let Some(check) = check_machine_id {
            if !check(machine_id) {
                return Err(Error::InvalidMachineId { machine_id });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(machine_id, "id generator ready");

        Ok(Self {
            packer: LockSonyflakeGenerator::new(machine_id, time),
            encoder: encoder.unwrap_or_default(),
        })
    }

    /// Mints the next ID as a base-58 string.
    ///
    /// Blocks for up to about one tick when more than 256 IDs are requested
    /// within 10ms.
    ///
    /// # Errors
    ///
    /// Propagates [`LockSonyflakeGenerator::next_id`] errors unchanged.
    pub fn next_id(&self) -> Result<String> {
        let id = self.packer.next_id()?;
        Ok(self.encoder.encode(id.to_raw()))
    }

    /// Like [`Self::next_id`], but panics on failure.
    ///
    /// Only for bootstrap code that cannot continue without an ID; request
    /// handlers should call [`Self::next_id`] and handle the error.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::next_id`] fails.
    pub fn must_next_id(&self) -> String {
        must(self.next_id())
    }

    /// Mints the next ID without blocking the executor on sequence overflow.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
    #[cfg(feature = "async-tokio")]
    pub async fn next_id_async(&self) -> Result<String> {
        let id = self.packer.next_id_async().await?;
        Ok(self.encoder.encode(id.to_raw()))
    }

    /// Decodes an ID string and splits it into its fields.
    ///
    /// Encoded IDs only sort like their values when they have the same length;
    /// order IDs by the decomposed `time` and `sequence` instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base58`] if `id` is empty, contains a character outside
    /// the alphabet, or does not fit in 64 bits.
    pub fn decompose(&self, id: &str) -> Result<Decomposition> {
        let raw = self.encoder.decode(id)?;
        Ok(self.packer.decompose(SonyflakeId::from_raw(raw)))
    }

    /// The machine discriminator resolved at construction.
    pub const fn machine_id(&self) -> u16 {
        self.packer.machine_id()
    }

    /// The codec used by [`Self::next_id`] and [`Self::decompose`].
    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The underlying integer generator.
    pub const fn packer(&self) -> &LockSonyflakeGenerator<T> {
        &self.packer
    }
}

impl<T> Clone for Generator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            packer: self.packer.clone(),
            encoder: self.encoder,
        }
    }
}

impl<T> fmt::Debug for Generator<T>
where
    T: TimeSource + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("packer", &self.packer)
            .field("encoder", &self.encoder)
            .finish()
    }
}

/// Unwraps `result`, panicking with the error's message.
///
/// Intended for variable initialisation where an error means the process
/// cannot start, e.g. `let root = must(generator.next_id());`.
///
/// # Panics
///
/// Panics if `result` is an error.
pub fn must<T, E: fmt::Display>(result: core::result::Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}
