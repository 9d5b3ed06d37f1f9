use crate::{DEFAULT_START, Encoder, MachineIdSource, machine::OutboundIp};
use core::{fmt, time::Duration};

/// Construction parameters for a [`crate::Generator`].
///
/// Every field has a default: start epoch [`DEFAULT_START`], machine ID from
/// [`OutboundIp`], no machine ID validation, and [`Encoder::standard`].
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use flake58::Settings;
///
/// let settings = Settings::default()
///     .with_start_time(Duration::from_secs(1_257_894_000))
///     .with_machine_id(42_u16)
///     .with_machine_id_check(|id| id != 0);
/// ```
pub struct Settings {
    pub(crate) start_time: Duration,
    pub(crate) machine_id: Box<dyn MachineIdSource + Send + Sync>,
    pub(crate) check_machine_id: Option<Box<dyn Fn(u16) -> bool + Send + Sync>>,
    pub(crate) encoder: Option<Encoder>,
}

impl Settings {
    /// Tick zero, as a [`Duration`] since 1970-01-01 UTC. Must not lie in the
    /// future.
    #[must_use]
    pub fn with_start_time(mut self, start_time: Duration) -> Self {
        self.start_time = start_time;
        self
    }

    /// Where the machine discriminator comes from: a literal `u16`,
    /// [`crate::machine::from_fn`], [`OutboundIp`] or any other
    /// [`MachineIdSource`]. Resolved once, at construction.
    #[must_use]
    pub fn with_machine_id(
        mut self,
        source: impl MachineIdSource + Send + Sync + 'static,
    ) -> Self {
        self.machine_id = Box::new(source);
        self
    }

    /// A predicate that must accept the resolved machine ID, e.g. to reject
    /// IDs already claimed by another instance.
    #[must_use]
    pub fn with_machine_id_check(
        mut self,
        check: impl Fn(u16) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.check_machine_id = Some(Box::new(check));
        self
    }

    /// The codec used to render IDs. [`Encoder::standard`] when unset.
    #[must_use]
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// The configured start epoch.
    pub const fn start_time(&self) -> Duration {
        self.start_time
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_time: DEFAULT_START,
            machine_id: Box::new(OutboundIp::default()),
            check_machine_id: None,
            encoder: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("start_time", &self.start_time)
            .field("check_machine_id", &self.check_machine_id.is_some())
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}
