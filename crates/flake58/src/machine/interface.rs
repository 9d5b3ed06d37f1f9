use crate::Result;

/// A source for the machine discriminator embedded in every ID.
///
/// # Example
///
/// ```
/// use flake58::machine::{self, MachineIdSource};
///
/// assert_eq!(42_u16.machine_id().unwrap(), 42);
///
/// let from_env = machine::from_fn(|| Ok(7));
/// assert_eq!(from_env.machine_id().unwrap(), 7);
/// ```
pub trait MachineIdSource {
    /// Produces the discriminator.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::Error::MachineIdUnavailable`] when no
    /// value can be determined.
    fn machine_id(&self) -> Result<u16>;
}

impl MachineIdSource for u16 {
    fn machine_id(&self) -> Result<u16> {
        Ok(*self)
    }
}

impl<S: MachineIdSource + ?Sized> MachineIdSource for Box<S> {
    fn machine_id(&self) -> Result<u16> {
        (**self).machine_id()
    }
}

/// A [`MachineIdSource`] backed by a closure. Built with [`from_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(F);

/// Wraps a closure as a [`MachineIdSource`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn() -> Result<u16>,
{
    FromFn(f)
}

impl<F> MachineIdSource for FromFn<F>
where
    F: Fn() -> Result<u16>,
{
    fn machine_id(&self) -> Result<u16> {
        (self.0)()
    }
}
