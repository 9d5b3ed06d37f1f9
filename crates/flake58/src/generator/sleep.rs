use crate::{IdGenStatus, LockSonyflakeGenerator, Result, SonyflakeId, TimeSource};
use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This allows the generator to be generic over async runtimes.
pub trait SleepProvider {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}

impl<T> LockSonyflakeGenerator<T>
where
    T: TimeSource,
{
    /// Mints the next ID without blocking the executor.
    ///
    /// The ID is reserved under the lock exactly as [`Self::next_id`] does,
    /// but the lock is released before waiting out a sequence overflow, so
    /// other callers keep minting from the reserved tick meanwhile.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_poll_id`].
    pub async fn next_id_with_sleep<S>(&self) -> Result<SonyflakeId>
    where
        S: SleepProvider,
    {
        match self.try_poll_id()? {
            IdGenStatus::Ready { id } => Ok(id),
            IdGenStatus::Pending { id, yield_for } => {
                S::sleep_for(yield_for).await;
                Ok(id)
            }
        }
    }

    /// [`Self::next_id_with_sleep`] using the Tokio timer.
    #[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
    #[cfg(feature = "async-tokio")]
    pub async fn next_id_async(&self) -> Result<SonyflakeId> {
        self.next_id_with_sleep::<TokioSleep>().await
    }
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub struct TokioSleep;

#[cfg(feature = "async-tokio")]
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}
