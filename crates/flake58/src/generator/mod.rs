mod lock;
mod mutex;
#[cfg(feature = "futures")]
mod sleep;
mod status;

pub use lock::*;
pub use mutex::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub use sleep::*;
pub use status::*;
