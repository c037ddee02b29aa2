/// A result type defaulting to the crate [`Error`].
///
/// Only entropy acquisition is fallible. Reserving a block, copying it out and
/// stamping the version bits never fail.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `poolid` can emit.
///
/// None of these are transient. A caller that receives one has no safe way to
/// produce a random UUID and should stop; the non-`try` APIs do exactly that by
/// aborting the process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system's secure random source could not be opened or
    /// returned an error while filling the arena.
    #[error("entropy source unavailable: {reason}")]
    EntropyUnavailable {
        /// What the OS reported.
        reason: String,
    },

    /// The entropy source wrote fewer bytes than requested during a fill.
    ///
    /// Partially filled arenas are never served.
    #[error("short read from entropy source: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested (the arena capacity).
        expected: usize,
        /// Bytes actually written by the source.
        actual: usize,
    },

    /// The operation failed because the arena lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, locks do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("arena lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) fn unavailable(reason: impl core::fmt::Display) -> Self {
        Self::EntropyUnavailable {
            reason: reason.to_string(),
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::PoisonError;

// Convert all poisoned lock errors to a simplified `LockPoisoned`
#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
impl<G> From<PoisonError<G>> for Error {
    fn from(_: PoisonError<G>) -> Self {
        Self::LockPoisoned
    }
}
