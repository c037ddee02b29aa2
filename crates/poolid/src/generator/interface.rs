use crate::{Result, Uuid, fatal::abort_on_entropy_failure};
use core::fmt;

/// A minimal interface for generating version 4 UUIDs.
pub trait UuidGenerator {
    type Err: fmt::Display;

    /// Returns the next UUID.
    ///
    /// # Errors
    /// - Returns an error if secure randomness could not be obtained or the
    ///   underlying lock is poisoned.
    fn try_next_id(&self) -> Result<Uuid, Self::Err>;

    /// Returns the next UUID, aborting the process if secure randomness could
    /// not be obtained. Never degrades to weaker randomness.
    fn next_id(&self) -> Uuid {
        match self.try_next_id() {
            Ok(id) => id,
            Err(e) => abort_on_entropy_failure(&e),
        }
    }
}

impl<G: UuidGenerator + ?Sized> UuidGenerator for &G {
    type Err = G::Err;

    fn try_next_id(&self) -> Result<Uuid, Self::Err> {
        (**self).try_next_id()
    }
}

impl<G: UuidGenerator + ?Sized> UuidGenerator for std::sync::Arc<G> {
    type Err = G::Err;

    fn try_next_id(&self) -> Result<Uuid, Self::Err> {
        (**self).try_next_id()
    }
}
