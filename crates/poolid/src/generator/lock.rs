#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "parking-lot")]
pub use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
