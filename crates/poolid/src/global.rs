//! Process-wide UUID generation.
//!
//! A single [`EntropyPool`] backed by [`OsRandom`] is created on first use and
//! shared by every thread for the lifetime of the process. The first caller
//! pays for the initial fill; everyone after that draws from the arena.
//!
//! The pool is never torn down: statics are not dropped, and the OS reclaims
//! the arena at exit. Programs that need an explicit `init`/`shutdown`
//! lifecycle should own an [`EntropyPool`] directly instead.
//!
//! # Example
//! ```rust
//! use poolid::uuid4;
//!
//! let id = uuid4();
//! assert_eq!(id.version(), 4);
//! ```

use crate::{
    EntropyPool, OsRandom, Result, Uuid, UuidGenerator, fatal::abort_on_entropy_failure,
};
use std::sync::LazyLock;

/// The shared pool. Initialization failure is fatal, exactly like a failed
/// refill.
static GLOBAL_POOL: LazyLock<EntropyPool<OsRandom>> =
    LazyLock::new(|| match EntropyPool::new(OsRandom::new()) {
        Ok(pool) => pool,
        Err(e) => abort_on_entropy_failure(&e),
    });

/// Generates a random (version 4) UUID from the process-wide pool.
///
/// Aborts the process if the OS entropy source fails.
///
/// # Example
/// ```rust
/// use poolid::uuid4;
///
/// let a = uuid4();
/// let b = uuid4();
/// assert_ne!(a, b);
/// assert!(a.is_valid() && b.is_valid());
/// ```
pub fn uuid4() -> Uuid {
    GLOBAL_POOL.next_id()
}

/// Fallible variant of [`uuid4`].
///
/// Note that creating the process-wide pool still aborts on failure; only
/// refills after that are reported here.
///
/// # Errors
/// - Returns an error if a refill of the shared arena fails.
pub fn try_uuid4() -> Result<Uuid> {
    GLOBAL_POOL.try_next_id()
}

/// Returns 16 raw random bytes from the process-wide pool, without the
/// version and variant bits applied.
///
/// # Example
/// ```rust
/// use poolid::{random_bytes16, Uuid};
///
/// let bytes = random_bytes16();
/// let id = Uuid::from_random_bytes(bytes);
/// assert!(id.is_valid());
/// ```
pub fn random_bytes16() -> [u8; 16] {
    GLOBAL_POOL.next_bytes()
}

/// Fallible variant of [`random_bytes16`].
///
/// # Errors
/// - Returns an error if a refill of the shared arena fails.
pub fn try_random_bytes16() -> Result<[u8; 16]> {
    GLOBAL_POOL.try_next_bytes()
}

/// Number of completed fill cycles of the process-wide pool.
pub fn global_generation() -> u64 {
    GLOBAL_POOL.generation()
}
