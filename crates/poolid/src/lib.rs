//! # poolid
//!
//! Random (version 4) UUIDs served from a shared arena of OS entropy.
//!
//! Asking the operating system for 16 bytes per UUID pays a syscall (or crypto
//! provider call) every time. `poolid` instead asks for a whole arena at once
//! (8 KiB by default, 512 UUIDs) and hands out disjoint 16-byte blocks to any
//! number of threads, refilling in bulk when the arena runs dry.
//!
//! ## Quick start
//! ```rust
//! let id = poolid::uuid4();
//! assert_eq!(id.version(), 4);
//! ```
//!
//! ## Owning a pool
//! ```rust
//! use poolid::{EntropyPool, OsRandom, UuidGenerator};
//!
//! let pool: EntropyPool<OsRandom> = EntropyPool::new(OsRandom::new()).expect("entropy");
//! let id = pool.next_id();
//! assert!(id.is_valid());
//! let _source = pool.shutdown();
//! ```
//!
//! ## Failure model
//! Secure randomness is not optional. Every operation has a `try_*` form that
//! reports [`Error`]; the plain forms abort the process instead of returning
//! weaker randomness.
//!
//! ## Features
//! - `parking-lot`: use `parking_lot::RwLock` for the arena (no poisoning).
//! - `cache-padded`: pad the shared cursor to its own cache line.
//! - `tracing`: emit spans and refill events through `tracing`.
//! - `serde`: the [`as_native_uuid`] adapter.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod fatal;
mod generator;
mod global;
mod id;
mod rand;
mod random_native;
#[cfg(feature = "serde")]
mod serde;

pub use crate::generator::{
    BLOCK_SIZE, DEFAULT_CAPACITY, EntropyPool, Error, Result, UuidGenerator,
};
pub use crate::global::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::random_native::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
