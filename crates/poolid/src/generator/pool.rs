use portable_atomic::{AtomicU64, AtomicUsize, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    EntropySource, Uuid, UuidGenerator,
    fatal::abort_on_entropy_failure,
    generator::{Error, Result, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Default arena size: 8 KiB, i.e. 512 UUIDs per OS request.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Bytes handed out per reservation.
pub const BLOCK_SIZE: usize = 16;

struct Arena<E, const N: usize> {
    bytes: Box<[u8; N]>,
    source: E,
}

/// A shared arena of OS entropy that serves 16-byte blocks to any number of
/// threads and refills itself in bulk.
///
/// Each fill asks the [`EntropySource`] for the whole arena in one request, so
/// the fixed cost of a syscall (or crypto provider call) is paid once per
/// `N / 16` blocks instead of once per UUID.
///
/// ## Concurrency
/// - Reservations are an atomic `fetch_add` on the cursor, taken while holding
///   the arena's read lock. Callers within one fill cycle always receive
///   disjoint byte ranges, and the bytes are copied out before the read lock
///   is released.
/// - The thread that overruns the arena takes the write lock, re-checks that
///   the arena is still exhausted and only then refills it. At most one OS
///   read happens per cycle, and no reader can observe bytes being replaced
///   underneath it.
/// - The fast path never blocks on I/O; a refill blocks only for the duration
///   of the OS call.
///
/// ## Failure
/// A failed or short fill is never retried and partial data is never served.
/// The `try_*` methods return the [`Error`]; the rest abort the process.
///
/// ## Capacity
/// `N` must be a non-zero multiple of [`BLOCK_SIZE`]. This is checked at
/// compile time.
///
/// # Example
/// ```
/// use poolid::{EntropyPool, OsRandom, UuidGenerator};
///
/// let pool: EntropyPool<OsRandom> = EntropyPool::new(OsRandom::new()).unwrap();
/// let id = pool.next_id();
/// assert_eq!(id.version(), 4);
/// ```
pub struct EntropyPool<E, const N: usize = DEFAULT_CAPACITY>
where
    E: EntropySource,
{
    arena: RwLock<Arena<E, N>>,
    #[cfg(feature = "cache-padded")]
    cursor: crossbeam_utils::CachePadded<AtomicUsize>,
    #[cfg(not(feature = "cache-padded"))]
    cursor: AtomicUsize,
    generation: AtomicU64,
}

impl<E, const N: usize> EntropyPool<E, N>
where
    E: EntropySource,
{
    const VALID_CAPACITY: () = assert!(
        N >= BLOCK_SIZE && N % BLOCK_SIZE == 0,
        "arena capacity must be a non-zero multiple of 16"
    );

    /// Takes ownership of the entropy handle and fills the arena once, so the
    /// pool starts full.
    ///
    /// # Errors
    /// - [`Error::EntropyUnavailable`] if the source fails.
    /// - [`Error::ShortRead`] if the source writes fewer than `N` bytes.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(source)))]
    pub fn new(source: E) -> Result<Self> {
        let () = Self::VALID_CAPACITY;

        let mut arena = Arena {
            bytes: Box::new([0; N]),
            source,
        };
        Self::fill(&mut arena)?;

        Ok(Self {
            arena: RwLock::new(arena),
            #[cfg(feature = "cache-padded")]
            cursor: crossbeam_utils::CachePadded::new(AtomicUsize::new(0)),
            #[cfg(not(feature = "cache-padded"))]
            cursor: AtomicUsize::new(0),
            generation: AtomicU64::new(1),
        })
    }

    /// Arena size in bytes.
    #[must_use]
    pub const fn capacity() -> usize {
        N
    }

    /// Number of completed fill cycles, including the initial fill.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whole blocks left before the next refill. Only a hint under
    /// concurrency.
    #[must_use]
    pub fn remaining(&self) -> usize {
        N.saturating_sub(self.cursor.load(Ordering::Relaxed)) / BLOCK_SIZE
    }

    /// Reserves the next 16 unused bytes of the arena, refilling it first if
    /// it is exhausted.
    ///
    /// # Errors
    /// - [`Error::EntropyUnavailable`] or [`Error::ShortRead`] if a required
    ///   refill fails.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   arena lock (not possible with `parking-lot`).
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_bytes(&self) -> Result<[u8; BLOCK_SIZE]> {
        loop {
            {
                let arena = self.read()?;
                let offset = self.cursor.fetch_add(BLOCK_SIZE, Ordering::Relaxed);
                if offset + BLOCK_SIZE <= N {
                    let mut block = [0; BLOCK_SIZE];
                    block.copy_from_slice(&arena.bytes[offset..offset + BLOCK_SIZE]);
                    return Ok(block);
                }
            }
            self.cold_refill()?;
        }
    }

    /// Infallible variant of [`Self::try_next_bytes`]. Aborts the process if
    /// secure randomness cannot be obtained.
    pub fn next_bytes(&self) -> [u8; BLOCK_SIZE] {
        match self.try_next_bytes() {
            Ok(block) => block,
            Err(e) => abort_on_entropy_failure(&e),
        }
    }

    /// Zeroes the arena and hands back the entropy handle. Dropping the
    /// returned source releases it.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn shutdown(self) -> E {
        #[cfg(feature = "parking-lot")]
        let mut arena = self.arena.into_inner();
        // A poisoned arena still owns the handle we must release.
        #[cfg(not(feature = "parking-lot"))]
        let mut arena = self
            .arena
            .into_inner()
            .unwrap_or_else(crate::generator::PoisonError::into_inner);

        arena.bytes.fill(0);
        let _ = core::hint::black_box(&arena.bytes);
        arena.source
    }

    #[cold]
    #[inline(never)]
    fn cold_refill(&self) -> Result<()> {
        let mut arena = self.write()?;

        // Someone else refilled while we waited for the lock.
        if self.cursor.load(Ordering::Relaxed) + BLOCK_SIZE <= N {
            return Ok(());
        }

        Self::fill(&mut arena)?;
        self.cursor.store(0, Ordering::Relaxed);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(generation, capacity = N, "refilled entropy arena");
        #[cfg(not(feature = "tracing"))]
        let _ = generation;

        Ok(())
    }

    fn fill(arena: &mut Arena<E, N>) -> Result<()> {
        let actual = arena.source.try_fill(&mut arena.bytes[..])?;
        if actual != N {
            return Err(Error::ShortRead {
                expected: N,
                actual,
            });
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arena<E, N>>> {
        #[cfg(feature = "parking-lot")]
        let guard = self.arena.read();
        #[cfg(not(feature = "parking-lot"))]
        let guard = self.arena.read()?;
        Ok(guard)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arena<E, N>>> {
        #[cfg(feature = "parking-lot")]
        let guard = self.arena.write();
        #[cfg(not(feature = "parking-lot"))]
        let guard = self.arena.write()?;
        Ok(guard)
    }
}

impl<E, const N: usize> UuidGenerator for EntropyPool<E, N>
where
    E: EntropySource,
{
    type Err = Error;

    fn try_next_id(&self) -> Result<Uuid, Self::Err> {
        self.try_next_bytes().map(Uuid::from_random_bytes)
    }
}
