use crate::{
    BLOCK_SIZE, DEFAULT_CAPACITY, EntropyPool, EntropySource, Error, OsRandom, Result, Uuid,
    UuidGenerator,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::scope;

/// Writes an ever increasing big-endian `u64` counter into every 8 bytes, so
/// every 16-byte block ever produced is distinct and identifies its origin.
#[derive(Default)]
struct SequentialSource {
    next: u64,
}

impl EntropySource for SequentialSource {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        for chunk in dest.chunks_exact_mut(8) {
            chunk.copy_from_slice(&self.next.to_be_bytes());
            self.next += 1;
        }
        Ok(dest.len())
    }
}

fn counters(block: [u8; BLOCK_SIZE]) -> (u64, u64) {
    let (hi, lo) = block.split_at(8);
    (
        u64::from_be_bytes(hi.try_into().unwrap()),
        u64::from_be_bytes(lo.try_into().unwrap()),
    )
}

struct FixedSource(u8);

impl EntropySource for FixedSource {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        dest.fill(self.0);
        Ok(dest.len())
    }
}

/// Always comes up one byte short.
struct ShortSource;

impl EntropySource for ShortSource {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        let n = dest.len() - 1;
        dest[..n].fill(0xaa);
        Ok(n)
    }
}

/// Succeeds for the first `good_fills` requests, then behaves like `failure`.
struct ScriptedSource {
    good_fills: usize,
    fills: usize,
    failure: Failure,
}

#[derive(Clone, Copy)]
enum Failure {
    Unavailable,
    Short,
    Panic,
}

impl ScriptedSource {
    fn new(good_fills: usize, failure: Failure) -> Self {
        Self {
            good_fills,
            fills: 0,
            failure,
        }
    }
}

impl EntropySource for ScriptedSource {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.fills += 1;
        if self.fills <= self.good_fills {
            dest.fill(self.fills as u8);
            return Ok(dest.len());
        }
        match self.failure {
            Failure::Unavailable => Err(Error::EntropyUnavailable {
                reason: "device went away".into(),
            }),
            Failure::Short => {
                dest[..4].fill(0xee);
                Ok(4)
            }
            Failure::Panic => panic!("entropy source exploded"),
        }
    }
}

#[test]
fn new_fills_arena_once() {
    let pool: EntropyPool<_> = EntropyPool::new(SequentialSource::default()).unwrap();
    assert_eq!(pool.generation(), 1);
    assert_eq!(<EntropyPool<SequentialSource>>::capacity(), DEFAULT_CAPACITY);
    assert_eq!(pool.remaining(), DEFAULT_CAPACITY / BLOCK_SIZE);

    let source = pool.shutdown();
    assert_eq!(source.next, (DEFAULT_CAPACITY / 8) as u64);
}

#[test]
fn zero_entropy_yields_nil_v4() {
    let pool: EntropyPool<_> = EntropyPool::new(FixedSource(0)).unwrap();
    let id = pool.next_id();
    // 00000000-0000-4000-8000-000000000000
    assert_eq!(id, Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0000));
}

#[test]
fn every_uuid_has_version_and_variant() {
    let pool: EntropyPool<_> = EntropyPool::new(OsRandom::new()).unwrap();
    for _ in 0..100_000 {
        let id = pool.next_id();
        assert_eq!(id.as_bytes()[6] >> 4, 0b0100);
        assert_eq!(id.as_bytes()[8] >> 6, 0b10);
    }
}

#[test]
fn no_duplicates_under_volume() {
    const TOTAL_IDS: usize = 100_000;

    let pool: EntropyPool<_> = EntropyPool::new(OsRandom::new()).unwrap();
    let mut seen = HashSet::with_capacity(TOTAL_IDS);
    for _ in 0..TOTAL_IDS {
        assert!(seen.insert(pool.next_id()));
    }
    assert_eq!(seen.len(), TOTAL_IDS);
}

#[test]
fn blocks_are_served_in_order_within_a_cycle() {
    let pool: EntropyPool<_> = EntropyPool::new(SequentialSource::default()).unwrap();
    assert_eq!(counters(pool.next_bytes()), (0, 1));
    assert_eq!(counters(pool.next_bytes()), (2, 3));
    assert_eq!(counters(pool.next_bytes()), (4, 5));
    assert_eq!(pool.remaining(), DEFAULT_CAPACITY / BLOCK_SIZE - 3);
}

#[test]
fn refill_happens_exactly_at_the_boundary() {
    const PER_FILL: usize = DEFAULT_CAPACITY / BLOCK_SIZE;

    let pool: EntropyPool<_> = EntropyPool::new(SequentialSource::default()).unwrap();

    let mut last = [0; BLOCK_SIZE];
    for _ in 0..PER_FILL {
        last = pool.next_bytes();
    }
    assert_eq!(pool.generation(), 1);
    assert_eq!(pool.remaining(), 0);
    assert_eq!(counters(last), (1022, 1023));

    // 513th request: exactly one refill, fresh bytes from the new cycle.
    let first_of_next = pool.next_bytes();
    assert_eq!(pool.generation(), 2);
    assert_eq!(counters(first_of_next), (1024, 1025));
    assert_eq!(pool.remaining(), PER_FILL - 1);
}

#[test]
fn smallest_arena_refills_every_block() {
    let pool: EntropyPool<_, 16> = EntropyPool::new(SequentialSource::default()).unwrap();
    assert_eq!(counters(pool.next_bytes()), (0, 1));
    assert_eq!(pool.generation(), 1);
    assert_eq!(counters(pool.next_bytes()), (2, 3));
    assert_eq!(pool.generation(), 2);
    assert_eq!(counters(pool.next_bytes()), (4, 5));
    assert_eq!(pool.generation(), 3);
}

#[test]
fn concurrent_reservations_are_disjoint() {
    const THREADS: usize = 64;
    const IDS_PER_THREAD: usize = 10_000;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;
    const PER_FILL: usize = DEFAULT_CAPACITY / BLOCK_SIZE;

    let pool: EntropyPool<_> = EntropyPool::new(SequentialSource::default()).unwrap();

    let mut all = scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    (0..IDS_PER_THREAD)
                        .map(|_| counters(pool.next_bytes()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(all.len(), TOTAL_IDS);
    all.sort_unstable();

    // Every block came from exactly one slot of exactly one fill cycle, and no
    // slot was skipped or handed out twice.
    for (i, (hi, lo)) in all.iter().enumerate() {
        assert_eq!(*hi, 2 * i as u64, "block {i} overlaps or was skipped");
        assert_eq!(*lo, 2 * i as u64 + 1);
    }
    assert_eq!(pool.generation(), (TOTAL_IDS / PER_FILL) as u64);
}

#[test]
fn concurrent_os_backed_uuids_are_unique() {
    let threads = num_cpus::get().max(2);
    const IDS_PER_THREAD: usize = 20_000;

    let pool: Arc<EntropyPool<_>> = Arc::new(EntropyPool::new(OsRandom::new()).unwrap());

    let ids = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let pool = Arc::clone(&pool);
                s.spawn(move || {
                    (0..IDS_PER_THREAD)
                        .map(|_| pool.next_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), threads * IDS_PER_THREAD);
    assert!(ids.iter().all(Uuid::is_valid));
}

#[test]
fn init_fails_when_source_unavailable() {
    let result: Result<EntropyPool<_>> =
        EntropyPool::new(ScriptedSource::new(0, Failure::Unavailable));
    assert!(matches!(result, Err(Error::EntropyUnavailable { .. })));
}

#[test]
fn init_rejects_short_read() {
    let result: Result<EntropyPool<_>> = EntropyPool::new(ShortSource);
    match result {
        Err(Error::ShortRead { expected, actual }) => {
            assert_eq!(expected, DEFAULT_CAPACITY);
            assert_eq!(actual, DEFAULT_CAPACITY - 1);
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("short read accepted"),
    }
}

#[test]
fn failed_refill_never_serves_stale_bytes() {
    let pool: EntropyPool<_, 32> =
        EntropyPool::new(ScriptedSource::new(1, Failure::Unavailable)).unwrap();

    assert_eq!(pool.try_next_bytes().unwrap(), [1; BLOCK_SIZE]);
    assert_eq!(pool.try_next_bytes().unwrap(), [1; BLOCK_SIZE]);

    for _ in 0..3 {
        let err = pool.try_next_bytes().unwrap_err();
        assert_eq!(
            err,
            Error::EntropyUnavailable {
                reason: "device went away".into()
            }
        );
    }
    assert_eq!(pool.generation(), 1);
    assert!(pool.try_next_id().is_err());

    let source = pool.shutdown();
    // one good fill plus one attempt per failed call
    assert_eq!(source.fills, 1 + 4);
}

#[test]
fn short_refill_is_an_error() {
    let pool: EntropyPool<_, 16> =
        EntropyPool::new(ScriptedSource::new(1, Failure::Short)).unwrap();

    assert_eq!(pool.try_next_bytes().unwrap(), [1; BLOCK_SIZE]);
    assert_eq!(
        pool.try_next_bytes(),
        Err(Error::ShortRead {
            expected: 16,
            actual: 4
        })
    );
    // the partially overwritten arena stays exhausted
    assert!(matches!(
        pool.try_next_bytes(),
        Err(Error::ShortRead { .. })
    ));
    assert_eq!(pool.generation(), 1);
}

#[test]
fn refill_recovers_after_racing_threads() {
    // Many threads overrun a tiny arena at once; only one of them may refill
    // per cycle, the rest must retry against the fresh arena.
    const THREADS: usize = 16;
    const IDS_PER_THREAD: usize = 1_000;

    let pool: EntropyPool<_, 64> = EntropyPool::new(SequentialSource::default()).unwrap();

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..IDS_PER_THREAD {
                    pool.try_next_bytes().unwrap();
                }
            });
        }
    });

    let blocks_per_fill = 64 / BLOCK_SIZE;
    assert_eq!(
        pool.generation(),
        (THREADS * IDS_PER_THREAD / blocks_per_fill) as u64
    );
    let source = pool.shutdown();
    // two counters per block, none wasted
    assert_eq!(source.next, (THREADS * IDS_PER_THREAD * 2) as u64);
}

#[cfg(not(feature = "parking-lot"))]
#[test]
fn panicking_source_poisons_the_pool() {
    let pool: EntropyPool<_, 16> =
        EntropyPool::new(ScriptedSource::new(1, Failure::Panic)).unwrap();
    pool.next_bytes();

    let panicked = scope(|s| s.spawn(|| pool.try_next_bytes()).join().is_err());
    assert!(panicked);

    assert_eq!(pool.try_next_bytes(), Err(Error::LockPoisoned));

    // the handle can still be released
    let source = pool.shutdown();
    assert_eq!(source.fills, 2);
}

#[test]
fn generator_trait_works_through_references() {
    fn draw<G: UuidGenerator>(g: G) -> Uuid {
        g.next_id()
    }

    let pool: Arc<EntropyPool<_>> = Arc::new(EntropyPool::new(FixedSource(0xff)).unwrap());
    let by_ref = draw(&*pool);
    let by_arc = draw(Arc::clone(&pool));
    assert_eq!(by_ref, by_arc);
    assert_eq!(
        by_ref.to_u128(),
        0xffff_ffff_ffff_4fff_bfff_ffff_ffff_ffff
    );
}

#[cfg(unix)]
#[test]
fn dev_urandom_backs_a_pool() {
    use crate::DevUrandom;

    let pool: EntropyPool<_> = EntropyPool::new(DevUrandom::open().unwrap()).unwrap();
    let a = pool.next_id();
    let b = pool.next_id();
    assert_ne!(a, b);
    assert!(a.is_valid() && b.is_valid());
    drop(pool.shutdown());
}

#[cfg(unix)]
#[test]
fn missing_device_is_unavailable() {
    let err = crate::DevUrandom::open_path("/definitely/not/a/device").unwrap_err();
    assert!(matches!(err, Error::EntropyUnavailable { .. }));
    assert!(err.to_string().contains("/definitely/not/a/device"));
}
