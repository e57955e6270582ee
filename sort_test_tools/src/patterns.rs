//! Input patterns for exercising sort implementations, all producing i32 values.
//!
//! Random values come from a seed that is fixed per process, so two calls with the same arguments
//! yield the same vector. Set `OVERRIDE_SEED` to reproduce a failing run.

use std::env;
use std::str::FromStr;
use std::sync::Mutex;

use rand::prelude::*;

use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(len)
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<rand::distributions::Uniform<i32>>,
{
    // :.:.:.::
    let mut rng = new_rng();
    let dist: rand::distributions::Uniform<i32> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    // https://en.wikipedia.org/wiki/Zipf's_law
    let mut rng = new_rng();

    match ZipfDistribution::new(len, exponent) {
        Ok(dist) => (0..len).map(|_| dist.sample(&mut rng) as i32).collect(),
        // Zero elements or a non-positive exponent.
        Err(()) => Vec::new(),
    }
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  sorted  unsorted

    // Existing sorted data with new unsorted values appended.
    let mut v = random_vec(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[..sorted_len.min(len)].sort_unstable();

    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    saw(len, saw_count, |_| Direction::Ascending)
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    saw(len, saw_count, |_| Direction::Descending)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let directions = random_uniform(saw_count.max(1) + 1, 0..=1);
    saw(len, saw_count, |i| {
        if directions[i] == 0 {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    })
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut vals = random_vec(len);

    let (first_half, second_half) = vals.split_at_mut(len / 2);
    first_half.sort();
    second_half.sort_by_key(|&e| std::cmp::Reverse(e));

    vals
}

/// Makes every following call to a random pattern draw a fresh seed.
///
/// Conflicts with `OVERRIDE_SEED`.
pub fn use_random_seed_each_time() {
    let (seed_type, _) = get_or_init_seed_type_and_value();
    if seed_type == SeedType::ExternalOverride {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    *lock_seed() = Some((SeedType::RandomEachTime, 0));
}

pub fn random_init_seed() -> u64 {
    get_or_init_seed_type_and_value().1
}

// --- Private ---

#[derive(Copy, Clone, PartialEq, Eq)]
enum SeedType {
    RandomEachTime,
    RandomOncePerProcess,
    ExternalOverride,
}

#[derive(Copy, Clone)]
enum Direction {
    Ascending,
    Descending,
}

static SEED_TYPE_AND_VALUE: Mutex<Option<(SeedType, u64)>> = Mutex::new(None);

fn lock_seed() -> std::sync::MutexGuard<'static, Option<(SeedType, u64)>> {
    // A test that panicked while holding the lock leaves a perfectly usable seed behind.
    SEED_TYPE_AND_VALUE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn get_or_init_seed_type_and_value() -> (SeedType, u64) {
    let (seed_type, seed_val) = *lock_seed().get_or_insert_with(|| {
        match env::var("OVERRIDE_SEED")
            .ok()
            .and_then(|seed| u64::from_str(seed.trim()).ok())
        {
            Some(override_seed) => (SeedType::ExternalOverride, override_seed),
            None => (SeedType::RandomOncePerProcess, thread_rng().gen()),
        }
    });

    if seed_type == SeedType::RandomEachTime {
        (SeedType::RandomEachTime, thread_rng().gen())
    } else {
        (seed_type, seed_val)
    }
}

fn new_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn random_vec(len: usize) -> Vec<i32> {
    let mut rng = new_rng();

    (0..len).map(|_| rng.gen::<i32>()).collect()
}

/// Random values cut into `saw_count` chunks, each sorted in the direction `direction_of` picks
/// for its index.
fn saw(len: usize, saw_count: usize, direction_of: impl Fn(usize) -> Direction) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut vals = random_vec(len);
    let chunk_len = (len / saw_count.max(1)).max(1);

    for (i, chunk) in vals.chunks_mut(chunk_len).enumerate() {
        match direction_of(i.min(saw_count)) {
            Direction::Ascending => chunk.sort(),
            Direction::Descending => chunk.sort_by_key(|&e| std::cmp::Reverse(e)),
        }
    }

    vals
}
