//! Deterministic per-worker random streams.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Derive an independent stream for one worker from the master seed.
///
/// Splitmix-style avalanche of the worker index keeps nearby indices from
/// producing correlated ChaCha key material.
pub fn worker_rng(master: u64, worker: usize) -> ChaCha20Rng {
    let mut x = master ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    ChaCha20Rng::seed_from_u64(x ^ (x >> 31))
}
