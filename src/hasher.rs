//! Incremental, keyed content hashing (spec.md §4.2, §4.4).
//!
//! The key is drawn once per process from the OS RNG, mirroring
//! `triblespace-core`'s `SIP_KEY`/`Once` pattern — every hash produced by a
//! given process run is comparable, but hashes are not stable across runs or
//! processes, which is fine since nothing here is persisted to disk.

use std::sync::OnceLock;

use siphasher::sip::SipHasher13;

static SIP_KEY: OnceLock<(u64, u64)> = OnceLock::new();

fn sip_key() -> (u64, u64) {
    *SIP_KEY.get_or_init(|| (rand::random(), rand::random()))
}

/// An incremental hasher over a commutative combination of fed chunks.
///
/// Containers fold their entries into a `Hasher` with [`Hasher::combine`]
/// rather than feeding them in sequence, so the resulting hash does not
/// depend on tree shape or traversal order (spec.md §4.2) — two maps with
/// the same entries hash identically regardless of how they were built.
pub struct Hasher {
    acc: u64,
}

impl Hasher {
    /// A fresh accumulator seeded from the identity element (`0`).
    #[must_use]
    pub fn new() -> Self {
        Self { acc: 0 }
    }

    /// Hashes `bytes` under the process key and folds the result in,
    /// order-independently.
    pub fn continue_bytes(&mut self, bytes: &[u8]) {
        let (k0, k1) = sip_key();
        let h = SipHasher13::new_with_keys(k0, k1);
        let mut h = h;
        std::hash::Hasher::write(&mut h, bytes);
        let digest = std::hash::Hasher::finish(&h);
        self.combine(digest);
    }

    /// Folds an already-computed digest (e.g. a nested container's cached
    /// hash) into the accumulator, commutatively.
    pub fn combine(&mut self, digest: u64) {
        self.acc ^= digest.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(31);
    }

    /// The accumulated digest.
    #[must_use]
    pub fn finish(&self) -> u64 {
        self.acc
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot hash of a single byte slice under the process key, used by
/// containers that need a scalar digest without building a [`Hasher`].
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let (k0, k1) = sip_key();
    let h = SipHasher13::new_with_keys(k0, k1);
    let mut h = h;
    std::hash::Hasher::write(&mut h, bytes);
    std::hash::Hasher::finish(&h)
}
