//! Injectable source of identifiers and secret random bytes.

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::Uuid;

/// Generates row identifiers and fills buffers with random bytes.
///
/// Implementations used outside tests must draw from a cryptographically
/// secure source, since the same bytes become invite tokens.
pub trait IdGenerator: Send + Sync + 'static {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Produce a fresh random (version 4) UUID.
    fn new_uuid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsIdGenerator;

impl IdGenerator for OsIdGenerator {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}

/// Deterministic generator for reproducible tests. Not for production use.
#[derive(Debug)]
pub struct SeededIdGenerator {
    rng: Mutex<StdRng>,
}

impl SeededIdGenerator {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for SeededIdGenerator {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.fill_bytes(dest);
    }
}
