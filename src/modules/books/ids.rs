//! Book id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// URL-safe alphabet used for random ids.
pub const URL_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_ID_LENGTH: usize = 16;

/// Source of identifiers for new books.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random ids drawn from [`URL_ALPHABET`]. Collisions are not checked.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| URL_ALPHABET[rng.gen_range(0..URL_ALPHABET.len())] as char)
            .collect()
    }
}

/// Deterministic ids of the form `{prefix}-000001`.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:06}", self.prefix, n)
    }
}
