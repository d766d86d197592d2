//! Random identifiers: ISBN-shaped strings and uppercase tokens

use crate::error::{BookshelfError, BookshelfResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Separator kept verbatim by [`IdGenerator::generate_id`]
pub const ID_SEPARATOR: char = '-';

/// Pattern used for generated ISBNs
pub const ISBN_PATTERN: &str = "000-00-00000-00-0";

/// Contract for the ID utility
pub trait IdGenerator: Send + Sync {
    /// Replace every non-separator character of `pattern` with a random digit
    fn generate_id(&self, pattern: &str) -> BookshelfResult<String>;

    /// `length` uniformly random uppercase ASCII letters
    fn generate_token(&self, length: usize) -> BookshelfResult<String>;
}

/// [`IdGenerator`] backed by a `StdRng`
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
}

impl RandomIdGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator, for tests and reproducible fixtures
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate_id(&self, pattern: &str) -> BookshelfResult<String> {
        let mut rng = self.rng.lock()?;
        Ok(pattern
            .chars()
            .map(|c| {
                if c == ID_SEPARATOR {
                    c
                } else {
                    char::from(b'0' + rng.gen_range(0..10u8))
                }
            })
            .collect())
    }

    fn generate_token(&self, length: usize) -> BookshelfResult<String> {
        if length == 0 {
            return Err(BookshelfError::InvalidTokenLength);
        }
        let mut rng = self.rng.lock()?;
        Ok((0..length)
            .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
            .collect())
    }
}
