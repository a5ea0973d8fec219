use crate::Generator;
use std::sync::atomic::{AtomicU64, Ordering};
use stubby_core::shortcode::{ALPHABET, CODE_LENGTH};
use stubby_core::ShortCode;

/// Number of distinct codes of [`CODE_LENGTH`] symbols.
const KEY_SPACE: u64 = 62u64.pow(CODE_LENGTH as u32);

/// A deterministic generator that base62-encodes a counter.
///
/// Produces "000000", "000001", ..., "00000Z", "000010", ... and wraps
/// around after the last code. Useful for reproducible environments; the
/// codes are trivially guessable, so prefer [`RandomGenerator`] otherwise.
///
/// [`RandomGenerator`]: crate::RandomGenerator
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqGenerator {
    /// Creates a sequential generator starting at "000000".
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a sequential generator starting from a specific counter value.
    ///
    /// Useful for resuming from a known state.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(mut value: u64) -> String {
        let mut buf = [ALPHABET[0]; CODE_LENGTH];
        for slot in buf.iter_mut().rev() {
            *slot = ALPHABET[(value % 62) as usize];
            value /= 62;
        }
        buf.iter().map(|b| *b as char).collect()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(Self::encode(count % KEY_SPACE))
    }
}
