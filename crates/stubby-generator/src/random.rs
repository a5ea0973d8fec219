use crate::Generator;
use rand::Rng;
use stubby_core::shortcode::{ALPHABET, CODE_LENGTH};
use stubby_core::ShortCode;

/// Draws each symbol uniformly from the base62 alphabet.
///
/// Uses the thread-local generator from `rand`, a CSPRNG seeded and
/// periodically reseeded from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
