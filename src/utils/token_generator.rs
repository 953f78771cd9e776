//! Random token generation over a configurable alphabet.
//!
//! Generators do not avoid collisions; callers check candidates against the
//! token existence cache.

use rand::Rng;

/// Default token alphabet: ASCII letters and digits.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Default token length.
pub const DEFAULT_LENGTH: usize = 10;

/// Produces candidate tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send + Sync + 'static {
    fn generate_token(&self) -> String;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenGeneratorError {
    #[error("Token alphabet must not be empty")]
    EmptyAlphabet,
    #[error("Token length must be greater than 0")]
    ZeroLength,
}

/// Draws each character independently and uniformly from the alphabet.
///
/// Uses the thread-local RNG, so a single instance can be shared between
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl TokenGenerator {
    /// Creates a generator for `length`-character tokens over `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns an error if the alphabet is empty or the length is zero.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, TokenGeneratorError> {
        let alphabet: Vec<char> = alphabet.chars().collect();

        if alphabet.is_empty() {
            return Err(TokenGeneratorError::EmptyAlphabet);
        }
        if length == 0 {
            return Err(TokenGeneratorError::ZeroLength);
        }

        Ok(Self { alphabet, length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_LENGTH,
        }
    }
}

impl TokenSource for TokenGenerator {
    fn generate_token(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}
