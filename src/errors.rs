//! Error types for configuring and running a collision search.
//!
//! Exhaustion and cancellation are outcomes, not errors; see `SearchOutcome`.

use std::error::Error;
use std::fmt;

/// A search configuration that cannot be run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero-width suffix matches everything.
    ZeroMinDigits,
    /// The width sweep would be empty.
    MinAboveMax { min: usize, max: usize },
    /// More digits requested than the digest produces.
    WidthExceedsDigest { max: usize, hex_len: usize },
    /// Each phase needs at least one nonce.
    ZeroIterations,
    /// Cancellation must be polled at some cadence.
    ZeroCheckInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMinDigits => write!(f, "min_digits must be at least 1"),
            Self::MinAboveMax { min, max } => {
                write!(f, "min_digits ({}) is greater than max_digits ({})", min, max)
            }
            Self::WidthExceedsDigest { max, hex_len } => write!(
                f,
                "There are only {} hex digits in the digest, \
                 therefore there are no collisions for {} digits",
                hex_len, max
            ),
            Self::ZeroIterations => write!(f, "max_iterations must be at least 1"),
            Self::ZeroCheckInterval => write!(f, "cancel_check_interval must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug)]
pub enum SearchError {
    Config(ConfigError),
    /// Recomputed digests disagree on the suffix the index reported as shared.
    ///
    /// This means the index or the digest implementation is inconsistent between phases.
    SuffixMismatch {
        num_digits: usize,
        nonce_a: u64,
        nonce_b: u64,
        digest_a: String,
        digest_b: String,
    },
    /// The worker pool for a parallel search could not be created.
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid search configuration: {}", err),
            Self::SuffixMismatch { num_digits, nonce_a, nonce_b, digest_a, digest_b } => write!(
                f,
                "internal error: nonces {} and {} were indexed as sharing {} trailing hex digits \
                 but hash to {} and {}",
                nonce_a, nonce_b, num_digits, digest_a, digest_b
            ),
            Self::ThreadPool(err) => write!(f, "failed to build worker pool: {}", err),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::ThreadPool(err) => Some(err),
            Self::SuffixMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for SearchError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
