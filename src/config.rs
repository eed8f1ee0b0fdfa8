use crate::errors::ConfigError;
use crate::nonce::NonceStrategy;

pub const DEFAULT_MAX_DIGITS: usize = 8;
pub const DEFAULT_MIN_DIGITS: usize = 3;
pub const DEFAULT_CANCEL_CHECK_INTERVAL: u64 = 10_000;

/// Parameters of one collision search run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Widest suffix tried, first
    pub max_digits: usize,
    /// Narrowest suffix accepted
    pub min_digits: usize,
    /// Nonces tried per document for each width
    pub max_iterations: u64,
    pub nonce_strategy: NonceStrategy,
    /// Cancellation is polled once every this many nonces
    pub cancel_check_interval: u64,
}

impl SearchConfig {
    pub fn new(nonce_strategy: NonceStrategy) -> Self {
        SearchConfig {
            max_digits: DEFAULT_MAX_DIGITS,
            min_digits: DEFAULT_MIN_DIGITS,
            max_iterations: nonce_strategy.default_iterations(),
            nonce_strategy,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }

    pub fn with_digits(mut self, max_digits: usize, min_digits: usize) -> Self {
        self.max_digits = max_digits;
        self.min_digits = min_digits;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_cancel_check_interval(mut self, interval: u64) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    /// Checks the configuration against a digest producing `hex_len` hex characters
    pub fn validate(&self, hex_len: usize) -> Result<(), ConfigError> {
        if self.min_digits == 0 {
            return Err(ConfigError::ZeroMinDigits);
        }
        if self.min_digits > self.max_digits {
            return Err(ConfigError::MinAboveMax { min: self.min_digits, max: self.max_digits });
        }
        if self.max_digits > hex_len {
            return Err(ConfigError::WidthExceedsDigest { max: self.max_digits, hex_len });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.cancel_check_interval == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        Ok(())
    }

    /// Suffix widths in the order they are tried, widest first
    pub fn widths(&self) -> impl Iterator<Item = usize> {
        (self.min_digits..=self.max_digits).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_strategy() {
        let numeric = SearchConfig::new(NonceStrategy::NumericSuffix);
        assert_eq!(numeric.max_iterations, 2_000_000);
        assert_eq!((numeric.max_digits, numeric.min_digits), (8, 3));

        let newlines = SearchConfig::new(NonceStrategy::Newlines);
        assert_eq!(newlines.max_iterations, 1_000_000);
        assert_eq!(newlines.cancel_check_interval, 10_000);
    }

    #[test]
    fn widths_descend_inclusive() {
        let config = SearchConfig::new(NonceStrategy::NumericSuffix).with_digits(5, 3);
        assert_eq!(config.widths().collect::<Vec<_>>(), vec![5, 4, 3]);
    }

    #[test]
    fn validate_rejects_bad_configurations() {
        let base = SearchConfig::new(NonceStrategy::NumericSuffix);
        assert_eq!(base.validate(64), Ok(()));

        assert_eq!(base.clone().with_digits(4, 0).validate(64), Err(ConfigError::ZeroMinDigits));
        assert_eq!(
            base.clone().with_digits(3, 4).validate(64),
            Err(ConfigError::MinAboveMax { min: 4, max: 3 })
        );
        assert_eq!(
            base.clone().with_digits(33, 3).validate(32),
            Err(ConfigError::WidthExceedsDigest { max: 33, hex_len: 32 })
        );
        assert_eq!(
            base.clone().with_max_iterations(0).validate(64),
            Err(ConfigError::ZeroIterations)
        );
        assert_eq!(
            base.with_cancel_check_interval(0).validate(64),
            Err(ConfigError::ZeroCheckInterval)
        );
    }
}
