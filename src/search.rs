use crate::cancel::Cancellation;
use crate::collision::{verify_collision, SearchOutcome};
use crate::config::SearchConfig;
use crate::digest::{tail, HexDigest};
use crate::errors::SearchError;
use crate::index::{build_suffix_index, IndexOutcome, SuffixIndex};
use crate::nonce::Candidates;
use crate::progress::Progress;
use std::ops::ControlFlow;
use tracing::info;

/// Finds the widest trailing-hex-digit collision between two base texts
///
/// For each width from `max_digits` down to `min_digits`, indexes the first `max_iterations`
/// candidates of `base_a` by suffix and then scans the candidates of `base_b` in ascending nonce
/// order, stopping at the first probe hit. The first width with a hit wins, so a narrower match
/// is never reported when a wider one was reachable within budget.
pub fn find_collision<D, C>(
    digest: &D,
    base_a: &str,
    base_b: &str,
    config: &SearchConfig,
    cancel: &C,
) -> Result<SearchOutcome, SearchError>
where
    D: HexDigest,
    C: Cancellation + ?Sized,
{
    config.validate(digest.hex_len())?;

    let a = Candidates::new(digest, base_a.as_bytes(), config.nonce_strategy);
    let b = Candidates::new(digest, base_b.as_bytes(), config.nonce_strategy);

    for num_digits in config.widths() {
        info!(num_digits, strategy = %config.nonce_strategy, "Attempting to find a collision");

        let index = match build_suffix_index(
            &a,
            num_digits,
            config.max_iterations,
            config.cancel_check_interval,
            cancel,
        ) {
            IndexOutcome::Built(index) => index,
            IndexOutcome::Cancelled => return Ok(SearchOutcome::Cancelled),
        };

        match scan_for_match(&b, &index, config, cancel) {
            Scan::Hit { nonce_a, nonce_b } => {
                return verify_collision(&a, &b, num_digits, nonce_a, nonce_b)
                    .map(SearchOutcome::Found);
            }
            Scan::Miss => continue,
            Scan::Cancelled => return Ok(SearchOutcome::Cancelled),
        }
    }

    Ok(SearchOutcome::Exhausted)
}

enum Scan {
    Hit { nonce_a: u64, nonce_b: u64 },
    Miss,
    Cancelled,
}

fn scan_for_match<D, C>(
    b: &Candidates<D>,
    index: &SuffixIndex,
    config: &SearchConfig,
    cancel: &C,
) -> Scan
where
    D: HexDigest,
    C: Cancellation + ?Sized,
{
    let num_digits = index.num_digits();
    let mut progress = Progress::start("scan", num_digits);

    let flow = b.sweep(0..config.max_iterations, |nonce_b, hex| {
        if nonce_b % config.cancel_check_interval == 0 && cancel.is_cancelled() {
            return ControlFlow::Break(Scan::Cancelled);
        }
        progress.tick(nonce_b);
        match index.first_nonce(tail(hex, num_digits)) {
            Some(nonce_a) => ControlFlow::Break(Scan::Hit { nonce_a, nonce_b }),
            None => ControlFlow::Continue(()),
        }
    });

    match flow {
        ControlFlow::Break(scan) => scan,
        ControlFlow::Continue(()) => {
            progress.finish(config.max_iterations);
            Scan::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::digest::{Md5Hex, Sha256Hex};
    use crate::errors::ConfigError;
    use crate::nonce::NonceStrategy;
    use std::cell::Cell;

    fn small_config(strategy: NonceStrategy) -> SearchConfig {
        SearchConfig::new(strategy)
            .with_digits(3, 2)
            .with_max_iterations(3_000)
            .with_cancel_check_interval(500)
    }

    #[test]
    fn identical_texts_collide_at_nonce_zero_at_max_width() {
        let config = SearchConfig::new(NonceStrategy::NumericSuffix).with_max_iterations(1);
        let outcome = find_collision(&Sha256Hex, "hello", "hello", &config, &NeverCancel).unwrap();

        let record = outcome.collision().expect("identical texts must collide");
        assert_eq!((record.num_digits, record.nonce_a, record.nonce_b), (8, 0, 0));
        // Nonce 0 appends "0", so the digest is of "hello0" rather than "hello"
        assert_eq!(record.digest_a, Sha256Hex.hex_digest(b"hello0"));
        assert_ne!(record.digest_a, Sha256Hex.hex_digest(b"hello"));
    }

    #[test]
    fn found_record_shares_suffix() {
        for strategy in [NonceStrategy::NumericSuffix, NonceStrategy::Newlines].iter() {
            let config = small_config(*strategy);
            let outcome = find_collision(&Sha256Hex, "cat", "dog", &config, &NeverCancel).unwrap();
            let record = outcome.collision().expect("2 or 3 digit collision within budget");

            let a = Candidates::new(&Sha256Hex, b"cat", *strategy);
            let b = Candidates::new(&Sha256Hex, b"dog", *strategy);
            assert_eq!(record.digest_a, a.digest_at(record.nonce_a));
            assert_eq!(record.digest_b, b.digest_at(record.nonce_b));
            let width = record.num_digits;
            assert_eq!(tail(&record.digest_a, width), tail(&record.digest_b, width));
            assert_eq!(record.suffix(), tail(&record.digest_b, width));
        }
    }

    #[test]
    fn reported_nonces_are_minimal() {
        let config = small_config(NonceStrategy::NumericSuffix);
        let outcome = find_collision(&Md5Hex, "alpha", "beta", &config, &NeverCancel).unwrap();
        let record = outcome.collision().expect("collision within budget");

        let a = Candidates::new(&Md5Hex, b"alpha", config.nonce_strategy);
        let b = Candidates::new(&Md5Hex, b"beta", config.nonce_strategy);
        let suffix = record.suffix().to_owned();

        for earlier in 0..record.nonce_a {
            assert_ne!(tail(&a.digest_at(earlier), record.num_digits), suffix);
        }

        let a_suffixes: std::collections::HashSet<String> = (0..config.max_iterations)
            .map(|n| tail(&a.digest_at(n), record.num_digits).to_owned())
            .collect();
        for earlier in 0..record.nonce_b {
            assert!(!a_suffixes.contains(tail(&b.digest_at(earlier), record.num_digits)));
        }
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let config = small_config(NonceStrategy::Newlines);
        let first = find_collision(&Sha256Hex, "left", "right", &config, &NeverCancel).unwrap();
        let second = find_collision(&Sha256Hex, "left", "right", &config, &NeverCancel).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn immediate_cancellation_is_an_outcome() {
        let config = small_config(NonceStrategy::NumericSuffix);
        let outcome = find_collision(&Sha256Hex, "cat", "dog", &config, &|| true).unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled);
    }

    #[test]
    fn cancellation_during_scan_stops_search() {
        // One poll during indexing (nonce 0), then the scan's first poll cancels
        let config = SearchConfig::new(NonceStrategy::NumericSuffix)
            .with_digits(8, 8)
            .with_max_iterations(100)
            .with_cancel_check_interval(100);
        let polls = Cell::new(0);
        let cancel = || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        };

        let outcome = find_collision(&Sha256Hex, "cat", "dog", &config, &cancel).unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn invalid_configuration_is_rejected_before_hashing() {
        let config = SearchConfig::new(NonceStrategy::NumericSuffix).with_digits(33, 3);
        let cancel = || -> bool { panic!("must not poll") };
        let err = find_collision(&Md5Hex, "cat", "dog", &config, &cancel).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Config(ConfigError::WidthExceedsDigest { max: 33, hex_len: 32 })
        ));
    }
}
