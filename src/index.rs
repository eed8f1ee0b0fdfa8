use crate::cancel::Cancellation;
use crate::digest::{tail, HexDigest};
use crate::nonce::Candidates;
use crate::progress::Progress;
use std::collections::HashMap;
use std::ops::ControlFlow;
use tracing::debug;

/// Maps each trailing-hex suffix of a fixed width to the smallest nonce that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixIndex {
    num_digits: usize,
    first_nonces: HashMap<String, u64>,
}

impl SuffixIndex {
    pub fn new(num_digits: usize) -> Self {
        SuffixIndex { num_digits, first_nonces: HashMap::new() }
    }

    /// Pre-allocates for `max_iterations` nonces, capped by the number of possible suffixes
    pub fn with_capacity(num_digits: usize, max_iterations: u64) -> Self {
        let possible = 16u64.checked_pow(num_digits as u32).unwrap_or(u64::MAX);
        let capacity = max_iterations.min(possible) as usize;
        SuffixIndex { num_digits, first_nonces: HashMap::with_capacity(capacity) }
    }

    pub fn num_digits(&self) -> usize {
        self.num_digits
    }

    pub fn len(&self) -> usize {
        self.first_nonces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_nonces.is_empty()
    }

    pub fn first_nonce(&self, suffix: &str) -> Option<u64> {
        self.first_nonces.get(suffix).copied()
    }

    /// Records `nonce` for `suffix` unless an earlier nonce already claimed it
    ///
    /// Callers insert nonces in ascending order, so the first writer is the smallest nonce.
    #[inline]
    pub fn insert_first(&mut self, suffix: &str, nonce: u64) {
        if !self.first_nonces.contains_key(suffix) {
            self.first_nonces.insert(suffix.to_owned(), nonce);
        }
    }

    /// Combines two partial indexes, keeping the smaller nonce wherever both have a suffix
    pub fn merge_min(self, other: SuffixIndex) -> SuffixIndex {
        let (mut into, from) =
            if self.len() >= other.len() { (self, other) } else { (other, self) };
        for (suffix, nonce) in from.first_nonces {
            into.first_nonces
                .entry(suffix)
                .and_modify(|existing| *existing = (*existing).min(nonce))
                .or_insert(nonce);
        }
        into
    }
}

#[derive(Debug)]
pub enum IndexOutcome {
    Built(SuffixIndex),
    Cancelled,
}

/// Sweeps nonces `0..max_iterations` and indexes each digest's trailing `num_digits` hex digits
///
/// `cancel` is polled when the nonce is a multiple of `check_interval`, before that nonce is
/// indexed.
pub fn build_suffix_index<D, C>(
    candidates: &Candidates<D>,
    num_digits: usize,
    max_iterations: u64,
    check_interval: u64,
    cancel: &C,
) -> IndexOutcome
where
    D: HexDigest,
    C: Cancellation + ?Sized,
{
    let mut index = SuffixIndex::with_capacity(num_digits, max_iterations);
    let mut progress = Progress::start("index", num_digits);

    let flow = candidates.sweep(0..max_iterations, |nonce, hex| {
        if nonce % check_interval == 0 && cancel.is_cancelled() {
            return ControlFlow::Break(());
        }
        progress.tick(nonce);
        index.insert_first(tail(hex, num_digits), nonce);
        ControlFlow::Continue(())
    });

    match flow {
        ControlFlow::Break(()) => IndexOutcome::Cancelled,
        ControlFlow::Continue(()) => {
            progress.finish(max_iterations);
            debug!(num_digits, distinct_suffixes = index.len(), "Built suffix index");
            IndexOutcome::Built(index)
        }
    }
}
