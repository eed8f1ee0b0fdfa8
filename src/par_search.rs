use crate::cancel::Cancellation;
use crate::collision::{verify_collision, SearchOutcome};
use crate::config::SearchConfig;
use crate::digest::{tail, HexDigest};
use crate::errors::SearchError;
use crate::index::{IndexOutcome, SuffixIndex};
use crate::nonce::Candidates;
use crate::progress::SharedProgress;
use rayon::prelude::*;
use std::ops::{ControlFlow, Range};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Parallel version of `search::find_collision`
///
/// Produces the same outcome as the sequential search. Each phase splits its nonces into chunks
/// of `cancel_check_interval`; index chunks are merged keeping the smallest nonce per suffix and
/// scan chunks report their first hit, of which the leftmost wins. Cancellation is polled once per
/// chunk.
pub fn find_collision<D, C>(
    digest: &D,
    base_a: &str,
    base_b: &str,
    config: &SearchConfig,
    cancel: &C,
    threads: usize,
) -> Result<SearchOutcome, SearchError>
where
    D: HexDigest,
    C: Cancellation + Sync + ?Sized,
{
    config.validate(digest.hex_len())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(SearchError::ThreadPool)?;

    let a = Candidates::new(digest, base_a.as_bytes(), config.nonce_strategy);
    let b = Candidates::new(digest, base_b.as_bytes(), config.nonce_strategy);

    pool.install(|| {
        for num_digits in config.widths() {
            info!(
                num_digits,
                strategy = %config.nonce_strategy,
                threads,
                "Attempting to find a collision"
            );

            let index = match parallel_index(&a, num_digits, config, cancel) {
                IndexOutcome::Built(index) => index,
                IndexOutcome::Cancelled => return Ok(SearchOutcome::Cancelled),
            };

            match parallel_scan(&b, &index, config, cancel) {
                Some(Ok((nonce_a, nonce_b))) => {
                    return verify_collision(&a, &b, num_digits, nonce_a, nonce_b)
                        .map(SearchOutcome::Found);
                }
                Some(Err(Cancelled)) => return Ok(SearchOutcome::Cancelled),
                None => continue,
            }
        }

        Ok(SearchOutcome::Exhausted)
    })
}

struct Cancelled;

struct Chunks {
    len: u64,
    total: u64,
}

impl Chunks {
    fn new(config: &SearchConfig) -> Self {
        Chunks { len: config.cancel_check_interval, total: config.max_iterations }
    }

    fn count(&self) -> usize {
        ((self.total + self.len - 1) / self.len) as usize
    }

    fn range(&self, chunk: usize) -> Range<u64> {
        let start = chunk as u64 * self.len;
        start..(start + self.len).min(self.total)
    }
}

/// Polls `cancel` and latches the answer so later chunks skip their work
fn should_stop<C: Cancellation + ?Sized>(cancelled: &AtomicBool, cancel: &C) -> bool {
    if cancelled.load(Ordering::Relaxed) {
        return true;
    }
    if cancel.is_cancelled() {
        cancelled.store(true, Ordering::Relaxed);
        return true;
    }
    false
}

fn parallel_index<D, C>(
    a: &Candidates<D>,
    num_digits: usize,
    config: &SearchConfig,
    cancel: &C,
) -> IndexOutcome
where
    D: HexDigest,
    C: Cancellation + Sync + ?Sized,
{
    let progress = SharedProgress::start("index", num_digits);
    let chunks = Chunks::new(config);
    let cancelled = AtomicBool::new(false);

    let index = (0..chunks.count())
        .into_par_iter()
        .map(|chunk| {
            let mut local = SuffixIndex::new(num_digits);
            if should_stop(&cancelled, cancel) {
                return local;
            }
            let range = chunks.range(chunk);
            let len = range.end - range.start;
            let _ = a.sweep::<(), _>(range, |nonce, hex| {
                local.insert_first(tail(hex, num_digits), nonce);
                ControlFlow::Continue(())
            });
            progress.add(len);
            local
        })
        .reduce(|| SuffixIndex::new(num_digits), SuffixIndex::merge_min);

    if cancelled.load(Ordering::Relaxed) {
        return IndexOutcome::Cancelled;
    }

    progress.finish(config.max_iterations);
    debug!(num_digits, distinct_suffixes = index.len(), "Built suffix index");
    IndexOutcome::Built(index)
}

/// Returns the hit with the smallest `nonce_b`, `Err` if cancelled, or `None` on a miss
fn parallel_scan<D, C>(
    b: &Candidates<D>,
    index: &SuffixIndex,
    config: &SearchConfig,
    cancel: &C,
) -> Option<Result<(u64, u64), Cancelled>>
where
    D: HexDigest,
    C: Cancellation + Sync + ?Sized,
{
    let num_digits = index.num_digits();
    let progress = SharedProgress::start("scan", num_digits);
    let chunks = Chunks::new(config);
    let cancelled = AtomicBool::new(false);

    let hit = (0..chunks.count()).into_par_iter().find_map_first(|chunk| {
        if should_stop(&cancelled, cancel) {
            return None;
        }
        let range = chunks.range(chunk);
        let start = range.start;
        let flow = b.sweep(range, |nonce_b, hex| {
            match index.first_nonce(tail(hex, num_digits)) {
                Some(nonce_a) => ControlFlow::Break((nonce_a, nonce_b)),
                None => ControlFlow::Continue(()),
            }
        });
        let scanned = match &flow {
            ControlFlow::Break((_, nonce_b)) => nonce_b + 1 - start,
            ControlFlow::Continue(()) => chunks.range(chunk).end - start,
        };
        progress.add(scanned);
        match flow {
            ControlFlow::Break(hit) => Some(hit),
            ControlFlow::Continue(()) => None,
        }
    });

    if cancelled.load(Ordering::Relaxed) {
        return Some(Err(Cancelled));
    }

    if hit.is_none() {
        progress.finish(config.max_iterations);
    }
    hit.map(Ok)
}
