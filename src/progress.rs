use std::sync::atomic::{AtomicU64, Ordering};
use std::time;
use tracing::info;

const TIMED_ITERATIONS: u64 = 1_000_000;

/// Periodic rate logging for one search phase
pub struct Progress {
    phase: &'static str,
    num_digits: usize,
    start: time::Instant,
    loop_start: time::Instant,
}

impl Progress {
    pub fn start(phase: &'static str, num_digits: usize) -> Self {
        let now = time::Instant::now();
        Progress { phase, num_digits, start: now, loop_start: now }
    }

    #[inline]
    pub fn tick(&mut self, iteration: u64) {
        if iteration == 0 || iteration % TIMED_ITERATIONS != 0 {
            return;
        }
        let iter_rate = (TIMED_ITERATIONS as f32) / self.loop_start.elapsed().as_secs_f32();
        info!(
            phase = self.phase,
            num_digits = self.num_digits,
            "Reached {} iterations, running {} iterations / s",
            iteration,
            iter_rate
        );
        self.loop_start = time::Instant::now();
    }

    pub fn finish(&self, iterations: u64) {
        info!(
            phase = self.phase,
            num_digits = self.num_digits,
            "Completed running {} iterations in {} seconds",
            iterations,
            self.start.elapsed().as_secs_f32()
        );
    }
}

/// Rate logging for a phase whose iterations are counted from several worker threads
pub struct SharedProgress {
    phase: &'static str,
    num_digits: usize,
    start: time::Instant,
    done: AtomicU64,
}

impl SharedProgress {
    pub fn start(phase: &'static str, num_digits: usize) -> Self {
        SharedProgress { phase, num_digits, start: time::Instant::now(), done: AtomicU64::new(0) }
    }

    /// Records `iterations` more finished nonces, logging when a multiple of the cadence is crossed
    pub fn add(&self, iterations: u64) {
        let before = self.done.fetch_add(iterations, Ordering::Relaxed);
        let after = before + iterations;
        if after / TIMED_ITERATIONS == before / TIMED_ITERATIONS {
            return;
        }
        let iter_rate = (after as f32) / self.start.elapsed().as_secs_f32();
        info!(
            phase = self.phase,
            num_digits = self.num_digits,
            "Reached {} iterations, running {} iterations / s",
            after,
            iter_rate
        );
    }

    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    pub fn finish(&self, iterations: u64) {
        info!(
            phase = self.phase,
            num_digits = self.num_digits,
            "Completed running {} iterations in {} seconds",
            iterations,
            self.start.elapsed().as_secs_f32()
        );
    }
}
