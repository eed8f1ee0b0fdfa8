use crate::digest::HexDigest;
use std::fmt;
use std::ops::{ControlFlow, Range};
use std::str::FromStr;

const NEWLINE_BLOCK: [u8; 4096] = [b'\n'; 4096];

/// How a nonce is turned into text appended to a base document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceStrategy {
    /// Appends the nonce in decimal, so nonce 0 appends "0" rather than nothing
    NumericSuffix,
    /// Appends `nonce` newline characters
    Newlines,
}

impl NonceStrategy {
    pub fn render(&self, nonce: u64) -> String {
        match self {
            NonceStrategy::NumericSuffix => nonce.to_string(),
            NonceStrategy::Newlines => "\n".repeat(nonce as usize),
        }
    }

    /// Iterations per phase used when none are configured
    pub fn default_iterations(&self) -> u64 {
        match self {
            NonceStrategy::NumericSuffix => 2_000_000,
            NonceStrategy::Newlines => 1_000_000,
        }
    }
}

impl FromStr for NonceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" | "number" | "numbers" => Ok(NonceStrategy::NumericSuffix),
            "newline" | "newlines" => Ok(NonceStrategy::Newlines),
            other => Err(format!(
                "unknown nonce strategy '{}' (expected numeric or newlines)",
                other
            )),
        }
    }
}

impl fmt::Display for NonceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceStrategy::NumericSuffix => write!(f, "numeric"),
            NonceStrategy::Newlines => write!(f, "newlines"),
        }
    }
}

/// The candidate texts of one base document under one digest and nonce strategy
pub struct Candidates<'a, D: HexDigest> {
    digest: &'a D,
    base: &'a [u8],
    strategy: NonceStrategy,
}

impl<'a, D: HexDigest> Candidates<'a, D> {
    pub fn new(digest: &'a D, base: &'a [u8], strategy: NonceStrategy) -> Self {
        Candidates { digest, base, strategy }
    }

    pub fn text(&self, nonce: u64) -> Vec<u8> {
        let suffix = self.strategy.render(nonce);
        let mut text = Vec::with_capacity(self.base.len() + suffix.len());
        text.extend_from_slice(self.base);
        text.extend_from_slice(suffix.as_bytes());
        text
    }

    /// Hashes the candidate for `nonce` from scratch, without reusing any prefix state
    pub fn digest_at(&self, nonce: u64) -> String {
        self.digest.hex_digest(&self.text(nonce))
    }

    /// Visits every nonce in `range` in ascending order along with its full hex digest
    ///
    /// Stops at the first `Break` returned by `visit` and hands it back. The digests are the same
    /// as `digest_at` would produce but are computed incrementally.
    pub fn sweep<B, F>(&self, range: Range<u64>, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(u64, &str) -> ControlFlow<B>,
    {
        let mut prefix = self.digest.start();
        self.digest.update(&mut prefix, self.base);

        match self.strategy {
            NonceStrategy::NumericSuffix => {
                for nonce in range {
                    let mut state = prefix.clone();
                    self.digest.update(&mut state, nonce.to_string().as_bytes());
                    let hex = self.digest.finish(state);
                    if let ControlFlow::Break(b) = visit(nonce, &hex) {
                        return ControlFlow::Break(b);
                    }
                }
            }
            NonceStrategy::Newlines => {
                // Bring the running state up to the first nonce of the range
                let mut remaining = range.start as usize;
                while remaining > 0 {
                    let n = remaining.min(NEWLINE_BLOCK.len());
                    self.digest.update(&mut prefix, &NEWLINE_BLOCK[..n]);
                    remaining -= n;
                }

                for nonce in range {
                    let hex = self.digest.finish(prefix.clone());
                    if let ControlFlow::Break(b) = visit(nonce, &hex) {
                        return ControlFlow::Break(b);
                    }
                    self.digest.update(&mut prefix, b"\n");
                }
            }
        }

        ControlFlow::Continue(())
    }
}
