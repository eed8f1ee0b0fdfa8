use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

/// A hash function that renders its output as lowercase hex
///
/// Hashing is split into start/update/finish so that a state which has already absorbed a base
/// text can be cloned and extended once per nonce instead of rehashing the whole candidate.
pub trait HexDigest: Sync {
    type State: Clone;

    /// Number of hex characters produced by `finish`
    fn hex_len(&self) -> usize;

    fn start(&self) -> Self::State;

    fn update(&self, state: &mut Self::State, bytes: &[u8]);

    fn finish(&self, state: Self::State) -> String;

    fn hex_digest(&self, bytes: &[u8]) -> String {
        let mut state = self.start();
        self.update(&mut state, bytes);
        self.finish(state)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hex;

impl HexDigest for Sha256Hex {
    type State = Sha256;

    fn hex_len(&self) -> usize {
        64
    }

    fn start(&self) -> Sha256 {
        <Sha256 as sha2::Digest>::new()
    }

    fn update(&self, state: &mut Sha256, bytes: &[u8]) {
        sha2::Digest::update(state, bytes);
    }

    fn finish(&self, state: Sha256) -> String {
        hex::encode(sha2::Digest::finalize(state))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hex;

impl HexDigest for Md5Hex {
    type State = md5::Context;

    fn hex_len(&self) -> usize {
        32
    }

    fn start(&self) -> md5::Context {
        md5::Context::new()
    }

    fn update(&self, state: &mut md5::Context, bytes: &[u8]) {
        state.consume(bytes);
    }

    fn finish(&self, state: md5::Context) -> String {
        format!("{:x}", state.compute())
    }
}

/// Digest algorithms selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Md5,
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            "md5" => Ok(Algorithm::Md5),
            other => Err(format!("unknown digest algorithm '{}' (expected sha256 or md5)", other)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Sha256 => write!(f, "sha256"),
            Algorithm::Md5 => write!(f, "md5"),
        }
    }
}

/// Returns the trailing `n` hex characters of a digest
///
/// Panics if `n` exceeds the digest length; widths are validated against `hex_len` before any
/// search starts.
#[inline]
pub fn tail(hex: &str, n: usize) -> &str {
    &hex[hex.len() - n..]
}
