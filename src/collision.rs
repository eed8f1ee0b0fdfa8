use crate::digest::{tail, HexDigest};
use crate::errors::SearchError;
use crate::nonce::Candidates;

/// A verified pair of nonces whose digests share their trailing `num_digits` hex characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionRecord {
    pub num_digits: usize,
    pub nonce_a: u64,
    pub nonce_b: u64,
    pub digest_a: String,
    pub digest_b: String,
}

impl CollisionRecord {
    /// The shared trailing hex digits
    pub fn suffix(&self) -> &str {
        tail(&self.digest_a, self.num_digits)
    }
}

/// How a search run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(CollisionRecord),
    /// Every width down to `min_digits` ran its full budget without a match.
    Exhausted,
    Cancelled,
}

impl SearchOutcome {
    pub fn collision(&self) -> Option<&CollisionRecord> {
        match self {
            SearchOutcome::Found(record) => Some(record),
            _ => None,
        }
    }
}

/// Rehashes both candidates from scratch and checks they really share `num_digits` trailing digits
pub fn verify_collision<D: HexDigest>(
    a: &Candidates<D>,
    b: &Candidates<D>,
    num_digits: usize,
    nonce_a: u64,
    nonce_b: u64,
) -> Result<CollisionRecord, SearchError> {
    let digest_a = a.digest_at(nonce_a);
    let digest_b = b.digest_at(nonce_b);

    if tail(&digest_a, num_digits) != tail(&digest_b, num_digits) {
        return Err(SearchError::SuffixMismatch {
            num_digits,
            nonce_a,
            nonce_b,
            digest_a,
            digest_b,
        });
    }

    Ok(CollisionRecord { num_digits, nonce_a, nonce_b, digest_a, digest_b })
}
