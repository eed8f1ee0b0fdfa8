//! Finds partial digest collisions between two base texts
//!
//! A width-`n` collision is a pair of candidate texts, one derived from each base text by
//! appending a nonce, whose hex digests agree in their last `n` characters, e.g. two digests
//! ending in `...07c3a4e3c` and `...91d2a4e3c` form a width-6 collision.
//!
//! The search indexes one text's candidates by suffix and streams the other's against the index,
//! trying the widest suffix first.

pub mod cancel;
pub mod collision;
pub mod config;
pub mod digest;
pub mod document;
pub mod errors;
pub mod index;
pub mod nonce;
pub mod par_search;
pub mod progress;
pub mod report;
pub mod search;

pub use cancel::{Cancellation, NeverCancel};
pub use collision::{CollisionRecord, SearchOutcome};
pub use config::SearchConfig;
pub use digest::{Algorithm, HexDigest, Md5Hex, Sha256Hex};
pub use errors::{ConfigError, SearchError};
pub use nonce::NonceStrategy;
