//! # Hashforge
//!
//! A byte-oriented digest toolkit built around four pieces:
//!
//! - **Digest families**: SHA-1/SHA-2, the QmhHuk SHA-2 variant, and the
//!   SHA-3 finalists Blake, Grøstl, JH and Skein, each at 224/256/384/512
//!   bit output widths behind a single [`digest::Digest`] trait.
//! - **Recipes**: ordered digest compositions where each stage hashes the
//!   previous stage's output.
//! - **Hash trees**: a Merkle-style tree with a deterministic,
//!   level-parity balancing rule.
//! - **Nonce search**: a proof-of-work driver that mutates a nonce region
//!   embedded in a message until the recipe digest satisfies a challenge
//!   predicate.
//!
//! All computation is synchronous and CPU-bound. Digest instances are not
//! shared between callers; parallel searches instantiate independent
//! recipes per worker.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications,
    clippy::all
)]
#![forbid(unsafe_code)]

pub mod digest;
pub mod error;
pub mod recipe;
pub mod search;
pub mod source;
pub mod tree;
pub mod utils;

pub use crate::error::{Error, Result};
pub use digest::{create, Digest, DigestId};
pub use recipe::Recipe;
pub use search::{Challenge, NoncePosition, SearchConfig, SearchResult};
pub use source::{MessageSource, ReaderSource, SliceSource};
pub use tree::HashTree;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        digest::{create, Digest, DigestId},
        error::{Error, Result},
        recipe::Recipe,
        search::{Challenge, NoncePosition, SearchConfig, SearchResult},
        source::{MessageSource, ReaderSource, SliceSource},
        tree::HashTree,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
