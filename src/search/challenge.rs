//! Challenge predicates deciding when a search digest wins

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Predicate over `(digest, target)` defining search success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Challenge {
    /// Big-endian magnitude comparison: digest <= target, equal lengths
    #[default]
    LessOrEqual,
    /// The digest must begin with the target bytes
    StartsWith,
}

impl Challenge {
    /// Validate a target against the digest width the recipe produces
    pub fn validate(&self, target: &[u8], digest_len: usize) -> Result<()> {
        match self {
            Challenge::LessOrEqual => {
                if target.len() != digest_len {
                    return Err(Error::invalid_config(format!(
                        "less-or-equal target must match the digest width: \
                         target is {} bytes, digest is {}",
                        target.len(),
                        digest_len
                    )));
                }
            }
            Challenge::StartsWith => {
                if target.is_empty() {
                    return Err(Error::invalid_config("starts-with target is empty"));
                }
                if target.len() > digest_len {
                    return Err(Error::invalid_config(format!(
                        "starts-with target is longer than the digest: \
                         {} bytes against {}",
                        target.len(),
                        digest_len
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether `digest` satisfies the challenge against `target`
    ///
    /// Assumes lengths were checked by [`Challenge::validate`]; a
    /// mismatched pair simply fails the predicate.
    pub fn matches(&self, digest: &[u8], target: &[u8]) -> bool {
        match self {
            Challenge::LessOrEqual => {
                digest.len() == target.len()
                    && matches!(digest.cmp(target), Ordering::Less | Ordering::Equal)
            }
            Challenge::StartsWith => {
                digest.len() >= target.len() && digest.starts_with(target)
            }
        }
    }
}
