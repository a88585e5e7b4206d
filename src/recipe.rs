//! Recipes: ordered digest compositions
//!
//! A recipe chains digests end to end: the output of stage `i` is the
//! input of stage `i + 1`. Stage order and count are fixed while a
//! computation is in flight; recipes own their digest instances.

use crate::digest::{create, Digest, DigestId};
use crate::error::{Error, Result};

/// An ordered, non-empty pipeline of digest instances
pub struct Recipe {
    ids: Vec<DigestId>,
    stages: Vec<Box<dyn Digest>>,
}

impl Recipe {
    /// Build a recipe from an ordered identifier list; fails with
    /// `InvalidConfig` when the list is empty
    pub fn new(ids: &[DigestId]) -> Result<Self> {
        if ids.is_empty() {
            return Err(Error::invalid_config("recipe must contain at least one digest"));
        }
        Ok(Self {
            ids: ids.to_vec(),
            stages: ids.iter().map(|&id| create(id)).collect(),
        })
    }

    /// Append a digest stage
    pub fn add(&mut self, id: DigestId) {
        self.ids.push(id);
        self.stages.push(create(id));
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the recipe has no stages (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The identifiers this recipe was built from, in order
    pub fn ids(&self) -> &[DigestId] {
        &self.ids
    }

    /// Output width of the final stage, in bits
    pub fn output_bits(&self) -> u32 {
        self.ids.last().map(|id| id.output_bits()).unwrap_or(0)
    }

    /// Output width of the final stage, in bytes
    pub fn output_len(&self) -> usize {
        (self.output_bits() / 8) as usize
    }

    /// Fold `bytes` through every stage in order
    pub fn compute_hash(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        match self.stages.len() {
            1 => self.stages[0].compute_bytes(bytes),
            2 => {
                let mid = self.stages[0].compute_bytes(bytes)?;
                self.stages[1].compute_bytes(&mid)
            }
            _ => {
                let mut out = self.stages[0].compute_bytes(bytes)?;
                for stage in &mut self.stages[1..] {
                    out = stage.compute_bytes(&out)?;
                }
                Ok(out)
            }
        }
    }
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe").field("ids", &self.ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recipe_rejected() {
        let err = Recipe::new(&[]).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_single_stage_matches_digest() {
        let mut recipe = Recipe::new(&[DigestId::Sha256]).unwrap();
        let direct = create(DigestId::Sha256).compute_bytes(b"abc").unwrap();
        assert_eq!(recipe.compute_hash(b"abc").unwrap(), direct);
    }

    #[test]
    fn test_two_stages_compose() {
        let mut recipe = Recipe::new(&[DigestId::Sha256, DigestId::Sha256]).unwrap();
        let inner = create(DigestId::Sha256).compute_bytes(b"abc").unwrap();
        let outer = create(DigestId::Sha256).compute_bytes(&inner).unwrap();
        assert_eq!(recipe.compute_hash(b"abc").unwrap(), outer);
    }

    #[test]
    fn test_long_recipe_equals_manual_fold() {
        let ids = [
            DigestId::Groestl256,
            DigestId::Jh384,
            DigestId::Skein256,
            DigestId::Blake512,
        ];
        let mut recipe = Recipe::new(&ids).unwrap();
        let mut expected = b"fold me".to_vec();
        for id in ids {
            expected = create(id).compute_bytes(&expected).unwrap();
        }
        assert_eq!(recipe.compute_hash(b"fold me").unwrap(), expected);
        assert_eq!(recipe.output_len(), 64);
    }

    #[test]
    fn test_add_appends_stage() {
        let mut recipe = Recipe::new(&[DigestId::Sha256]).unwrap();
        recipe.add(DigestId::QmhHuk224);
        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe.output_bits(), 224);
        let inner = create(DigestId::Sha256).compute_bytes(b"x").unwrap();
        let outer = create(DigestId::QmhHuk224).compute_bytes(&inner).unwrap();
        assert_eq!(recipe.compute_hash(b"x").unwrap(), outer);
    }

    #[test]
    fn test_recipe_is_reusable() {
        let mut recipe = Recipe::new(&[DigestId::Blake256, DigestId::Sha256]).unwrap();
        let a = recipe.compute_hash(b"again").unwrap();
        let b = recipe.compute_hash(b"again").unwrap();
        assert_eq!(a, b);
    }
}
