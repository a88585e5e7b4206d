//! Balanced hash trees
//!
//! A [`HashTree`] folds an ordered list of leaf byte strings into a
//! single root under a recipe. Every level rehashes its nodes, balances
//! an odd node count by inserting a synthetic hashed sibling (on the
//! left when the level number is even, on the right when odd) and then
//! concatenates adjacent pairs. The parity rule makes the tree
//! asymmetric but fully deterministic.

use crate::error::Result;
use crate::recipe::Recipe;
use std::time::Instant;
use tracing::debug;

/// A Merkle-style tree over owned leaf nodes
pub struct HashTree {
    /// Leaf nodes, replaced by intermediate nodes during computation
    pub nodes: Vec<Vec<u8>>,
    /// The recipe applied at every level
    pub recipe: Recipe,
    root: Option<Vec<u8>>,
    last_elapsed_ms: u64,
}

impl HashTree {
    /// Create a tree over `nodes` with the hashing recipe
    pub fn new(nodes: Vec<Vec<u8>>, recipe: Recipe) -> Self {
        Self {
            nodes,
            recipe,
            root: None,
            last_elapsed_ms: 0,
        }
    }

    /// The root of the last computation, if one has run over a non-empty
    /// node list
    pub fn root(&self) -> Option<&[u8]> {
        self.root.as_deref()
    }

    /// Wall-clock duration of the last `compute_root` call in
    /// milliseconds (informational)
    pub fn last_elapsed_ms(&self) -> u64 {
        self.last_elapsed_ms
    }

    /// Collapse the node list into the root
    ///
    /// The node list is consumed level by level; leaves are not retained.
    /// With an empty node list this is a successful no-op and the root
    /// stays absent.
    pub fn compute_root(&mut self) -> Result<()> {
        let started = Instant::now();
        if self.nodes.is_empty() {
            self.root = None;
            self.last_elapsed_ms = 0;
            return Ok(());
        }

        let mut nodes = std::mem::take(&mut self.nodes);
        let mut level = ceil_log2(nodes.len());
        while nodes.len() > 1 {
            for node in nodes.iter_mut() {
                *node = self.recipe.compute_hash(node)?;
            }
            if nodes.len() % 2 == 1 {
                if level % 2 == 0 {
                    let sibling = self.recipe.compute_hash(&nodes[nodes.len() - 1])?;
                    nodes.insert(0, sibling);
                } else {
                    let sibling = self.recipe.compute_hash(&nodes[0])?;
                    nodes.push(sibling);
                }
            }
            nodes = nodes
                .chunks_exact(2)
                .map(|pair| {
                    let mut joined = pair[0].clone();
                    joined.extend_from_slice(&pair[1]);
                    joined
                })
                .collect();
            level = level.saturating_sub(1);
        }
        let root = self.recipe.compute_hash(&nodes[0])?;

        self.last_elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            elapsed_ms = self.last_elapsed_ms,
            root = %hex::encode(&root),
            "computed tree root"
        );
        self.root = Some(root);
        Ok(())
    }
}

fn ceil_log2(n: usize) -> u32 {
    debug_assert!(n > 0);
    (n.max(1) as u64).next_power_of_two().trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestId;

    fn sha256_recipe() -> Recipe {
        Recipe::new(&[DigestId::Sha256]).unwrap()
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(9), 4);
    }

    #[test]
    fn test_empty_tree_has_no_root() {
        let mut tree = HashTree::new(vec![], sha256_recipe());
        tree.compute_root().unwrap();
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_single_leaf_root_is_recipe_of_leaf() {
        let mut tree = HashTree::new(vec![b"solo".to_vec()], sha256_recipe());
        tree.compute_root().unwrap();
        let expected = sha256_recipe().compute_hash(b"solo").unwrap();
        assert_eq!(tree.root().unwrap(), &expected[..]);
    }

    #[test]
    fn test_two_leaves_pair_then_collapse() {
        let mut tree = HashTree::new(
            vec![b"left".to_vec(), b"right".to_vec()],
            sha256_recipe(),
        );
        tree.compute_root().unwrap();

        let mut recipe = sha256_recipe();
        let mut joined = recipe.compute_hash(b"left").unwrap();
        joined.extend(recipe.compute_hash(b"right").unwrap());
        let expected = recipe.compute_hash(&joined).unwrap();
        assert_eq!(tree.root().unwrap(), &expected[..]);
    }

    #[test]
    fn test_three_leaves_balance_left() {
        // level 2 is even, so the synthetic sibling is prepended
        let leaves = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let mut tree = HashTree::new(leaves, sha256_recipe());
        tree.compute_root().unwrap();

        let mut r = sha256_recipe();
        let ha = r.compute_hash(b"a").unwrap();
        let hb = r.compute_hash(b"b").unwrap();
        let hc = r.compute_hash(b"c").unwrap();
        let sibling = r.compute_hash(&hc).unwrap();
        let mut row = vec![sibling, ha, hb, hc];
        while row.len() > 1 {
            row = row
                .chunks_exact(2)
                .map(|p| {
                    let mut joined = p[0].clone();
                    joined.extend_from_slice(&p[1]);
                    r.compute_hash(&joined).unwrap()
                })
                .collect();
        }
        let expected = &row[0];
        assert_eq!(tree.root().unwrap(), &expected[..]);
    }

    #[test]
    fn test_root_is_deterministic() {
        let leaves: Vec<Vec<u8>> = (0u8..7).map(|i| vec![i; 9]).collect();
        let mut first = HashTree::new(leaves.clone(), sha256_recipe());
        first.compute_root().unwrap();
        let mut second = HashTree::new(leaves, sha256_recipe());
        second.compute_root().unwrap();
        assert_eq!(first.root(), second.root());
    }
}
