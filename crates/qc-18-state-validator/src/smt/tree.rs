//! # Sparse Merkle Tree
//!
//! In-memory 256-bit sparse Merkle tree. Computes roots and generates
//! compiled proofs for [`MerkleProofVerifier`](super::MerkleProofVerifier).
//!
//! Only non-zero leaves are stored. A subtree's digest is computed by
//! splitting its leaves at the highest bit on which they differ and lifting
//! the result through the empty levels above the split.

use crate::domain::H256;
use crate::smt::hashing::{leaf_hash, lift, merge, TREE_HEIGHT};
use crate::smt::proof::{CompiledProof, ProofOp};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseMerkleTree {
    leaves: BTreeMap<H256, H256>,
}

impl SparseMerkleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; later pairs overwrite earlier ones.
    pub fn from_leaves<I: IntoIterator<Item = (H256, H256)>>(leaves: I) -> Self {
        let mut tree = Self::new();
        for (key, value) in leaves {
            tree.update(key, value);
        }
        tree
    }

    /// Value at `key`, zero when absent.
    pub fn get(&self, key: &H256) -> H256 {
        self.leaves.get(key).copied().unwrap_or_default()
    }

    /// Set `key` to `value`. A zero value removes the leaf.
    pub fn update(&mut self, key: H256, value: H256) {
        if value.is_zero() {
            self.leaves.remove(&key);
        } else {
            self.leaves.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&H256, &H256)> {
        self.leaves.iter()
    }

    pub fn root(&self) -> H256 {
        subtree_root(&self.hashed_leaves(), TREE_HEIGHT)
    }

    /// Compiled proof covering `keys`, present or absent.
    pub fn merkle_proof(&self, keys: &[H256]) -> CompiledProof {
        let mut keys = keys.to_vec();
        keys.sort();
        keys.dedup();
        if keys.is_empty() {
            return CompiledProof::default();
        }

        let region = self.hashed_leaves();
        let mut ops = Vec::new();
        generate(&keys, &region, 256, &mut ops);
        CompiledProof::new(ops)
    }

    fn hashed_leaves(&self) -> Vec<(H256, H256)> {
        self.leaves
            .iter()
            .map(|(k, v)| (*k, leaf_hash(k, v)))
            .collect()
    }
}

/// Digest at `level` of a sorted slice of `(key, leaf_hash)` whose keys
/// agree on every bit at or above `level`.
fn subtree_root(region: &[(H256, H256)], level: u16) -> H256 {
    match region {
        [] => H256::zero(),
        [(key, hash)] => lift(key, *hash, 0, level),
        [(first, _), .., (last, _)] => match first.fork_height(last) {
            Some(height) => {
                let split = region.partition_point(|(k, _)| !k.get_bit(height));
                let (left, right) = region.split_at(split);
                let node = merge(
                    &subtree_root(left, u16::from(height)),
                    &subtree_root(right, u16::from(height)),
                );
                lift(first, node, u16::from(height) + 1, level)
            }
            None => H256::zero(),
        },
    }
}

/// Emit ops leaving one stack entry for the subtree below height `top`.
///
/// `keys` and `region` are sorted and agree on every bit at or above `top`.
fn generate(keys: &[H256], region: &[(H256, H256)], top: u16, ops: &mut Vec<ProofOp>) {
    let first = keys[0];
    let floor = match first.fork_height(&keys[keys.len() - 1]) {
        Some(fork) => u16::from(fork) + 1,
        None => 0,
    };

    // Walk down to where the keys fork, collecting non-empty siblings.
    let mut region = region;
    let mut siblings = Vec::new();
    for height in (floor..top).rev() {
        let height = height as u8;
        let split = region.partition_point(|(k, _)| !k.get_bit(height));
        let (zeros, ones) = region.split_at(split);
        let (path, other) = if first.get_bit(height) {
            (ones, zeros)
        } else {
            (zeros, ones)
        };
        let sibling = subtree_root(other, u16::from(height));
        if !sibling.is_zero() {
            siblings.push((height, sibling));
        }
        region = path;
    }

    if floor == 0 {
        ops.push(ProofOp::Leaf);
    } else {
        let fork = (floor - 1) as u8;
        let key_split = keys.partition_point(|k| !k.get_bit(fork));
        let region_split = region.partition_point(|(k, _)| !k.get_bit(fork));
        generate(&keys[..key_split], &region[..region_split], u16::from(fork), ops);
        generate(&keys[key_split..], &region[region_split..], u16::from(fork), ops);
        ops.push(ProofOp::Merge { height: fork });
    }

    for (height, sibling) in siblings.into_iter().rev() {
        ops.push(ProofOp::Proof { height, sibling });
    }
}
