//! # Merkle Proof Verifier
//!
//! Replays a compiled proof over a set of claimed leaves and checks the
//! reconstructed root.
//!
//! ## Algorithm
//!
//! 1. Decode the whole proof (lengths and opcodes) before any hashing.
//! 2. Normalize the leaves: sort by key path and collapse repeated claims.
//!    Two claims for one key with different values are rejected.
//! 3. LEAF pushes the next leaf; PROOF folds a sibling into the top entry at
//!    a height; MERGE folds the two top entries, which must be siblings.
//! 4. Heights only climb: an entry merged at `h` may next merge at `h + 1`.
//!    Heights skipped between two steps are empty siblings and are hashed
//!    as such, up to the root at level 256.
//! 5. Every leaf must be consumed and exactly one entry must remain.
//!
//! The verifier holds no state between calls.

use crate::config::ValidatorConfig;
use crate::domain::{ProofError, H256};
use crate::smt::hashing::{leaf_hash, lift, merge, merge_at, TREE_HEIGHT};
use crate::smt::proof::{CompiledProof, ProofOp};
use crate::smt::stack::{ProofStack, StackEntry};

/// Stateless compiled proof verifier.
#[derive(Clone, Copy, Debug)]
pub struct MerkleProofVerifier {
    stack_capacity: usize,
    max_proof_entries: usize,
}

impl MerkleProofVerifier {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self::with_limits(config.smt_stack_capacity, config.max_proof_entries)
    }

    pub fn with_limits(stack_capacity: usize, max_proof_entries: usize) -> Self {
        Self {
            stack_capacity,
            max_proof_entries,
        }
    }

    /// Check that `leaves` are members of the tree committed to by `root`.
    ///
    /// A zero value claims the key is absent. Repeating a key with the same
    /// value is allowed; repeating it with another value is `InvalidProof`.
    pub fn verify(
        &self,
        root: &H256,
        leaves: &[(H256, H256)],
        proof: &[u8],
    ) -> Result<(), ProofError> {
        let computed = self.compute_root(leaves, proof)?;
        if computed != *root {
            return Err(ProofError::InvalidProof(format!(
                "root mismatch: computed {computed}, expected {root}"
            )));
        }
        Ok(())
    }

    /// Decode `proof` and return the root it implies for `leaves`.
    ///
    /// Siblings do not depend on the proven values, so the same proof gives
    /// the post-state root when fed the new values.
    pub fn compute_root(&self, leaves: &[(H256, H256)], proof: &[u8]) -> Result<H256, ProofError> {
        let proof = CompiledProof::decode(proof, self.max_proof_entries)?;
        self.replay(leaves, &proof)
    }

    /// Root implied by an already decoded proof.
    pub fn replay(&self, leaves: &[(H256, H256)], proof: &CompiledProof) -> Result<H256, ProofError> {
        if proof.len() > self.max_proof_entries {
            return Err(ProofError::InsufficientCapacity {
                entries: proof.len(),
                max: self.max_proof_entries,
            });
        }

        let leaves = normalize_claims(leaves)?;
        let mut stack = ProofStack::with_capacity(self.stack_capacity);
        let mut next_leaf = 0usize;

        for (index, op) in proof.ops().iter().enumerate() {
            match *op {
                ProofOp::Leaf => {
                    let (key, value) = leaves.get(next_leaf).ok_or_else(|| {
                        ProofError::InvalidProof(format!(
                            "entry {index} references leaf {next_leaf} of {}",
                            leaves.len()
                        ))
                    })?;
                    next_leaf += 1;
                    stack.push(StackEntry::leaf(*key, leaf_hash(key, value)))?;
                }
                ProofOp::Proof { height, sibling } => {
                    let top = stack.peek_mut()?;
                    ensure_climbing(top, height)?;
                    let node = lift(&top.key, top.value, top.height, u16::from(height));
                    top.value = merge_at(&top.key, height, &node, &sibling);
                    top.height = u16::from(height) + 1;
                }
                ProofOp::Merge { height } => {
                    let right = stack.pop()?;
                    let left = stack.pop()?;
                    ensure_climbing(&left, height)?;
                    ensure_climbing(&right, height)?;
                    if left.key.parent_path(height) != right.key.parent_path(height)
                        || left.key.get_bit(height)
                        || !right.key.get_bit(height)
                    {
                        return Err(ProofError::InvalidSibling { height });
                    }
                    let left_node = lift(&left.key, left.value, left.height, u16::from(height));
                    let right_node = lift(&right.key, right.value, right.height, u16::from(height));
                    stack.push(StackEntry {
                        key: left.key,
                        value: merge(&left_node, &right_node),
                        height: u16::from(height) + 1,
                    })?;
                }
            }
        }

        if next_leaf != leaves.len() {
            return Err(ProofError::InvalidProof(format!(
                "{} of {} leaves not covered by the proof",
                leaves.len() - next_leaf,
                leaves.len()
            )));
        }

        let root = stack.into_single()?;
        Ok(lift(&root.key, root.value, root.height, TREE_HEIGHT))
    }
}

impl Default for MerkleProofVerifier {
    fn default() -> Self {
        Self::new(&ValidatorConfig::default())
    }
}

fn ensure_climbing(entry: &StackEntry, height: u8) -> Result<(), ProofError> {
    if u16::from(height) < entry.height {
        return Err(ProofError::InvalidSibling { height });
    }
    Ok(())
}

/// Sort claims by key path, rejecting a key claimed with two values.
pub fn normalize_claims(leaves: &[(H256, H256)]) -> Result<Vec<(H256, H256)>, ProofError> {
    let mut sorted = leaves.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0 && w[0].1 != w[1].1) {
        return Err(ProofError::InvalidProof(format!(
            "conflicting claims for key {}",
            pair[0].0
        )));
    }
    sorted.dedup_by(|later, earlier| later.0 == earlier.0);
    Ok(sorted)
}

/// Sort leaves by key path and drop repeated keys, keeping the first claim.
pub fn normalize_leaves(leaves: &[(H256, H256)]) -> Vec<(H256, H256)> {
    let mut sorted = leaves.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted.dedup_by(|later, earlier| later.0 == earlier.0);
    sorted
}
