//! Node hashing for the sparse Merkle tree.
//!
//! The tree has a fixed depth of 256. Empty subtrees hash to zero at every
//! height and only two empty children merge to zero; any other pair is
//! hashed, so a node digest is bound to its position on the key path.

use crate::domain::{hash_pair, H256};

/// Level of the root node.
pub const TREE_HEIGHT: u16 = 256;

/// Digest of a leaf. Zero values are absent leaves.
pub fn leaf_hash(key: &H256, value: &H256) -> H256 {
    if value.is_zero() {
        return H256::zero();
    }
    hash_pair(key, value)
}

/// Digest of an inner node.
pub fn merge(left: &H256, right: &H256) -> H256 {
    if left.is_zero() && right.is_zero() {
        return H256::zero();
    }
    hash_pair(left, right)
}

/// Merge `node` with `sibling`, placing `node` by bit `height` of `key`.
pub fn merge_at(key: &H256, height: u8, node: &H256, sibling: &H256) -> H256 {
    if key.get_bit(height) {
        merge(sibling, node)
    } else {
        merge(node, sibling)
    }
}

/// Raise `node` from level `from` to level `to` through empty siblings.
pub fn lift(key: &H256, node: H256, from: u16, to: u16) -> H256 {
    if node.is_zero() {
        return node;
    }
    (from..to.min(TREE_HEIGHT)).fold(node, |acc, height| {
        merge_at(key, height as u8, &acc, &H256::zero())
    })
}
