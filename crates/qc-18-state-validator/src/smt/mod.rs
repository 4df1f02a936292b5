//! # Sparse Merkle Tree
//!
//! Compiled proof encoding, replay verification, proof generation and the
//! bounded key-value state used during execution.

pub mod hashing;
pub mod kv_state;
pub mod proof;
pub mod stack;
pub mod tree;
pub mod verifier;

pub use kv_state::KvState;
pub use proof::{CompiledProof, ProofOp};
pub use stack::{ProofStack, StackEntry, DEFAULT_STACK_CAPACITY};
pub use tree::SparseMerkleTree;
pub use verifier::{normalize_claims, normalize_leaves, MerkleProofVerifier};
