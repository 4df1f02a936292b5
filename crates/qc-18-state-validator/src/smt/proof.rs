//! # Compiled Proof Encoding
//!
//! ```text
//! proof := declared_len:u32 LE ‖ entry*
//! entry := 0x4C                          LEAF   push the next claimed leaf
//!        | 0x50 height:u8 sibling:[32]   PROOF  merge top with a sibling
//!        | 0x48 height:u8                MERGE  merge the two top entries
//! ```
//!
//! Decoding never hashes; every length and opcode problem is caught here.

use crate::domain::{ProofError, H256, HASH_BYTES};

pub const OP_LEAF: u8 = 0x4C;
pub const OP_PROOF: u8 = 0x50;
pub const OP_MERGE: u8 = 0x48;

const HEADER_BYTES: usize = 4;

/// One decoded proof entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofOp {
    Leaf,
    Proof { height: u8, sibling: H256 },
    Merge { height: u8 },
}

impl ProofOp {
    fn encoded_len(&self) -> usize {
        match self {
            ProofOp::Leaf => 1,
            ProofOp::Proof { .. } => 2 + HASH_BYTES,
            ProofOp::Merge { .. } => 2,
        }
    }
}

/// Decoded compiled proof.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledProof {
    ops: Vec<ProofOp>,
}

impl CompiledProof {
    pub fn new(ops: Vec<ProofOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[ProofOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of LEAF entries.
    pub fn leaf_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == ProofOp::Leaf).count()
    }

    /// Encode with the declared length set to the entry count.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_with_declared_len(self.ops.len() as u32)
    }

    /// Encode with an arbitrary declared length.
    pub fn encode_with_declared_len(&self, declared: u32) -> Vec<u8> {
        let body: usize = self.ops.iter().map(ProofOp::encoded_len).sum();
        let mut out = Vec::with_capacity(HEADER_BYTES + body);
        out.extend_from_slice(&declared.to_le_bytes());
        for op in &self.ops {
            match op {
                ProofOp::Leaf => out.push(OP_LEAF),
                ProofOp::Proof { height, sibling } => {
                    out.push(OP_PROOF);
                    out.push(*height);
                    out.extend_from_slice(sibling.as_bytes());
                }
                ProofOp::Merge { height } => {
                    out.push(OP_MERGE);
                    out.push(*height);
                }
            }
        }
        out
    }

    /// Decode a proof, accepting at most `max_entries` declared entries.
    pub fn decode(bytes: &[u8], max_entries: usize) -> Result<Self, ProofError> {
        if bytes.len() < HEADER_BYTES {
            return Err(ProofError::InvalidProofLength {
                declared: 0,
                actual: 0,
            });
        }
        let mut header = [0u8; HEADER_BYTES];
        header.copy_from_slice(&bytes[..HEADER_BYTES]);
        let declared = u32::from_le_bytes(header) as usize;
        if declared > max_entries {
            return Err(ProofError::InsufficientCapacity {
                entries: declared,
                max: max_entries,
            });
        }

        let mut ops = Vec::with_capacity(declared);
        let mut rest = &bytes[HEADER_BYTES..];
        while let Some((&opcode, tail)) = rest.split_first() {
            let (op, tail) = match opcode {
                OP_LEAF => (ProofOp::Leaf, tail),
                OP_PROOF => {
                    if tail.len() < 1 + HASH_BYTES {
                        return Err(truncated(declared, ops.len()));
                    }
                    let mut sibling = [0u8; HASH_BYTES];
                    sibling.copy_from_slice(&tail[1..1 + HASH_BYTES]);
                    let op = ProofOp::Proof {
                        height: tail[0],
                        sibling: H256::new(sibling),
                    };
                    (op, &tail[1 + HASH_BYTES..])
                }
                OP_MERGE => {
                    let (&height, tail) = tail
                        .split_first()
                        .ok_or_else(|| truncated(declared, ops.len()))?;
                    (ProofOp::Merge { height }, tail)
                }
                other => {
                    return Err(ProofError::InvalidProof(format!(
                        "unknown opcode 0x{other:02X} at entry {}",
                        ops.len()
                    )))
                }
            };
            ops.push(op);
            rest = tail;
        }

        if ops.len() != declared {
            return Err(ProofError::InvalidProofLength {
                declared,
                actual: ops.len(),
            });
        }
        Ok(Self { ops })
    }
}

fn truncated(declared: usize, complete: usize) -> ProofError {
    ProofError::InvalidProofLength {
        declared,
        actual: complete,
    }
}
