//! # Value Objects
//!
//! Digests, account identifiers and the blake2b hashing used for tree nodes
//! and state keys.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Personalization shared by every digest in the state tree.
pub const HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Digest width in bytes.
pub const HASH_BYTES: usize = 32;

/// Number of bits in a key path.
pub const KEY_BITS: usize = HASH_BYTES * 8;

// =============================================================================
// H256
// =============================================================================

/// Fixed-width 256-bit digest, also used as a tree key and leaf value.
///
/// Bit `i` of a key path is `(bytes[i / 8] >> (i % 8)) & 1`; bit 255 is the
/// most significant, so ordering compares bytes from index 31 down to 0.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct H256([u8; HASH_BYTES]);

impl H256 {
    /// The all-zero digest (empty subtree / absent value).
    pub const fn zero() -> Self {
        Self([0u8; HASH_BYTES])
    }

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    /// True when every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// Copy out the raw bytes.
    pub fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }

    /// Read a single key path bit.
    #[inline]
    pub fn get_bit(&self, i: u8) -> bool {
        let i = i as usize;
        (self.0[i / 8] >> (i % 8)) & 1 != 0
    }

    /// Set a single key path bit.
    #[inline]
    pub fn set_bit(&mut self, i: u8) {
        let i = i as usize;
        self.0[i / 8] |= 1 << (i % 8);
    }

    /// Clear a single key path bit.
    #[inline]
    pub fn clear_bit(&mut self, i: u8) {
        let i = i as usize;
        self.0[i / 8] &= !(1 << (i % 8));
    }

    /// The key with every bit at or below `height` cleared.
    ///
    /// Two keys are in the same subtree at `height` iff their parent paths
    /// at `height` are equal.
    pub fn parent_path(&self, height: u8) -> Self {
        let mut out = *self;
        let height = height as usize;
        let full_bytes = (height + 1) / 8;
        for byte in out.0.iter_mut().take(full_bytes) {
            *byte = 0;
        }
        let rem = (height + 1) % 8;
        if rem != 0 && full_bytes < HASH_BYTES {
            out.0[full_bytes] &= 0xFFu8 << rem;
        }
        out
    }

    /// Highest bit index at which `self` and `other` differ.
    pub fn fork_height(&self, other: &H256) -> Option<u8> {
        (0..HASH_BYTES).rev().find_map(|byte| {
            let diff = self.0[byte] ^ other.0[byte];
            (diff != 0).then(|| (byte * 8 + 7 - diff.leading_zeros() as usize) as u8)
        })
    }

    /// Decode from a 64-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x")).ok()?;
        let arr: [u8; HASH_BYTES] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl From<[u8; HASH_BYTES]> for H256 {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<H256> for [u8; HASH_BYTES] {
    fn from(h: H256) -> Self {
        h.0
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Ord for H256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for H256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", hex::encode(self.0))
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// =============================================================================
// ACCOUNT ID
// =============================================================================

/// Process-unique account identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u32);

impl AccountId {
    /// Little-endian wire bytes, as used in state keys.
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl From<u32> for AccountId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// HASHING
// =============================================================================

/// Incremental blake2b-256 hasher with the tree personalization.
pub struct Blake2bHasher {
    state: blake2b_simd::State,
}

impl Blake2bHasher {
    pub fn new() -> Self {
        let state = blake2b_simd::Params::new()
            .hash_length(HASH_BYTES)
            .personal(HASH_PERSONALIZATION)
            .to_state();
        Self { state }
    }

    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.state.update(data);
        self
    }

    pub fn finalize(&self) -> H256 {
        let mut out = [0u8; HASH_BYTES];
        out.copy_from_slice(self.state.finalize().as_bytes());
        H256(out)
    }
}

impl Default for Blake2bHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot blake2b-256 of `data`.
pub fn blake2b(data: &[u8]) -> H256 {
    Blake2bHasher::new().update(data).finalize()
}

/// blake2b-256 of `left ‖ right`.
pub fn hash_pair(left: &H256, right: &H256) -> H256 {
    Blake2bHasher::new()
        .update(left.as_bytes())
        .update(right.as_bytes())
        .finalize()
}
