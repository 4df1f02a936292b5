//! # State Keys
//!
//! Layout of account fields, account storage and data markers inside the
//! single sparse Merkle tree.

use crate::domain::value_objects::{AccountId, Blake2bHasher, H256, HASH_BYTES};

/// Account storage slot.
pub const KEY_TYPE_ACCOUNT_KV: u8 = 0;
/// Account nonce field.
pub const KEY_TYPE_NONCE: u8 = 1;
/// Account script code hash field.
pub const KEY_TYPE_SCRIPT_CODE_HASH: u8 = 2;
/// Index from a script code hash to the first account bound to it.
pub const KEY_TYPE_SCRIPT_HASH_TO_ID: u8 = 3;
/// Data cell existence marker.
pub const KEY_TYPE_DATA_HASH: u8 = 4;
/// Global account counter.
pub const KEY_TYPE_ACCOUNT_COUNT: u8 = 6;

/// Value stored under a data hash key when the cell exists.
pub fn data_marker() -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[0] = 1;
    H256::new(bytes)
}

/// `id LE ‖ field_type`, zero padded.
pub fn account_field_key(id: AccountId, field_type: u8) -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[..4].copy_from_slice(&id.to_le_bytes());
    bytes[4] = field_type;
    H256::new(bytes)
}

pub fn nonce_key(id: AccountId) -> H256 {
    account_field_key(id, KEY_TYPE_NONCE)
}

pub fn script_code_hash_key(id: AccountId) -> H256 {
    account_field_key(id, KEY_TYPE_SCRIPT_CODE_HASH)
}

/// Storage slot of `id` addressed by a 32-byte user key.
pub fn account_storage_key(id: AccountId, user_key: &H256) -> H256 {
    Blake2bHasher::new()
        .update(&id.to_le_bytes())
        .update(&[KEY_TYPE_ACCOUNT_KV])
        .update(user_key.as_bytes())
        .finalize()
}

pub fn script_hash_to_id_key(code_hash: &H256) -> H256 {
    Blake2bHasher::new()
        .update(&[KEY_TYPE_SCRIPT_HASH_TO_ID])
        .update(code_hash.as_bytes())
        .finalize()
}

pub fn data_hash_key(data_hash: &H256) -> H256 {
    Blake2bHasher::new()
        .update(&[KEY_TYPE_DATA_HASH])
        .update(data_hash.as_bytes())
        .finalize()
}

pub fn account_count_key() -> H256 {
    Blake2bHasher::new()
        .update(&[KEY_TYPE_ACCOUNT_COUNT])
        .update(b"account_count")
        .finalize()
}

// =============================================================================
// VALUE ENCODING
// =============================================================================

/// Little-endian u32 in the low bytes of a value.
pub fn u32_value(n: u32) -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[..4].copy_from_slice(&n.to_le_bytes());
    H256::new(bytes)
}

pub fn value_to_u32(value: &H256) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&value.as_bytes()[..4]);
    u32::from_le_bytes(buf)
}

/// Account id with a presence flag in byte 4, so id 0 is not the empty value.
pub fn account_id_value(id: AccountId) -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[..4].copy_from_slice(&id.to_le_bytes());
    bytes[4] = 1;
    H256::new(bytes)
}

pub fn value_to_account_id(value: &H256) -> Option<AccountId> {
    (value.as_bytes()[4] == 1).then(|| AccountId(value_to_u32(value)))
}

pub fn u64_value(n: u64) -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[..8].copy_from_slice(&n.to_le_bytes());
    H256::new(bytes)
}

pub fn value_to_u64(value: &H256) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&value.as_bytes()[..8]);
    u64::from_le_bytes(buf)
}

pub fn u128_value(n: u128) -> H256 {
    let mut bytes = [0u8; HASH_BYTES];
    bytes[..16].copy_from_slice(&n.to_le_bytes());
    H256::new(bytes)
}

pub fn value_to_u128(value: &H256) -> u128 {
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&value.as_bytes()[..16]);
    u128::from_le_bytes(buf)
}
