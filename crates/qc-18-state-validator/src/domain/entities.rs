//! # Domain Entities
//!
//! Accounts, data cells, change-sets and call results.

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{blake2b, AccountId, H256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// ACCOUNT
// =============================================================================

/// A stateful entity governed by the script identified by `script_code_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub script_code_hash: H256,
    pub nonce: u32,
}

// =============================================================================
// DATA CELL
// =============================================================================

/// Content-addressed immutable blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataCell {
    pub hash: H256,
    pub data: Vec<u8>,
}

impl DataCell {
    /// Build a cell, deriving its hash from the content.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            hash: blake2b(&data),
            data,
        }
    }

    /// True when `hash` matches the content digest.
    pub fn is_consistent(&self) -> bool {
        blake2b(&self.data) == self.hash
    }
}

// =============================================================================
// CHANGE SET
// =============================================================================

/// One state delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub key: H256,
    pub old_value: H256,
    pub new_value: H256,
}

impl ChangeEntry {
    pub fn new(key: H256, old_value: H256, new_value: H256) -> Self {
        Self {
            key,
            old_value,
            new_value,
        }
    }
}

/// State deltas produced by one execution. Keys are unique.
///
/// Equality ignores entry order.
#[derive(Clone, Debug, Default, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChangeEntry>", into = "Vec<ChangeEntry>")]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    /// Build a change-set, rejecting duplicate keys.
    pub fn new(entries: Vec<ChangeEntry>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.key) {
                return Err(ValidationError::InvalidData(format!(
                    "duplicate change set key {}",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &H256) -> Option<&ChangeEntry> {
        self.entries.iter().find(|e| e.key == *key)
    }

    /// Entries sorted by key path.
    pub fn canonical(&self) -> Vec<ChangeEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));
        sorted
    }

    /// `(key, old_value)` claims on the prior state.
    pub fn old_leaves(&self) -> Vec<(H256, H256)> {
        self.entries.iter().map(|e| (e.key, e.old_value)).collect()
    }

    /// `(key, new_value)` claims on the post state.
    pub fn new_leaves(&self) -> Vec<(H256, H256)> {
        self.entries.iter().map(|e| (e.key, e.new_value)).collect()
    }

    /// First divergence from `other`, if any.
    pub fn first_difference(&self, other: &ChangeSet) -> Option<String> {
        if self.len() != other.len() {
            return Some(format!("{} entries vs {}", self.len(), other.len()));
        }
        self.canonical()
            .into_iter()
            .zip(other.canonical())
            .find(|(a, b)| a != b)
            .map(|(a, b)| {
                if a.key != b.key {
                    format!("key {} vs {}", a.key, b.key)
                } else {
                    format!(
                        "key {}: ({}, {}) vs ({}, {})",
                        a.key, a.old_value, a.new_value, b.old_value, b.new_value
                    )
                }
            })
    }
}

impl PartialEq for ChangeSet {
    fn eq(&self, other: &Self) -> bool {
        self.first_difference(other).is_none()
    }
}

impl TryFrom<Vec<ChangeEntry>> for ChangeSet {
    type Error = ValidationError;

    fn try_from(entries: Vec<ChangeEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ChangeSet> for Vec<ChangeEntry> {
    fn from(set: ChangeSet) -> Self {
        set.entries
    }
}

// =============================================================================
// CALL RESULT
// =============================================================================

/// Return data plus the change-set an execution produced (or a claim of it).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub return_data: Vec<u8>,
    pub change_set: ChangeSet,
}

impl CallResult {
    pub fn new(return_data: Vec<u8>, change_set: ChangeSet) -> Self {
        Self {
            return_data,
            change_set,
        }
    }
}

/// Upper bounds on what one execution may produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLimit {
    pub max_change_set_entries: usize,
    pub max_return_data_size: usize,
}

impl CapacityLimit {
    pub fn new(max_change_set_entries: usize, max_return_data_size: usize) -> Self {
        Self {
            max_change_set_entries,
            max_return_data_size,
        }
    }

    /// Reject results larger than this limit.
    pub fn check(&self, result: &CallResult) -> Result<(), ValidationError> {
        if result.change_set.len() > self.max_change_set_entries {
            return Err(ValidationError::InsufficientCapacity {
                what: "change set entries",
                actual: result.change_set.len(),
                limit: self.max_change_set_entries,
            });
        }
        if result.return_data.len() > self.max_return_data_size {
            return Err(ValidationError::InsufficientCapacity {
                what: "return data bytes",
                actual: result.return_data.len(),
                limit: self.max_return_data_size,
            });
        }
        Ok(())
    }
}

// =============================================================================
// ARGS SHAPE
// =============================================================================

/// Argument shape a script declares; checked before execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgsShape {
    pub min_len: usize,
    pub max_len: Option<usize>,
    /// Allowed values of the first byte, when the script dispatches on it.
    pub selectors: Option<Vec<u8>>,
}

impl ArgsShape {
    /// Accepts any payload.
    pub fn any() -> Self {
        Self::default()
    }

    /// Exactly `len` bytes.
    pub fn exact(len: usize) -> Self {
        Self {
            min_len: len,
            max_len: Some(len),
            selectors: None,
        }
    }

    pub fn with_selectors(mut self, selectors: &[u8]) -> Self {
        self.selectors = Some(selectors.to_vec());
        self
    }

    pub fn check(&self, args: &[u8]) -> Result<(), ValidationError> {
        if args.len() < self.min_len {
            return Err(ValidationError::UnknownArgs(format!(
                "args too short: {} < {}",
                args.len(),
                self.min_len
            )));
        }
        if let Some(max) = self.max_len {
            if args.len() > max {
                return Err(ValidationError::UnknownArgs(format!(
                    "args too long: {} > {}",
                    args.len(),
                    max
                )));
            }
        }
        if let Some(selectors) = &self.selectors {
            match args.first() {
                Some(sel) if selectors.contains(sel) => {}
                Some(sel) => {
                    return Err(ValidationError::UnknownArgs(format!(
                        "unknown selector 0x{sel:02x}"
                    )))
                }
                None => return Err(ValidationError::UnknownArgs("missing selector".into())),
            }
        }
        Ok(())
    }
}
