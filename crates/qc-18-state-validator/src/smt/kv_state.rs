//! # Key-Value State
//!
//! Bounded accumulator of `(key, value)` pairs touched by one execution.
//! A key already present is overwritten in place; a new key is appended
//! while there is room.

use crate::domain::{ValidationError, H256};
use crate::smt::verifier::normalize_leaves;

#[derive(Clone, Debug)]
pub struct KvState {
    pairs: Vec<(H256, H256)>,
    capacity: usize,
}

impl KvState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record `value` under `key`.
    ///
    /// # Errors
    ///
    /// `InsufficientCapacity` when full and `key` is not yet present.
    pub fn insert(&mut self, key: H256, value: H256) -> Result<(), ValidationError> {
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            pair.1 = value;
            return Ok(());
        }
        if self.pairs.len() >= self.capacity {
            return Err(ValidationError::InsufficientCapacity {
                what: "kv pairs",
                actual: self.pairs.len() + 1,
                limit: self.capacity,
            });
        }
        self.pairs.push((key, value));
        Ok(())
    }

    /// Value recorded for `key`.
    pub fn fetch(&self, key: &H256) -> Option<H256> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn contains(&self, key: &H256) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Sort by key path.
    pub fn normalize(&mut self) {
        self.pairs = normalize_leaves(&self.pairs);
    }

    pub fn pairs(&self) -> &[(H256, H256)] {
        &self.pairs
    }
}
