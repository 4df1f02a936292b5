//! # Proof Stack
//!
//! Bounded LIFO stack used while replaying a compiled proof.
//! Capacity is supplied by the verifier configuration.

use crate::domain::{ProofError, H256};

/// Default replay depth.
pub const DEFAULT_STACK_CAPACITY: usize = 32;

/// Partially merged subtree on the replay stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackEntry {
    /// Key path of any leaf below this node.
    pub key: H256,
    /// Node digest so far.
    pub value: H256,
    /// Lowest height this node may still be merged at.
    pub height: u16,
}

impl StackEntry {
    pub fn leaf(key: H256, value: H256) -> Self {
        Self {
            key,
            value,
            height: 0,
        }
    }
}

/// Replay stack.
#[derive(Clone, Debug)]
pub struct ProofStack {
    data: Vec<StackEntry>,
    capacity: usize,
}

impl ProofStack {
    /// Creates an empty stack holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.min(DEFAULT_STACK_CAPACITY)),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Push an entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStack` if the stack is full.
    pub fn push(&mut self, entry: StackEntry) -> Result<(), ProofError> {
        if self.data.len() >= self.capacity {
            return Err(ProofError::InvalidStack(format!(
                "stack overflow at capacity {}",
                self.capacity
            )));
        }
        self.data.push(entry);
        Ok(())
    }

    /// Pop the top entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStack` if the stack is empty.
    pub fn pop(&mut self) -> Result<StackEntry, ProofError> {
        self.data
            .pop()
            .ok_or_else(|| ProofError::InvalidStack("pop from empty stack".into()))
    }

    /// Peek at the top entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStack` if the stack is empty.
    pub fn peek(&self) -> Result<&StackEntry, ProofError> {
        self.data
            .last()
            .ok_or_else(|| ProofError::InvalidStack("peek on empty stack".into()))
    }

    /// Mutable access to the top entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStack` if the stack is empty.
    pub fn peek_mut(&mut self) -> Result<&mut StackEntry, ProofError> {
        self.data
            .last_mut()
            .ok_or_else(|| ProofError::InvalidStack("peek on empty stack".into()))
    }

    /// Consume the stack, requiring exactly one entry to remain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStack` for any other depth.
    pub fn into_single(mut self) -> Result<StackEntry, ProofError> {
        match self.data.len() {
            1 => self.pop(),
            n => Err(ProofError::InvalidStack(format!(
                "{n} entries left after replay"
            ))),
        }
    }
}
