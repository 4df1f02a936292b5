//! # Domain Errors
//!
//! Closed error families for proof replay, resolution and validation.
//!
//! Each family is exhaustively matchable on its own; [`ValidatorError`]
//! unions them for the service boundary and [`ErrorKind`] flattens any of
//! them into the stable numeric codes used by transports.

use crate::domain::value_objects::{AccountId, H256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// PROOF ERRORS
// =============================================================================

/// Failures while decoding or replaying a compiled Merkle proof.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Declared entry count disagrees with the encoded entries.
    #[error("invalid proof length: declared {declared}, found {actual}")]
    InvalidProofLength { declared: usize, actual: usize },

    /// Reconstructed root does not match, or the proof is malformed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// Replay violated stack discipline.
    #[error("invalid stack: {0}")]
    InvalidStack(String),

    /// A sibling position is inconsistent with the key path.
    #[error("invalid sibling at height {height}")]
    InvalidSibling { height: u8 },

    /// Proof is larger than the verifier is configured to accept.
    #[error("proof exceeds capacity: {entries} > {max} entries")]
    InsufficientCapacity { entries: usize, max: usize },
}

// =============================================================================
// RESOLUTION ERRORS
// =============================================================================

/// Failures while resolving accounts, cells and scripts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Generic lookup miss.
    #[error("not found: {0}")]
    NotFound(String),

    /// Account id does not resolve.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Content-addressed cell does not exist.
    #[error("data cell not found: {0}")]
    DataCellNotFound(H256),

    /// No script is registered for the code hash.
    #[error("unknown script code hash: {0}")]
    UnknownScriptCodeHash(H256),

    /// Script is registered but cannot be linked.
    #[error("dynamic linking failed for {code_hash}: {reason}")]
    DynamicLinking { code_hash: H256, reason: String },

    /// Stored bytes are corrupt.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Failures while building a context or comparing execution effects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed payload structure.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A configured size limit was exceeded.
    #[error("insufficient capacity: {what} {actual} > {limit}")]
    InsufficientCapacity {
        what: &'static str,
        actual: usize,
        limit: usize,
    },

    /// Execution context is internally inconsistent.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// Actual vs. claimed change-sets disagree.
    #[error("change set mismatch: {0}")]
    MismatchChangeSet(String),

    /// Actual vs. claimed return data disagree.
    #[error("return data mismatch: actual {actual} bytes, claimed {claimed} bytes")]
    MismatchReturnData { actual: usize, claimed: usize },

    /// Arguments do not match the script's expected shape.
    #[error("unknown args: {0}")]
    UnknownArgs(String),
}

// =============================================================================
// TOP-LEVEL ERROR
// =============================================================================

/// Any failure surfaced by a public operation of this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ValidatorError {
    /// Flattened kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidatorError::Proof(e) => e.kind(),
            ValidatorError::Resolution(e) => e.kind(),
            ValidatorError::Validation(e) => e.kind(),
        }
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors reported by the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(H256),

    #[error("corrupted entry: {0}")]
    Corrupted(String),

    /// Old value in a change entry disagrees with the stored value.
    #[error("commit conflict on {key}: expected {expected}, found {found}")]
    Conflict { key: H256, expected: H256, found: H256 },

    #[error("unknown state version: {0}")]
    UnknownVersion(u64),

    /// A bounded counter in the store has no room left.
    #[error("{0} exhausted")]
    Exhausted(String),
}

impl From<StoreError> for ResolutionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => ResolutionError::NotFound(key.to_string()),
            StoreError::UnknownVersion(v) => ResolutionError::NotFound(format!("version {v}")),
            other => ResolutionError::InvalidData(other.to_string()),
        }
    }
}

impl From<StoreError> for ValidatorError {
    fn from(e: StoreError) -> Self {
        ValidatorError::Resolution(e.into())
    }
}

// =============================================================================
// ERROR KIND
// =============================================================================

/// Flat error kind with stable numeric codes for transport mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    InvalidData,
    InsufficientCapacity,
    InvalidContext,
    DynamicLinking,
    MismatchChangeSet,
    MismatchReturnData,
    UnknownArgs,
    UnknownScriptCodeHash,
    AccountNotFound,
    DataCellNotFound,
    InvalidProofLength,
    InvalidProof,
    InvalidStack,
    InvalidSibling,
}

impl ErrorKind {
    /// Every kind, in code order.
    pub const ALL: [ErrorKind; 15] = [
        ErrorKind::NotFound,
        ErrorKind::InvalidData,
        ErrorKind::InsufficientCapacity,
        ErrorKind::InvalidContext,
        ErrorKind::DynamicLinking,
        ErrorKind::MismatchChangeSet,
        ErrorKind::MismatchReturnData,
        ErrorKind::UnknownArgs,
        ErrorKind::UnknownScriptCodeHash,
        ErrorKind::AccountNotFound,
        ErrorKind::DataCellNotFound,
        ErrorKind::InvalidProofLength,
        ErrorKind::InvalidProof,
        ErrorKind::InvalidStack,
        ErrorKind::InvalidSibling,
    ];

    /// Legacy numeric code.
    pub fn code(self) -> u8 {
        match self {
            ErrorKind::NotFound => 42,
            ErrorKind::InvalidData => 43,
            ErrorKind::InsufficientCapacity => 44,
            ErrorKind::InvalidContext => 45,
            ErrorKind::DynamicLinking => 46,
            ErrorKind::MismatchChangeSet => 47,
            ErrorKind::MismatchReturnData => 48,
            ErrorKind::UnknownArgs => 49,
            ErrorKind::UnknownScriptCodeHash => 50,
            ErrorKind::AccountNotFound => 51,
            ErrorKind::DataCellNotFound => 52,
            ErrorKind::InvalidProofLength => 60,
            ErrorKind::InvalidProof => 61,
            ErrorKind::InvalidStack => 62,
            ErrorKind::InvalidSibling => 63,
        }
    }

    /// Inverse of [`ErrorKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// snake_case label, used for log fields and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::InsufficientCapacity => "insufficient_capacity",
            ErrorKind::InvalidContext => "invalid_context",
            ErrorKind::DynamicLinking => "dynamic_linking",
            ErrorKind::MismatchChangeSet => "mismatch_change_set",
            ErrorKind::MismatchReturnData => "mismatch_return_data",
            ErrorKind::UnknownArgs => "unknown_args",
            ErrorKind::UnknownScriptCodeHash => "unknown_script_code_hash",
            ErrorKind::AccountNotFound => "account_not_found",
            ErrorKind::DataCellNotFound => "data_cell_not_found",
            ErrorKind::InvalidProofLength => "invalid_proof_length",
            ErrorKind::InvalidProof => "invalid_proof",
            ErrorKind::InvalidStack => "invalid_stack",
            ErrorKind::InvalidSibling => "invalid_sibling",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProofError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProofError::InvalidProofLength { .. } => ErrorKind::InvalidProofLength,
            ProofError::InvalidProof(_) => ErrorKind::InvalidProof,
            ProofError::InvalidStack(_) => ErrorKind::InvalidStack,
            ProofError::InvalidSibling { .. } => ErrorKind::InvalidSibling,
            ProofError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
        }
    }
}

impl ResolutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolutionError::NotFound(_) => ErrorKind::NotFound,
            ResolutionError::AccountNotFound(_) => ErrorKind::AccountNotFound,
            ResolutionError::DataCellNotFound(_) => ErrorKind::DataCellNotFound,
            ResolutionError::UnknownScriptCodeHash(_) => ErrorKind::UnknownScriptCodeHash,
            ResolutionError::DynamicLinking { .. } => ErrorKind::DynamicLinking,
            ResolutionError::InvalidData(_) => ErrorKind::InvalidData,
        }
    }
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidData(_) => ErrorKind::InvalidData,
            ValidationError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            ValidationError::InvalidContext(_) => ErrorKind::InvalidContext,
            ValidationError::MismatchChangeSet(_) => ErrorKind::MismatchChangeSet,
            ValidationError::MismatchReturnData { .. } => ErrorKind::MismatchReturnData,
            ValidationError::UnknownArgs(_) => ErrorKind::UnknownArgs,
        }
    }
}
