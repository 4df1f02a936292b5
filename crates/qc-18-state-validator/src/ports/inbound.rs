//! # Driving Ports (API - Inbound)
//!
//! Public API of the state transition validator and the request/response
//! types exchanged through it.

use crate::domain::{AccountId, CallResult, ValidatorError, H256};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// A claimed call to be re-executed and checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub caller_id: AccountId,
    pub callee_id: AccountId,
    pub args: Vec<u8>,
    /// Root the claim was produced against.
    pub state_root: H256,
    /// Claimed return data and change-set.
    pub claimed: CallResult,
    /// Compiled proof covering every key in the claimed change-set.
    pub proof: Vec<u8>,
}

impl ValidationRequest {
    /// bincode wire form.
    pub fn encode(&self) -> Result<Vec<u8>, ValidatorError> {
        bincode::serialize(self).map_err(|e| {
            crate::domain::ValidationError::InvalidData(format!("request encoding: {e}")).into()
        })
    }
}

/// Outcome of a successful validation. Nothing has been committed yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTransition {
    pub call_result: CallResult,
    pub state_version: u64,
    pub prev_root: H256,
    /// Root after applying `call_result.change_set`.
    pub post_root: H256,
}

// =============================================================================
// API
// =============================================================================

/// State transition validation API.
pub trait StateValidatorApi: Send + Sync {
    /// Re-execute the claimed call and check its effects and proof.
    fn validate(&self, request: &ValidationRequest) -> Result<ValidatedTransition, ValidatorError>;

    /// Decode a bincode request, then [`validate`](Self::validate) it.
    fn validate_encoded(&self, bytes: &[u8]) -> Result<ValidatedTransition, ValidatorError>;

    /// Check leaf claims against `root`.
    fn verify_proof(
        &self,
        root: &H256,
        leaves: &[(H256, H256)],
        proof: &[u8],
    ) -> Result<(), ValidatorError>;
}
