//! # State Transition Validator
//!
//! Executes one call and confirms the claimed effects match the actual
//! ones.
//!
//! ## Checks (in order)
//!
//! 1. Actual result within `capacity_limit` (`InsufficientCapacity`)
//! 2. Same change-set, ignoring entry order (`MismatchChangeSet`)
//! 3. Same return data (`MismatchReturnData`)
//!
//! The validator never writes to the store; the returned result is for the
//! caller to persist.

use crate::context::ExecutionContext;
use crate::domain::{CallResult, CapacityLimit, ValidationError, ValidatorError};
use crate::ports::ScriptExecutor;
use crate::resolver::ScriptHandle;
use std::sync::Arc;
use tracing::debug;

pub struct StateTransitionValidator {
    executor: Arc<dyn ScriptExecutor>,
}

impl StateTransitionValidator {
    pub fn new(executor: Arc<dyn ScriptExecutor>) -> Self {
        Self { executor }
    }

    /// Run the script and compare against `claimed`.
    ///
    /// Returns the actual result on success. Script failures propagate
    /// unchanged.
    pub fn execute_and_validate(
        &self,
        context: &ExecutionContext,
        handle: &ScriptHandle,
        claimed: &CallResult,
        capacity_limit: &CapacityLimit,
    ) -> Result<CallResult, ValidatorError> {
        let actual = self.executor.execute(handle, context)?;

        capacity_limit.check(&actual)?;

        if let Some(difference) = actual.change_set.first_difference(&claimed.change_set) {
            return Err(ValidationError::MismatchChangeSet(difference).into());
        }

        if actual.return_data != claimed.return_data {
            return Err(ValidationError::MismatchReturnData {
                actual: actual.return_data.len(),
                claimed: claimed.return_data.len(),
            }
            .into());
        }

        debug!(
            script = handle.name(),
            changes = actual.change_set.len(),
            "Claimed result matches execution"
        );
        Ok(actual)
    }
}
