//! # Execution Context
//!
//! Construction and validation of the immutable environment a script call
//! runs in.
//!
//! ## Validation Order
//!
//! 1. Argument payload size (`InvalidData`)
//! 2. State view matches the root the store recorded for its version
//!    (`InvalidContext`)
//! 3. Caller and callee resolve in the view (`AccountNotFound`)
//! 4. Callee is governed by the linked script (`InvalidContext`)
//! 5. Arguments match the script's declared shape (`UnknownArgs`)

use crate::config::ValidatorConfig;
use crate::domain::{Account, AccountId, ValidationError, ValidatorError, H256};
use crate::ports::{StateStore, StateView};
use crate::resolver::ScriptHandle;
use crate::store::AccountStore;
use tracing::debug;

/// Validated call environment. Immutable once built.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    caller: Account,
    callee: Account,
    args: Vec<u8>,
    state_view: StateView,
    code_hash: H256,
}

impl ExecutionContext {
    pub fn caller(&self) -> &Account {
        &self.caller
    }

    pub fn callee(&self) -> &Account {
        &self.callee
    }

    pub fn args(&self) -> &[u8] {
        &self.args
    }

    pub fn state_view(&self) -> &StateView {
        &self.state_view
    }

    /// Code hash of the linked script.
    pub fn code_hash(&self) -> &H256 {
        &self.code_hash
    }
}

/// Builds [`ExecutionContext`]s against a store.
pub struct ContextBuilder<'a> {
    store: &'a dyn StateStore,
    max_args_size: usize,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(store: &'a dyn StateStore, config: &ValidatorConfig) -> Self {
        Self {
            store,
            max_args_size: config.max_args_size,
        }
    }

    /// Validate and assemble a call context. Does not touch `state_view`.
    pub fn build(
        &self,
        caller_id: AccountId,
        callee_id: AccountId,
        args: Vec<u8>,
        state_view: StateView,
        handle: &ScriptHandle,
    ) -> Result<ExecutionContext, ValidatorError> {
        if args.len() > self.max_args_size {
            return Err(ValidationError::InvalidData(format!(
                "args of {} bytes exceed {}",
                args.len(),
                self.max_args_size
            ))
            .into());
        }

        let recorded = self.store.root_at(state_view.version).map_err(|_| {
            ValidationError::InvalidContext(format!(
                "state version {} unknown to the store",
                state_view.version
            ))
        })?;
        if recorded != state_view.root {
            return Err(ValidationError::InvalidContext(format!(
                "view root {} differs from recorded root {} at version {}",
                state_view.root, recorded, state_view.version
            ))
            .into());
        }

        let accounts = AccountStore::new(state_view.clone());
        let caller = accounts.get_account(caller_id)?;
        let callee = accounts.get_account(callee_id)?;

        if callee.script_code_hash != handle.code_hash {
            return Err(ValidationError::InvalidContext(format!(
                "callee {} is bound to {}, linked script is {}",
                callee.id, callee.script_code_hash, handle.code_hash
            ))
            .into());
        }

        handle.args_shape.check(&args)?;

        debug!(
            caller = %caller.id,
            callee = %callee.id,
            args_len = args.len(),
            version = state_view.version,
            "Execution context built"
        );

        Ok(ExecutionContext {
            caller,
            callee,
            args,
            state_view,
            code_hash: handle.code_hash,
        })
    }
}
