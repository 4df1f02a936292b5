//! # Native Executor
//!
//! `ScriptExecutor` that runs in-process [`Script`](crate::ports::Script)
//! implementations through a [`ScriptContext`].

use crate::config::ValidatorConfig;
use crate::context::ExecutionContext;
use crate::domain::{CallResult, ValidationError, ValidatorError};
use crate::ports::ScriptExecutor;
use crate::resolver::ScriptHandle;
use crate::runtime::ScriptContext;
use tracing::trace;

/// Runs native scripts. The caller's nonce advances on every successful run.
#[derive(Clone, Copy, Debug)]
pub struct NativeExecutor {
    max_kv_pairs: usize,
}

impl NativeExecutor {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            max_kv_pairs: config.max_kv_pairs,
        }
    }
}

impl Default for NativeExecutor {
    fn default() -> Self {
        Self::new(&ValidatorConfig::default())
    }
}

impl ScriptExecutor for NativeExecutor {
    fn execute(
        &self,
        handle: &ScriptHandle,
        context: &ExecutionContext,
    ) -> Result<CallResult, ValidatorError> {
        if handle.code_hash != *context.code_hash() {
            return Err(ValidationError::InvalidContext(format!(
                "context was built for {}, handle is {}",
                context.code_hash(),
                handle.code_hash
            ))
            .into());
        }

        let mut ctx = ScriptContext::new(context, self.max_kv_pairs);
        handle.script().run(&mut ctx)?;
        ctx.increase_nonce(context.caller().id)?;
        let result = ctx.into_call_result()?;

        trace!(
            script = handle.name(),
            changes = result.change_set.len(),
            return_len = result.return_data.len(),
            "Script executed"
        );
        Ok(result)
    }
}
