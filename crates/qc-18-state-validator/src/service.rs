//! # State Validator Service
//!
//! Orchestrates one validation request end to end:
//!
//! ```text
//! snapshot -> callee account -> resolve script -> build context
//!          -> execute & compare -> verify proof -> post-state root
//! ```
//!
//! The service only reads state. A [`ValidatedTransition`] is handed back
//! to the caller, who commits it through its own [`StateStore`].

use crate::adapters::NativeExecutor;
use crate::config::ValidatorConfig;
use crate::context::ContextBuilder;
use crate::domain::{ErrorKind, ValidationError, ValidatorError, H256};
use crate::ports::{
    ScriptExecutor, StateStore, StateValidatorApi, ValidatedTransition, ValidationRequest,
};
use crate::resolver::{ScriptRegistry, ScriptResolver};
use crate::smt::MerkleProofVerifier;
use crate::store::AccountStore;
use crate::validator::StateTransitionValidator;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Outcome counters.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Requests received.
    pub requests: u64,
    /// Requests that validated.
    pub validated: u64,
    /// Requests rejected, any reason.
    pub rejected: u64,
    /// Rejections per error kind.
    pub rejected_by_kind: HashMap<ErrorKind, u64>,
    /// Cumulative validation time in microseconds.
    pub total_time_us: u64,
}

impl ServiceStats {
    pub fn rejected_with(&self, kind: ErrorKind) -> u64 {
        self.rejected_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// The State Validator Service.
pub struct StateValidatorService<S: StateStore> {
    config: ValidatorConfig,
    store: Arc<S>,
    resolver: ScriptResolver,
    validator: StateTransitionValidator,
    verifier: MerkleProofVerifier,
    stats: Mutex<ServiceStats>,
}

impl<S: StateStore> StateValidatorService<S> {
    /// Service running scripts with the [`NativeExecutor`].
    pub fn new(store: Arc<S>, registry: ScriptRegistry, config: ValidatorConfig) -> Self {
        let executor = Arc::new(NativeExecutor::new(&config));
        Self::with_executor(store, registry, executor, config)
    }

    pub fn with_executor(
        store: Arc<S>,
        registry: ScriptRegistry,
        executor: Arc<dyn ScriptExecutor>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            resolver: ScriptResolver::new(registry, config.abi_version),
            validator: StateTransitionValidator::new(executor),
            verifier: MerkleProofVerifier::new(&config),
            stats: Mutex::new(ServiceStats::default()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn resolver(&self) -> &ScriptResolver {
        &self.resolver
    }

    /// Snapshot of the outcome counters.
    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    fn run(&self, request: &ValidationRequest) -> Result<ValidatedTransition, ValidatorError> {
        let view = self.store.snapshot();
        if request.state_root != view.root {
            return Err(ValidationError::InvalidContext(format!(
                "request built against {}, current root is {}",
                request.state_root, view.root
            ))
            .into());
        }

        let accounts = AccountStore::new(view.clone());
        let callee = accounts.get_account(request.callee_id)?;
        let handle = self.resolver.resolve(&callee.script_code_hash, &accounts)?;

        let context = ContextBuilder::new(self.store.as_ref(), &self.config).build(
            request.caller_id,
            request.callee_id,
            request.args.clone(),
            view.clone(),
            &handle,
        )?;

        let call_result = self.validator.execute_and_validate(
            &context,
            &handle,
            &request.claimed,
            &self.config.capacity_limit(),
        )?;

        let post_root = if call_result.change_set.is_empty() {
            view.root
        } else {
            self.verifier
                .verify(&view.root, &call_result.change_set.old_leaves(), &request.proof)?;
            self.verifier
                .compute_root(&call_result.change_set.new_leaves(), &request.proof)?
        };

        Ok(ValidatedTransition {
            call_result,
            state_version: view.version,
            prev_root: view.root,
            post_root,
        })
    }

    fn record(&self, outcome: &Result<ValidatedTransition, ValidatorError>, started: Instant) {
        let elapsed = started.elapsed();
        {
            let mut stats = self.stats.lock();
            stats.requests += 1;
            stats.total_time_us += elapsed.as_micros() as u64;
            match outcome {
                Ok(_) => stats.validated += 1,
                Err(e) => {
                    stats.rejected += 1;
                    *stats.rejected_by_kind.entry(e.kind()).or_insert(0) += 1;
                }
            }
        }

        #[cfg(feature = "metrics")]
        crate::metrics::record_validation(
            outcome.as_ref().err().map(ValidatorError::kind),
            elapsed.as_secs_f64(),
        );
    }
}

impl<S: StateStore> StateValidatorApi for StateValidatorService<S> {
    #[instrument(
        skip(self, request),
        fields(caller = %request.caller_id, callee = %request.callee_id)
    )]
    fn validate(&self, request: &ValidationRequest) -> Result<ValidatedTransition, ValidatorError> {
        let started = Instant::now();
        let outcome = self.run(request);
        self.record(&outcome, started);

        match &outcome {
            Ok(transition) => debug!(
                version = transition.state_version,
                prev_root = %transition.prev_root,
                post_root = %transition.post_root,
                changes = transition.call_result.change_set.len(),
                "Transition validated"
            ),
            Err(e) => warn!(
                kind = %e.kind(),
                code = e.kind().code(),
                error = %e,
                "Transition rejected"
            ),
        }
        outcome
    }

    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn validate_encoded(&self, bytes: &[u8]) -> Result<ValidatedTransition, ValidatorError> {
        let request: ValidationRequest = bincode::deserialize(bytes).map_err(|e| {
            warn!(error = %e, "Malformed validation request");
            ValidationError::InvalidData(format!("request decoding: {e}"))
        })?;
        self.validate(&request)
    }

    fn verify_proof(
        &self,
        root: &H256,
        leaves: &[(H256, H256)],
        proof: &[u8],
    ) -> Result<(), ValidatorError> {
        Ok(self.verifier.verify(root, leaves, proof)?)
    }
}
