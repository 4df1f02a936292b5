//! # QC-18 State Validator - Layer-2 State Transition Validation
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Re-executes a claimed layer-2 call against a committed state snapshot and
//! accepts it only when the claimed return data and change-set match what
//! the linked script actually produced, and the change-set's prior values
//! are proven against the committed sparse Merkle root.
//!
//! ## Pipeline
//!
//! ```text
//! ValidationRequest
//!   -> AccountStore        callee account and script code hash
//!   -> ScriptResolver      dynamic linking through the ScriptRegistry
//!   -> ContextBuilder      immutable ExecutionContext over a StateView
//!   -> StateTransitionValidator
//!        ScriptExecutor    actual CallResult
//!        compare           capacity, change-set, return data
//!   -> MerkleProofVerifier prior leaves against the root, post-state root
//!   -> ValidatedTransition (caller commits)
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `domain` | H256, accounts, change-sets, error taxonomy, state keys |
//! | `smt` | proof stack, compiled proofs, verifier, tree, KV state |
//! | `ports` | inbound API and outbound SPI traits |
//! | `adapters` | in-memory store, native executor |
//! | `store` | account and data cell lookups |
//! | `resolver` | script registry and linking |
//! | `context` | execution context construction |
//! | `runtime` | script-facing state accessors |
//! | `validator` | claimed vs actual comparison |
//! | `service` | end-to-end orchestration |
//! | `scripts` | built-in `meta`, `sum` and `sudt` scripts |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_state_validator::prelude::*;
//!
//! let store = Arc::new(InMemoryStateStore::new());
//! let mut registry = ScriptRegistry::new();
//! registry.register(code_hash, 1, Arc::new(SumScript));
//!
//! let service = StateValidatorService::new(store, registry, ValidatorConfig::from_env());
//! let transition = service.validate(&request)?;
//! ```

#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod ports;
pub mod resolver;
pub mod runtime;
pub mod scripts;
pub mod service;
pub mod smt;
pub mod store;
pub mod validator;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{InMemoryStateStore, NativeExecutor};
    pub use crate::config::ValidatorConfig;
    pub use crate::context::{ContextBuilder, ExecutionContext};
    pub use crate::domain::{
        blake2b, Account, AccountId, ArgsShape, CallResult, CapacityLimit, ChangeEntry,
        ChangeSet, DataCell, ErrorKind, ProofError, ResolutionError, StoreError,
        ValidationError, ValidatorError, H256,
    };
    pub use crate::ports::{
        Script, ScriptExecutor, StateReader, StateStore, StateValidatorApi, StateView,
        ValidatedTransition, ValidationRequest,
    };
    pub use crate::resolver::{ScriptHandle, ScriptRegistry, ScriptResolver};
    pub use crate::runtime::ScriptContext;
    pub use crate::scripts::{MetaContractScript, SudtScript, SumScript};
    pub use crate::service::{ServiceStats, StateValidatorService};
    pub use crate::smt::{CompiledProof, MerkleProofVerifier, SparseMerkleTree};
    pub use crate::store::AccountStore;
    pub use crate::validator::StateTransitionValidator;
    pub use std::sync::Arc;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;
