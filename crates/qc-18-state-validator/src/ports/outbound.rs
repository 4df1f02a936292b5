//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces this subsystem depends on:
//! - State persistence (reads, snapshots, write-after-validate commits)
//! - Script execution
//! - Script implementations linked by the resolver
//!
//! The validator core only reads through these ports. `commit` exists for
//! the caller that persists an already validated change-set.

use crate::context::ExecutionContext;
use crate::domain::{ArgsShape, CallResult, ChangeSet, StoreError, ValidatorError, H256};
use crate::resolver::ScriptHandle;
use crate::runtime::ScriptContext;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// STATE READS
// =============================================================================

/// Read access to one version of the state.
pub trait StateReader: Send + Sync {
    /// Value at `key` (zero if never written).
    fn get(&self, key: &H256) -> Result<H256, StoreError>;

    /// Raw bytes of the data cell with `hash`.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - If the cell was stored
    /// * `None` - If no such cell exists
    fn get_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Read-only snapshot of the state at one version.
#[derive(Clone)]
pub struct StateView {
    pub version: u64,
    pub root: H256,
    reader: Arc<dyn StateReader>,
}

impl StateView {
    pub fn new(version: u64, root: H256, reader: Arc<dyn StateReader>) -> Self {
        Self {
            version,
            root,
            reader,
        }
    }

    pub fn get(&self, key: &H256) -> Result<H256, StoreError> {
        self.reader.get(key)
    }

    pub fn get_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError> {
        self.reader.get_data(hash)
    }
}

impl fmt::Debug for StateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateView")
            .field("version", &self.version)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// STATE PERSISTENCE
// =============================================================================

/// Persistence collaborator owning canonical state.
///
/// Writers are serialized by the implementation; snapshots stay valid
/// across later commits.
pub trait StateStore: Send + Sync {
    /// Snapshot of the latest committed version.
    fn snapshot(&self) -> StateView;

    /// Latest committed version.
    fn version(&self) -> u64;

    /// Root recorded for `version`.
    fn root_at(&self, version: u64) -> Result<H256, StoreError>;

    /// Value at `key` in the latest version.
    fn load(&self, key: &H256) -> Result<H256, StoreError>;

    /// Data cell bytes in the latest version.
    fn load_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply a validated change-set and return the new root.
    ///
    /// # Errors
    ///
    /// `Conflict` if any entry's old value differs from the stored value;
    /// nothing is applied in that case.
    fn commit(&self, change_set: &ChangeSet) -> Result<H256, StoreError>;
}

// =============================================================================
// SCRIPT EXECUTION
// =============================================================================

/// Runs a resolved script against a context.
pub trait ScriptExecutor: Send + Sync {
    fn execute(
        &self,
        handle: &ScriptHandle,
        context: &ExecutionContext,
    ) -> Result<CallResult, ValidatorError>;
}

/// A linkable script implementation.
pub trait Script: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Shape its argument payload must have.
    fn args_shape(&self) -> ArgsShape;

    /// Execute against the call's state accessors.
    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError>;
}
