//! # Script Resolver
//!
//! Dynamic linking of script code hashes to callable implementations.
//!
//! The registry is an explicit mapping handed to the resolver at
//! construction. A hash with no entry is *unknown*; an entry that cannot be
//! linked (ABI mismatch, missing or mismatched code cell) is *broken*.

use crate::domain::{ArgsShape, ResolutionError, H256};
use crate::ports::Script;
use crate::store::AccountStore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// REGISTRY
// =============================================================================

/// A registered script implementation.
#[derive(Clone)]
pub struct ScriptEntry {
    pub abi_version: u32,
    /// Data cell whose digest must equal the code hash, when code is stored
    /// on chain.
    pub code_cell: Option<H256>,
    pub script: Arc<dyn Script>,
}

impl fmt::Debug for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEntry")
            .field("name", &self.script.name())
            .field("abi_version", &self.abi_version)
            .field("code_cell", &self.code_cell)
            .finish()
    }
}

/// Code hash to implementation mapping.
#[derive(Clone, Debug, Default)]
pub struct ScriptRegistry {
    entries: HashMap<H256, ScriptEntry>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native script under `code_hash`.
    pub fn register(&mut self, code_hash: H256, abi_version: u32, script: Arc<dyn Script>) {
        self.entries.insert(
            code_hash,
            ScriptEntry {
                abi_version,
                code_cell: None,
                script,
            },
        );
    }

    /// Register a script whose code is the data cell hashing to `code_hash`.
    pub fn register_with_code_cell(
        &mut self,
        code_hash: H256,
        abi_version: u32,
        script: Arc<dyn Script>,
    ) {
        self.entries.insert(
            code_hash,
            ScriptEntry {
                abi_version,
                code_cell: Some(code_hash),
                script,
            },
        );
    }

    pub fn insert(&mut self, code_hash: H256, entry: ScriptEntry) {
        self.entries.insert(code_hash, entry);
    }

    pub fn get(&self, code_hash: &H256) -> Option<&ScriptEntry> {
        self.entries.get(code_hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Callable, linked script.
#[derive(Clone)]
pub struct ScriptHandle {
    pub code_hash: H256,
    pub abi_version: u32,
    pub args_shape: ArgsShape,
    script: Arc<dyn Script>,
}

impl ScriptHandle {
    pub fn script(&self) -> &dyn Script {
        self.script.as_ref()
    }

    pub fn name(&self) -> &str {
        self.script.name()
    }
}

impl fmt::Debug for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptHandle")
            .field("name", &self.script.name())
            .field("code_hash", &self.code_hash)
            .field("abi_version", &self.abi_version)
            .finish()
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves code hashes through a [`ScriptRegistry`].
#[derive(Clone, Debug)]
pub struct ScriptResolver {
    registry: Arc<ScriptRegistry>,
    abi_version: u32,
}

impl ScriptResolver {
    pub fn new(registry: ScriptRegistry, abi_version: u32) -> Self {
        Self {
            registry: Arc::new(registry),
            abi_version,
        }
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// Link the script registered for `code_hash`.
    ///
    /// # Errors
    ///
    /// - `UnknownScriptCodeHash` - nothing registered for the hash
    /// - `DynamicLinking` - ABI mismatch, or the bound code cell is missing
    ///   or does not hash to `code_hash`
    pub fn resolve(
        &self,
        code_hash: &H256,
        accounts: &AccountStore,
    ) -> Result<ScriptHandle, ResolutionError> {
        let entry = self
            .registry
            .get(code_hash)
            .ok_or(ResolutionError::UnknownScriptCodeHash(*code_hash))?;

        if entry.abi_version != self.abi_version {
            return Err(linking(
                code_hash,
                format!(
                    "abi version {} not supported (expected {})",
                    entry.abi_version, self.abi_version
                ),
            ));
        }

        if let Some(cell_hash) = entry.code_cell {
            let cell = accounts.get_cell(&cell_hash).map_err(|e| match e {
                ResolutionError::DataCellNotFound(_) => {
                    linking(code_hash, format!("code cell {cell_hash} missing"))
                }
                other => other,
            })?;
            if cell.hash != *code_hash {
                return Err(linking(
                    code_hash,
                    format!("code cell hashes to {}", cell.hash),
                ));
            }
        }

        debug!(code_hash = %code_hash, script = entry.script.name(), "Script linked");
        Ok(ScriptHandle {
            code_hash: *code_hash,
            abi_version: entry.abi_version,
            args_shape: entry.script.args_shape(),
            script: Arc::clone(&entry.script),
        })
    }
}

fn linking(code_hash: &H256, reason: String) -> ResolutionError {
    ResolutionError::DynamicLinking {
        code_hash: *code_hash,
        reason,
    }
}
