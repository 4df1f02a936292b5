//! # Validator Configuration
//!
//! Limits threaded through proof replay, context construction and
//! execution.

use crate::domain::CapacityLimit;
use serde::{Deserialize, Serialize};
use std::env;

/// Validator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Depth of the proof replay stack.
    pub smt_stack_capacity: usize,

    /// Largest compiled proof accepted, in entries.
    pub max_proof_entries: usize,

    /// Distinct keys one execution may read or write.
    pub max_kv_pairs: usize,

    /// Largest argument payload, in bytes.
    pub max_args_size: usize,

    /// Largest change-set one execution may produce.
    pub max_change_set_entries: usize,

    /// Largest return data one execution may produce, in bytes.
    pub max_return_data_size: usize,

    /// Script ABI version the resolver links against.
    pub abi_version: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            smt_stack_capacity: 32,
            max_proof_entries: 65_536,
            max_kv_pairs: 1024,
            max_args_size: 128 * 1024,
            max_change_set_entries: 1024,
            max_return_data_size: 128 * 1024,
            abi_version: 1,
        }
    }
}

impl ValidatorConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            smt_stack_capacity: 32,
            max_proof_entries: 4096,
            max_kv_pairs: 2048,
            max_args_size: 1024,
            max_change_set_entries: 2048,
            max_return_data_size: 1024,
            abi_version: 1,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_VALIDATOR_STACK_CAPACITY` (default: 32)
    /// - `QC_VALIDATOR_MAX_PROOF_ENTRIES` (default: 65536)
    /// - `QC_VALIDATOR_MAX_KV_PAIRS` (default: 1024)
    /// - `QC_VALIDATOR_MAX_ARGS_SIZE` (default: 131072)
    /// - `QC_VALIDATOR_MAX_CHANGE_SET` (default: 1024)
    /// - `QC_VALIDATOR_MAX_RETURN_DATA` (default: 131072)
    /// - `QC_VALIDATOR_ABI_VERSION` (default: 1)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smt_stack_capacity: env_or("QC_VALIDATOR_STACK_CAPACITY", defaults.smt_stack_capacity),
            max_proof_entries: env_or("QC_VALIDATOR_MAX_PROOF_ENTRIES", defaults.max_proof_entries),
            max_kv_pairs: env_or("QC_VALIDATOR_MAX_KV_PAIRS", defaults.max_kv_pairs),
            max_args_size: env_or("QC_VALIDATOR_MAX_ARGS_SIZE", defaults.max_args_size),
            max_change_set_entries: env_or(
                "QC_VALIDATOR_MAX_CHANGE_SET",
                defaults.max_change_set_entries,
            ),
            max_return_data_size: env_or(
                "QC_VALIDATOR_MAX_RETURN_DATA",
                defaults.max_return_data_size,
            ),
            abi_version: env_or("QC_VALIDATOR_ABI_VERSION", defaults.abi_version),
        }
    }

    /// Capacity limit applied to execution results.
    pub fn capacity_limit(&self) -> CapacityLimit {
        CapacityLimit::new(self.max_change_set_entries, self.max_return_data_size)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
