//! # Quantum Telemetry
//!
//! Logging and metrics shared by Quantum-Chain subsystems.
//!
//! ## Components
//!
//! - Structured logging through `tracing-subscriber` (plain or JSON)
//! - Prometheus metrics in a process-wide registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{encode_metrics, init_logging, register_metrics, TelemetryConfig};
//!
//! init_logging(&TelemetryConfig::from_env())?;
//! register_metrics()?;
//! let scrape = encode_metrics()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QC_LOG_LEVEL` | `info` | Log level filter |
//! | `QC_JSON_LOGS` | `false` | JSON log lines |
//! | `QC_SUBSYSTEM_ID` | `00` | Subsystem identifier |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};
pub use metrics::{
    encode_metrics, register_metrics, REGISTRY, SUBSYSTEM_ERRORS, VALIDATIONS_TOTAL,
    VALIDATION_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
