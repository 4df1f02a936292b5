//! Prometheus recording for validation outcomes (feature `metrics`).

use crate::domain::ErrorKind;
use quantum_telemetry::{SUBSYSTEM_ERRORS, VALIDATIONS_TOTAL, VALIDATION_DURATION};

/// Outcome label for a successful validation.
pub const OUTCOME_VALID: &str = "valid";

/// Subsystem label on the shared error counter.
pub const SUBSYSTEM_LABEL: &str = "18";

/// Record one validation. `rejected` is the error kind when it failed.
pub fn record_validation(rejected: Option<ErrorKind>, seconds: f64) {
    let outcome = rejected.map_or(OUTCOME_VALID, ErrorKind::as_str);
    VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();
    VALIDATION_DURATION.observe(seconds);
    if let Some(kind) = rejected {
        SUBSYSTEM_ERRORS
            .with_label_values(&[SUBSYSTEM_LABEL, kind.as_str()])
            .inc();
    }
}
