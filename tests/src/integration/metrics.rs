//! # Metrics
//!
//! Rejected requests show up in the exported Prometheus text.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use quantum_telemetry::{encode_metrics, register_metrics, SUBSYSTEM_ERRORS, VALIDATIONS_TOTAL};
    use qc_18_state_validator::prelude::*;

    #[test]
    fn test_rejection_is_exported() {
        quantum_telemetry::init_test_logging();
        // Another test may have registered already.
        let _ = register_metrics();
        let world = World::new();
        let rejected = VALIDATIONS_TOTAL.with_label_values(&["unknown_args"]).get();
        let errors = SUBSYSTEM_ERRORS
            .with_label_values(&["18", "unknown_args"])
            .get();

        let bad = world.bare_request(world.alice, world.counter, vec![0; 2]);
        let err = world.service.validate(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgs);

        assert!(VALIDATIONS_TOTAL.with_label_values(&["unknown_args"]).get() >= rejected + 1.0);
        assert!(
            SUBSYSTEM_ERRORS
                .with_label_values(&["18", "unknown_args"])
                .get()
                >= errors + 1.0
        );

        let text = encode_metrics().unwrap();
        assert!(text.contains("qc_validator_validations_total"));
        assert!(text.contains(r#"outcome="unknown_args""#));
        assert!(text.contains("qc_subsystem_errors_total"));
        assert!(text.contains(r#"error_type="unknown_args""#));
        assert!(text.contains("qc_validator_validation_duration_seconds"));
    }
}
