//! # Integration Tests
//!
//! End-to-end requests through `StateValidatorService`.

pub mod flows;
pub mod metrics;
pub mod scenarios;
