//! # Quantum-Chain Test Suite
//!
//! Unified test crate for the state validator.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── proof_benchmarks.rs   # criterion: proof replay, generation, service
//! └── src/
//!     ├── fixtures.rs           # World, CountingStore, test scripts
//!     ├── properties.rs         # proptest: compiled proof properties
//!     └── integration/
//!         ├── flows.rs          # honest requests, commit, post-state root
//!         └── scenarios.rs      # rejection scenarios A-D and friends
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::
//! cargo test -p qc-tests properties::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod fixtures;
pub mod integration;
pub mod properties;
