//! # Ports Layer
//!
//! Inbound (API) and outbound (SPI) interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{StateValidatorApi, ValidatedTransition, ValidationRequest};
pub use outbound::{Script, ScriptExecutor, StateReader, StateStore, StateView};
