//! # Domain Layer
//!
//! Core types for state transition validation.

pub mod entities;
pub mod errors;
pub mod keys;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
