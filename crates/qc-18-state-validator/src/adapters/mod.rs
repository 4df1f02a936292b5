//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod memory_store;
pub mod native_executor;

pub use memory_store::InMemoryStateStore;
pub use native_executor::NativeExecutor;
