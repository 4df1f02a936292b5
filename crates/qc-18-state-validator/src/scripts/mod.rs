//! # Built-in Scripts
//!
//! Native script implementations that can be registered with a
//! [`ScriptRegistry`](crate::resolver::ScriptRegistry).

pub mod meta;
pub mod sudt;
pub mod sum;

pub use meta::MetaContractScript;
pub use sudt::SudtScript;
pub use sum::SumScript;
