// passage/src/pipeline/mod.rs

//! Defines the `Pipeline<T, Err>` struct, its configuration, compilation and execution logic.

pub mod compile;
pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct
pub use compile::Chain;
pub use definition::Pipeline;
