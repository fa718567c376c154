// src/core/mod.rs

pub mod error;
pub mod run_generation;
pub mod thread_pool;

pub use error::{ExplorerError, Result};
pub use run_generation::{RunGeneration, RunId, RunToken};
