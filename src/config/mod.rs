// src/config/mod.rs

pub mod explorer_config;

// Re-export main types for convenience
pub use explorer_config::{BatchConfig, ExplorerConfig, RenderConfig, SolverConfig};
