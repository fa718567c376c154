// src/config/explorer_config.rs

use serde::{Deserialize, Serialize};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

use crate::enumeration::RenderPolicy;
use crate::math::roots::IterationPolicy;
use crate::sampling::{RenderBudget, SamplingConfig, SamplingMode};

/// Main explorer configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Number of threads for parallel solving (None: all cores)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Root solver iteration budget
    pub solver: SolverConfig,

    /// Unit sizing and fan-out
    pub batching: BatchConfig,

    /// What a run draws and how it samples
    pub render: RenderConfig,
}

/// Iteration budget: clamp(degree * iterations_per_degree, min, max)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub iterations_per_degree: usize,
    pub min_iterations: usize,
    pub max_iterations: usize,
}

/// Unit sizing: nearest power of two to base_batch * reference_cost / (degree² · N)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Slots per unit at the reference cost (default: 128)
    pub base_batch: usize,

    /// degree² · palette size at which base_batch applies (default: 1900)
    pub reference_cost: f64,

    /// Smallest unit (default: 128)
    pub min_batch: usize,

    /// Largest unit (default: 16384)
    pub max_batch: usize,

    /// Solve a unit's polynomials on the rayon pool
    pub parallel: bool,
}

/// Defaults for a run's render policy, sampling and budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub policy: RenderPolicy,
    pub sampling_mode: SamplingMode,
    pub offset: f64,
    pub filter_coefficient: usize,

    /// Maximum roots per run (None: unbounded)
    #[serde(default)]
    pub budget: Option<u64>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            threads: None, // Use Rayon's default
            log_level: "info".to_string(),
            solver: SolverConfig::default(),
            batching: BatchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            iterations_per_degree: 20,
            min_iterations: 40,
            max_iterations: 200,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            base_batch: 128,
            reference_cost: 1900.0,
            min_batch: 128,
            max_batch: 16384,
            parallel: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            policy: RenderPolicy::ConvergedOnly,
            sampling_mode: SamplingMode::Uniform,
            offset: 0.0,
            filter_coefficient: 0,
            budget: Some(1_000_000),
        }
    }
}

impl SolverConfig {
    pub fn policy(&self) -> IterationPolicy {
        IterationPolicy {
            per_degree: self.iterations_per_degree,
            min: self.min_iterations,
            max: self.max_iterations,
        }
    }
}

impl RenderConfig {
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig::new(self.sampling_mode)
            .with_filter(self.filter_coefficient)
            .with_offset(self.offset)
    }

    pub fn render_budget(&self) -> RenderBudget {
        RenderBudget::from_option(self.budget)
    }
}

impl ExplorerConfig {
    /// Load configuration with precedence: config file → env vars → defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // Try to load from config files (TOML preferred, YAML fallback)
        if Path::new("littlewood.toml").exists() {
            builder = builder.add_source(File::with_name("littlewood.toml"));
        } else if Path::new("littlewood.yaml").exists() {
            builder = builder.add_source(File::with_name("littlewood.yaml"));
        }

        Self::finish(builder)
    }

    /// Load configuration with custom file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // Load from specified file
        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("solver.iterations_per_degree", 20)?
            .set_default("solver.min_iterations", 40)?
            .set_default("solver.max_iterations", 200)?
            .set_default("batching.base_batch", 128)?
            .set_default("batching.reference_cost", 1900.0)?
            .set_default("batching.min_batch", 128)?
            .set_default("batching.max_batch", 16384)?
            .set_default("batching.parallel", true)?
            .set_default("render.policy", "converged_only")?
            .set_default("render.sampling_mode", "uniform")?
            .set_default("render.offset", 0.0)?
            .set_default("render.filter_coefficient", 0)?
            .set_default("render.budget", 1_000_000)
    }

    // Environment variables override everything (prefix: LITTLEWOOD_, nesting: __)
    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder
            .add_source(
                Environment::with_prefix("LITTLEWOOD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.threads, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.solver.policy(), IterationPolicy::default());
        assert_eq!(config.batching.base_batch, 128);
        assert_eq!(config.batching.reference_cost, 1900.0);
        assert_eq!(config.batching.min_batch, 128);
        assert_eq!(config.batching.max_batch, 16384);
        assert!(config.batching.parallel);
        assert_eq!(config.render.policy, RenderPolicy::ConvergedOnly);
        assert_eq!(config.render.render_budget(), RenderBudget::Limited(1_000_000));
    }

    #[test]
    fn test_load_without_file() {
        // Should successfully load defaults when no config file exists
        let config = ExplorerConfig::load_from_file("does-not-exist.toml")
            .unwrap_or_else(|_| ExplorerConfig::default());
        assert_eq!(config.solver.max_iterations, 200);
        assert_eq!(config.render.sampling_mode, SamplingMode::Uniform);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("littlewood-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[solver]\nmax_iterations = 500\n\n[render]\nsampling_mode = \"filter_a0\"\nfilter_coefficient = 1\npolicy = \"best_effort\"\n"
        )
        .unwrap();
        drop(file);

        let config = ExplorerConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.solver.max_iterations, 500);
        assert_eq!(config.solver.min_iterations, 40);
        assert_eq!(config.render.sampling_mode, SamplingMode::FilterConstantTerm);
        assert_eq!(config.render.sampling().filter_coefficient, 1);
        assert_eq!(config.render.policy, RenderPolicy::BestEffort);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // keys no other test in this module reads back after loading
        std::env::set_var("LITTLEWOOD__BATCHING__MAX_BATCH", "4096");
        std::env::set_var("LITTLEWOOD__BATCHING__PARALLEL", "false");
        let loaded = ExplorerConfig::load_from_file("does-not-exist.toml");
        std::env::remove_var("LITTLEWOOD__BATCHING__MAX_BATCH");
        std::env::remove_var("LITTLEWOOD__BATCHING__PARALLEL");

        let config = loaded.unwrap();
        assert_eq!(config.batching.max_batch, 4096);
        assert!(!config.batching.parallel);
        assert_eq!(config.batching.min_batch, 128);
        assert_eq!(config.solver.min_iterations, 40);
    }
}
