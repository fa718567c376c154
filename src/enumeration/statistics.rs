// src/enumeration/statistics.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::run_generation::RunId;
use crate::math::roots::RootSet;

/// Running totals for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub roots_emitted: u64,
    pub converged: u64,
    pub attempted: u64,
    pub iteration_sum: u64,
}

impl RunStatistics {
    pub fn record(&mut self, result: &RootSet) {
        self.attempted += 1;
        self.iteration_sum += result.iterations as u64;
        if result.converged {
            self.converged += 1;
        }
    }

    pub fn convergence_rate_percent(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        100.0 * self.converged as f64 / self.attempted as f64
    }

    pub fn average_iterations(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.iteration_sum as f64 / self.attempted as f64
    }
}

/// Terminal report of a run that finished naturally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub total_roots: u64,
    pub converged_count: u64,
    pub total_attempted: u64,
    pub convergence_rate_percent: f64,
    pub avg_iterations: f64,
    pub units: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn from_statistics(
        run_id: RunId,
        statistics: &RunStatistics,
        units: u64,
        started_at: DateTime<Utc>,
        elapsed_ms: u64,
    ) -> Self {
        RunSummary {
            run_id,
            total_roots: statistics.roots_emitted,
            converged_count: statistics.converged,
            total_attempted: statistics.attempted,
            convergence_rate_percent: statistics.convergence_rate_percent(),
            avg_iterations: statistics.average_iterations(),
            units,
            started_at,
            elapsed_ms,
        }
    }
}
