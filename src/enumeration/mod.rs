// src/enumeration/mod.rs
//
// Batched execution driver.
//
// A run walks the slots of its sampling plan in fixed-size units. Each unit is
// solved to completion (optionally fanned out over the rayon pool), checked
// against the run generation, then emitted to the sink in polynomial-index
// order (the same as slot order in every mode but pseudo-random). Control
// returns to the host between units, never inside one.

pub mod batch;
pub mod explorer;
pub mod run;
pub mod sink;
pub mod statistics;

use serde::{Deserialize, Serialize};

use crate::core::run_generation::RunId;
use crate::math::complex::Complex;
use crate::math::polynomial::PolynomialIndex;

pub use batch::{batch_size, evaluate_unit, SolvedPolynomial, UnitResult};
pub use explorer::{DriverState, Explorer, RunFingerprint};
pub use run::{Run, RunHandle, RunParameters, StepOutcome};
pub use sink::{CollectingSink, RootSink};
pub use statistics::{RunStatistics, RunSummary};

/// Which solver results reach the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPolicy {
    /// Only polynomials whose solve converged
    ConvergedOnly,
    /// Also the last finite estimates of unconverged solves
    BestEffort,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        RenderPolicy::ConvergedOnly
    }
}

/// One root handed to the presentation layer, with the positional metadata it
/// needs for a consistent color/progress mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootEvent {
    pub run_id: RunId,
    pub root: Complex,
    pub polynomial_index: PolynomialIndex,
    /// Position of the root in the solver's output for this polynomial
    pub root_index: usize,
    /// Slot offset of the polynomial inside its unit
    pub unit_position: usize,
    /// Number of slots in the unit
    pub unit_size: usize,
    pub effective_root_count: f64,
    pub converged: bool,
}
