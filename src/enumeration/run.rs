// src/enumeration/run.rs

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::{BatchConfig, ExplorerConfig};
use crate::core::error::{ExplorerError, Result};
use crate::core::run_generation::{RunId, RunToken};
use crate::enumeration::batch::{batch_size, evaluate_unit};
use crate::enumeration::sink::RootSink;
use crate::enumeration::statistics::{RunStatistics, RunSummary};
use crate::enumeration::{RenderPolicy, RootEvent};
use crate::math::complex::{is_finite, Complex};
use crate::math::roots::IterationPolicy;
use crate::sampling::{RenderBudget, SamplingConfig, SamplingPlan};

/// Read-only snapshot a run evaluates against. Changing any of it means
/// starting a new run, never mutating one in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct RunParameters {
    pub degree: usize,
    pub palette: Vec<Complex>,
    pub sampling: SamplingConfig,
    pub budget: RenderBudget,
    pub iterations: IterationPolicy,
    pub render_policy: RenderPolicy,
    pub batching: BatchConfig,
    /// Opaque revision of presentation inputs (resolution, transform) that
    /// also require a restart when they change
    pub host_revision: u64,
}

impl RunParameters {
    pub fn new(degree: usize, palette: Vec<Complex>) -> Self {
        RunParameters {
            degree,
            palette,
            sampling: SamplingConfig::default(),
            budget: RenderBudget::Unbounded,
            iterations: IterationPolicy::default(),
            render_policy: RenderPolicy::default(),
            batching: BatchConfig::default(),
            host_revision: 0,
        }
    }

    /// Snapshot using the configured solver, batching and render defaults.
    pub fn from_config(degree: usize, palette: Vec<Complex>, config: &ExplorerConfig) -> Self {
        RunParameters {
            degree,
            palette,
            sampling: config.render.sampling(),
            budget: config.render.render_budget(),
            iterations: config.solver.policy(),
            render_policy: config.render.policy,
            batching: config.batching.clone(),
            host_revision: 0,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_budget(mut self, budget: RenderBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_iterations(mut self, iterations: IterationPolicy) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_render_policy(mut self, render_policy: RenderPolicy) -> Self {
        self.render_policy = render_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.batching.parallel = parallel;
        self
    }

    pub fn with_host_revision(mut self, host_revision: u64) -> Self {
        self.host_revision = host_revision;
        self
    }

    /// Reports contract violations. Runs never require this: an empty palette
    /// or degree 0 simply produces no roots.
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(ExplorerError::EmptyPalette);
        }
        if self.degree == 0 {
            return Err(ExplorerError::InvalidDegree(self.degree));
        }
        if let Some(position) = self.palette.iter().position(|&c| !is_finite(c)) {
            return Err(ExplorerError::NonFiniteCoefficient { position });
        }
        Ok(())
    }

    pub fn plan(&self) -> SamplingPlan {
        SamplingPlan::new(self.degree, self.palette.len(), self.sampling, self.budget)
    }

    pub fn batch_size(&self) -> usize {
        batch_size(self.degree, self.palette.len(), &self.batching)
    }

    /// Units the run will process at most.
    pub fn unit_count(&self) -> f64 {
        (self.plan().slot_count / self.batch_size() as f64).ceil()
    }
}

/// Result of advancing a run by one unit.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// More slots remain; call `step` again after yielding
    Continue,
    Finished(RunSummary),
    /// A newer run took over; nothing from this unit was emitted
    Superseded,
}

/// Cheap handle for cancelling a run from elsewhere.
#[derive(Clone, Debug)]
pub struct RunHandle {
    token: RunToken,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.token.id()
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_superseded()
    }

    /// Retires the run; its next unit boundary stops it without emitting.
    pub fn cancel(&self) -> bool {
        self.token.supersede()
    }
}

/// One enumeration pass over a fixed parameter snapshot.
pub struct Run {
    token: RunToken,
    params: RunParameters,
    plan: SamplingPlan,
    batch_size: usize,
    max_iterations: usize,
    next_slot: u64,
    units: u64,
    statistics: RunStatistics,
    started: Instant,
    started_at: DateTime<Utc>,
    summary: Option<RunSummary>,
}

impl Run {
    pub fn new(token: RunToken, params: RunParameters) -> Self {
        let plan = params.plan();
        let batch_size = params.batch_size();
        let max_iterations = params.iterations.max_iterations(params.degree);

        info!("========================================");
        info!("RUN {}", token.id());
        info!("========================================");
        info!("Degree: {}, palette size: {}", params.degree, params.palette.len());
        info!("Sampling: {} (offset {:.3}, filter {})",
              params.sampling.mode.name(), params.sampling.clamped_offset(), params.sampling.filter_coefficient);
        info!("Budget: {:?}", params.budget);
        info!("Space: {:e} polynomials, stride {:e}, slots {:e}",
              plan.total_count, plan.stride, plan.slot_count);
        info!("Batch size: {}, max iterations: {}", batch_size, max_iterations);

        Run {
            token,
            params,
            plan,
            batch_size,
            max_iterations,
            next_slot: 0,
            units: 0,
            statistics: RunStatistics::default(),
            started: Instant::now(),
            started_at: Utc::now(),
            summary: None,
        }
    }

    pub fn id(&self) -> RunId {
        self.token.id()
    }

    pub fn handle(&self) -> RunHandle {
        RunHandle {
            token: self.token.clone(),
        }
    }

    pub fn parameters(&self) -> &RunParameters {
        &self.params
    }

    pub fn plan(&self) -> &SamplingPlan {
        &self.plan
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Units completed so far.
    pub fn units(&self) -> u64 {
        self.units
    }

    /// Slots visited so far over the slots the plan allows.
    pub fn progress(&self) -> f64 {
        if self.plan.slot_count <= 0.0 {
            return 1.0;
        }
        (self.next_slot as f64 / self.plan.slot_count).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    /// Processes exactly one unit.
    pub fn step<S: RootSink + ?Sized>(&mut self, sink: &mut S) -> StepOutcome {
        if let Some(summary) = &self.summary {
            return StepOutcome::Finished(summary.clone());
        }
        if self.token.is_superseded() {
            debug!("Run {} superseded before unit {}", self.id(), self.units + 1);
            return StepOutcome::Superseded;
        }

        let start = self.next_slot;
        let remaining = (self.plan.slot_count - start as f64).max(0.0);
        if remaining == 0.0 {
            return StepOutcome::Finished(self.finalize(sink));
        }
        let end = start + (self.batch_size as f64).min(remaining) as u64;
        let unit_size = (end - start) as usize;

        let unit = evaluate_unit(
            &self.plan,
            &self.params.palette,
            start..end,
            self.max_iterations,
            self.params.batching.parallel,
        );

        // stale-write protection: a newer run may have started while solving
        if self.token.is_superseded() {
            debug!("Run {} superseded during unit {}, discarding", self.id(), self.units + 1);
            return StepOutcome::Superseded;
        }

        let effective_root_count = self.plan.effective_root_count();
        let best_effort = self.params.render_policy == RenderPolicy::BestEffort;
        for solved in &unit.solved {
            self.statistics.record(&solved.result);
            if !solved.result.converged && !best_effort {
                continue;
            }
            for (root_index, &root) in solved.result.roots.iter().enumerate() {
                if !is_finite(root) {
                    continue;
                }
                sink.emit(&RootEvent {
                    run_id: self.id(),
                    root,
                    polynomial_index: solved.index,
                    root_index,
                    unit_position: (solved.slot - start) as usize,
                    unit_size,
                    effective_root_count,
                    converged: solved.result.converged,
                });
                self.statistics.roots_emitted += 1;
            }
        }

        self.next_slot = end;
        self.units += 1;
        debug!(
            "Run {} unit {}: slots {}..{}, {} solved, {} roots so far",
            self.id(),
            self.units,
            start,
            end,
            unit.solved.len(),
            self.statistics.roots_emitted
        );

        if unit.exhausted || self.next_slot as f64 >= self.plan.slot_count {
            return StepOutcome::Finished(self.finalize(sink));
        }
        StepOutcome::Continue
    }

    /// Runs unit after unit on the calling thread. `None` when superseded.
    pub fn run_to_completion<S: RootSink + ?Sized>(&mut self, sink: &mut S) -> Option<RunSummary> {
        loop {
            match self.step(sink) {
                StepOutcome::Continue => continue,
                StepOutcome::Finished(summary) => return Some(summary),
                StepOutcome::Superseded => return None,
            }
        }
    }

    /// Like [`Run::run_to_completion`], yielding to the tokio scheduler
    /// between units so the host stays responsive.
    pub async fn drive<S: RootSink + ?Sized>(&mut self, sink: &mut S) -> Option<RunSummary> {
        loop {
            match self.step(sink) {
                StepOutcome::Continue => tokio::task::yield_now().await,
                StepOutcome::Finished(summary) => return Some(summary),
                StepOutcome::Superseded => return None,
            }
        }
    }

    fn finalize<S: RootSink + ?Sized>(&mut self, sink: &mut S) -> RunSummary {
        let summary = RunSummary::from_statistics(
            self.id(),
            &self.statistics,
            self.units,
            self.started_at,
            self.started.elapsed().as_millis() as u64,
        );

        info!("Run {} finished: {} roots from {} polynomials in {} units ({} ms)",
              summary.run_id, summary.total_roots, summary.total_attempted, summary.units, summary.elapsed_ms);
        info!("  Convergence rate: {:.1}%", summary.convergence_rate_percent);
        info!("  Average iterations: {:.1}", summary.avg_iterations);

        sink.finish(&summary);
        self.summary = Some(summary.clone());
        summary
    }
}
