// src/enumeration/explorer.rs

use log::{info, warn};

use crate::core::run_generation::{RunGeneration, RunId};
use crate::enumeration::run::{Run, RunHandle, RunParameters};
use crate::enumeration::sink::RootSink;
use crate::enumeration::statistics::RunSummary;
use crate::enumeration::RenderPolicy;
use crate::math::roots::IterationPolicy;
use crate::sampling::SamplingConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running(RunId),
    /// The last run was retired before it finished and nothing replaced it
    Cancelled,
}

/// The inputs whose change requires a restart.
///
/// The budget enters only through the derived unit count, so a budget change
/// that rounds to the same number of units keeps the current run going.
#[derive(Clone, Debug, PartialEq)]
pub struct RunFingerprint {
    pub degree: usize,
    pub palette_bits: Vec<(u64, u64)>,
    pub unit_count: f64,
    pub sampling: SamplingConfig,
    pub iterations: IterationPolicy,
    pub render_policy: RenderPolicy,
    pub host_revision: u64,
}

impl RunFingerprint {
    pub fn of(params: &RunParameters) -> Self {
        RunFingerprint {
            degree: params.degree,
            palette_bits: params
                .palette
                .iter()
                .map(|c| (c.re.to_bits(), c.im.to_bits()))
                .collect(),
            unit_count: params.unit_count(),
            sampling: params.sampling,
            iterations: params.iterations,
            render_policy: params.render_policy,
            host_revision: params.host_revision,
        }
    }
}

/// Owns the run lifecycle: Idle -> Running(id) -> Idle, with newer runs
/// superseding older ones through the shared generation counter.
pub struct Explorer {
    generation: RunGeneration,
    state: DriverState,
    fingerprint: Option<RunFingerprint>,
}

impl Explorer {
    pub fn new() -> Self {
        Explorer {
            generation: RunGeneration::new(),
            state: DriverState::Idle,
            fingerprint: None,
        }
    }

    pub fn state(&self) -> DriverState {
        match self.state {
            // a handle may have cancelled the run from another thread
            DriverState::Running(id) if !self.generation.is_current(id) => DriverState::Cancelled,
            state => state,
        }
    }

    /// Starts a run unconditionally, superseding any run in flight.
    pub fn start_run(&mut self, params: RunParameters) -> Run {
        if let DriverState::Running(previous) = self.state() {
            warn!("Superseding run {}", previous);
        }
        self.fingerprint = Some(RunFingerprint::of(&params));
        let token = self.generation.begin();
        self.state = DriverState::Running(token.id());
        Run::new(token, params)
    }

    /// Starts a run only when the fingerprint differs from the last run's (or
    /// the last run was cancelled). `None` means the current run stands.
    pub fn update(&mut self, params: RunParameters) -> Option<Run> {
        let fingerprint = RunFingerprint::of(&params);
        let unchanged = self.fingerprint.as_ref() == Some(&fingerprint);
        if unchanged && self.state() != DriverState::Cancelled {
            return None;
        }
        Some(self.start_run(params))
    }

    pub fn cancel_run(&mut self, handle: &RunHandle) {
        if handle.cancel() {
            info!("Run {} cancelled", handle.id());
        }
        if self.state == DriverState::Running(handle.id()) {
            self.state = DriverState::Cancelled;
        }
    }

    /// Marks `id` as done; ignored unless it is the current run.
    pub fn complete(&mut self, id: RunId) {
        if self.state == DriverState::Running(id) && self.generation.is_current(id) {
            self.state = DriverState::Idle;
        }
    }

    /// Runs `run` synchronously and updates the state machine.
    pub fn run_to_completion<S: RootSink + ?Sized>(&mut self, run: &mut Run, sink: &mut S) -> Option<RunSummary> {
        let summary = run.run_to_completion(sink);
        if summary.is_some() {
            self.complete(run.id());
        }
        summary
    }

    /// Async counterpart of [`Explorer::run_to_completion`].
    pub async fn drive<S: RootSink + ?Sized>(&mut self, run: &mut Run, sink: &mut S) -> Option<RunSummary> {
        let summary = run.drive(sink).await;
        if summary.is_some() {
            self.complete(run.id());
        }
        summary
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::sink::CollectingSink;
    use crate::math::complex::Complex;
    use crate::sampling::RenderBudget;

    fn params(budget: u64) -> RunParameters {
        RunParameters::new(8, vec![Complex::new(1.0, 0.0), Complex::new(-1.0, 0.0)])
            .with_budget(RenderBudget::Limited(budget))
            .with_parallel(false)
    }

    #[test]
    fn test_lifecycle() {
        let mut explorer = Explorer::new();
        assert_eq!(explorer.state(), DriverState::Idle);

        let mut run = explorer.start_run(params(800));
        assert_eq!(explorer.state(), DriverState::Running(run.id()));

        let mut sink = CollectingSink::new();
        assert!(explorer.run_to_completion(&mut run, &mut sink).is_some());
        assert_eq!(explorer.state(), DriverState::Idle);
    }

    #[test]
    fn test_update_ignores_inconsequential_budget_change() {
        let mut explorer = Explorer::new();
        let first = explorer.start_run(params(800));
        // 100 vs 101 polynomials: both fit one unit
        assert!(explorer.update(params(808)).is_none());
        assert_eq!(explorer.state(), DriverState::Running(first.id()));
    }

    #[test]
    fn test_update_restarts_on_palette_change() {
        let mut explorer = Explorer::new();
        let first = explorer.start_run(params(800));
        let mut changed = params(800);
        changed.palette[1] = Complex::new(-1.0, 0.5);
        let second = explorer.update(changed).expect("palette change restarts");
        assert!(first.handle().is_superseded());
        assert_eq!(explorer.state(), DriverState::Running(second.id()));
    }

    #[test]
    fn test_update_restarts_on_host_revision_change() {
        let mut explorer = Explorer::new();
        explorer.start_run(params(800));
        assert!(explorer.update(params(800).with_host_revision(1)).is_some());
    }

    #[test]
    fn test_cancel_then_update_restarts() {
        let mut explorer = Explorer::new();
        let run = explorer.start_run(params(800));
        explorer.cancel_run(&run.handle());
        assert_eq!(explorer.state(), DriverState::Cancelled);
        assert!(explorer.update(params(800)).is_some());
    }

    #[test]
    fn test_stale_complete_is_ignored() {
        let mut explorer = Explorer::new();
        let first = explorer.start_run(params(800));
        let second = explorer.start_run(params(1600));
        explorer.complete(first.id());
        assert_eq!(explorer.state(), DriverState::Running(second.id()));
    }
}
