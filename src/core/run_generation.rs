// src/core/run_generation.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of one run. Ids only ever grow.
pub type RunId = u64;

/// Shared monotonic counter naming the one run allowed to publish results.
///
/// Starting a run advances the counter; every older run notices at its next
/// unit boundary that its id is no longer current and stops without emitting.
#[derive(Clone, Debug, Default)]
pub struct RunGeneration {
    current: Arc<AtomicU64>,
}

impl RunGeneration {
    pub fn new() -> Self {
        RunGeneration {
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Supersedes whatever run is current and returns a token for the new one.
    pub fn begin(&self) -> RunToken {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        RunToken {
            id,
            generation: self.clone(),
        }
    }

    pub fn current(&self) -> RunId {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, id: RunId) -> bool {
        self.current() == id
    }
}

/// A run's view of the generation counter.
#[derive(Clone, Debug)]
pub struct RunToken {
    id: RunId,
    generation: RunGeneration,
}

impl RunToken {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn is_superseded(&self) -> bool {
        !self.generation.is_current(self.id)
    }

    /// Retires this run. A no-op when a newer run already took over, so a late
    /// cancel never disturbs its successor.
    pub fn supersede(&self) -> bool {
        self.generation
            .current
            .compare_exchange(self.id, self.id + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
