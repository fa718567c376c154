// src/enumeration/sink.rs

use crate::enumeration::statistics::RunSummary;
use crate::enumeration::RootEvent;

/// Receiver for a run's output. The run is the only producer.
pub trait RootSink {
    fn emit(&mut self, event: &RootEvent);

    /// Called once when a run finishes naturally; never for a superseded run.
    fn finish(&mut self, _summary: &RunSummary) {}
}

impl<F: FnMut(&RootEvent)> RootSink for F {
    fn emit(&mut self, event: &RootEvent) {
        self(event)
    }
}

/// Keeps every event and the final summary; handy for tests and small runs.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<RootEvent>,
    pub summary: Option<RunSummary>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RootSink for CollectingSink {
    fn emit(&mut self, event: &RootEvent) {
        self.events.push(*event);
    }

    fn finish(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}
