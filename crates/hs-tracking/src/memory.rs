//! In-memory reference tracking client.

use std::collections::HashMap;

use uuid::Uuid;

use hs_types::TrackingError;

use crate::client::{Result, TrackingClient, TrackingConfig};
use crate::run::{Run, RunStatus};

/// Tracking client that keeps every run in process memory.
///
/// The reference implementation of [`TrackingClient`]: it backs the test
/// suite and small local sweeps. Closed runs stay inspectable through
/// [`runs`](InMemoryTracker::runs) and [`run`](InMemoryTracker::run).
#[derive(Debug)]
pub struct InMemoryTracker {
    config: TrackingConfig,
    active: HashMap<Uuid, Run>,
    finished: Vec<Run>,
}

impl InMemoryTracker {
    pub fn connect(config: TrackingConfig) -> Self {
        Self {
            config,
            active: HashMap::new(),
            finished: Vec::new(),
        }
    }

    /// All finished runs, in closing order.
    pub fn runs(&self) -> &[Run] {
        &self.finished
    }

    /// Look up any run, open or closed.
    pub fn run(&self, run_id: Uuid) -> Option<&Run> {
        self.active
            .get(&run_id)
            .or_else(|| self.finished.iter().find(|r| r.run_id == run_id))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn active_run(&mut self, run_id: Uuid) -> Result<&mut Run> {
        self.active
            .get_mut(&run_id)
            .ok_or(TrackingError::RunNotActive(run_id))
    }
}

impl TrackingClient for InMemoryTracker {
    fn config(&self) -> &TrackingConfig {
        &self.config
    }

    fn open_run(&mut self, run_name: Option<&str>) -> Result<Uuid> {
        let run = Run::new(self.config.experiment(), run_name.map(String::from));
        let run_id = run.run_id;
        self.active.insert(run_id, run);
        Ok(run_id)
    }

    fn log_param(&mut self, run_id: Uuid, key: &str, value: &str) -> Result<()> {
        let run = self.active_run(run_id)?;
        run.params.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn log_metric(&mut self, run_id: Uuid, key: &str, value: f64) -> Result<()> {
        let run = self.active_run(run_id)?;
        run.metrics.insert(key.to_string(), value);
        Ok(())
    }

    fn close_run(&mut self, run_id: Uuid, status: RunStatus) -> Result<()> {
        let mut run = self
            .active
            .remove(&run_id)
            .ok_or(TrackingError::RunNotActive(run_id))?;
        run.close(status);
        self.finished.push(run);
        Ok(())
    }
}
