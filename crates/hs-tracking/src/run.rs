//! Tracked run records and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle state of a tracked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is open and accepting parameters/metrics.
    Active,
    Completed,
    Failed,
}

/// One tracked record in the experiment-tracking backend, one per trial.
///
/// Lifecycle is open -> logged-to -> closed; a run id is never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: Uuid,
    /// Optional human-readable name (e.g. the sweep summary run).
    pub run_name: Option<String>,
    /// Experiment this run belongs to.
    pub experiment: String,
    pub status: RunStatus,
    /// Logged parameters, in logging order.
    pub params: Vec<(String, String)>,
    /// Logged scalar metrics.
    pub metrics: HashMap<String, f64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new(experiment: impl Into<String>, run_name: Option<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_name,
            experiment: experiment.into(),
            status: RunStatus::Active,
            params: Vec::new(),
            metrics: HashMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Active
    }

    pub fn close(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// Look up a logged parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
