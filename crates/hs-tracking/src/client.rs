//! The tracking-backend seam consumed by the sweep orchestrator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hs_types::TrackingError;

use crate::run::RunStatus;

/// Result alias for tracking operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Where and under which experiment runs are recorded.
///
/// Validated at construction: a client built from a `TrackingConfig` can
/// never be in an unconfigured state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    experiment: String,
    tracking_uri: String,
}

impl TrackingConfig {
    pub fn new(
        experiment: impl Into<String>,
        tracking_uri: impl Into<String>,
    ) -> Result<Self> {
        let experiment = experiment.into();
        let tracking_uri = tracking_uri.into();
        if experiment.trim().is_empty() {
            return Err(TrackingError::InvalidConfig(
                "experiment name must not be empty".to_string(),
            ));
        }
        if tracking_uri.trim().is_empty() {
            return Err(TrackingError::InvalidConfig(
                "tracking URI must not be empty".to_string(),
            ));
        }
        Ok(Self {
            experiment,
            tracking_uri,
        })
    }

    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    pub fn tracking_uri(&self) -> &str {
        &self.tracking_uri
    }
}

/// Operations the sweep orchestrator needs from a tracking backend.
///
/// One run per trial: `open_run`, a flat set of `log_param` calls, a single
/// `log_metric` for the objective, then `close_run`. Implementations must
/// reject logging to unknown or closed runs.
pub trait TrackingClient: Send {
    fn config(&self) -> &TrackingConfig;

    /// Open a new run and return its id.
    fn open_run(&mut self, run_name: Option<&str>) -> Result<Uuid>;

    /// Record a single named parameter on an open run.
    fn log_param(&mut self, run_id: Uuid, key: &str, value: &str) -> Result<()>;

    /// Record a single named scalar metric on an open run.
    fn log_metric(&mut self, run_id: Uuid, key: &str, value: f64) -> Result<()>;

    /// Close an open run with a terminal status.
    fn close_run(&mut self, run_id: Uuid, status: RunStatus) -> Result<()>;
}
