//! Sweep-level configuration.

use serde::{Deserialize, Serialize};

use hs_types::{config_error, SweepResult};

/// Whether the search minimizes or maximizes the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    /// Whether `candidate` improves on `incumbent`.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Minimize => candidate < incumbent,
            Self::Maximize => candidate > incumbent,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimize => write!(f, "minimize"),
            Self::Maximize => write!(f, "maximize"),
        }
    }
}

/// Top-level configuration for one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Sweep identifier, used for log events and the summary run name.
    pub sweep_id: String,

    /// Total number of trials to run.
    pub num_trials: usize,

    /// Direction of optimization.
    pub direction: Direction,

    /// How many trials may run in parallel.
    pub n_jobs: usize,
}

impl SweepConfig {
    pub fn new(sweep_id: impl Into<String>) -> Self {
        Self {
            sweep_id: sweep_id.into(),
            num_trials: 100,
            direction: Direction::Minimize,
            n_jobs: 1,
        }
    }

    pub fn with_trials(mut self, n: usize) -> Self {
        self.num_trials = n;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_parallelism(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Checked before any trial can start.
    pub fn validate(&self) -> SweepResult<()> {
        if self.sweep_id.trim().is_empty() {
            return Err(config_error!("the sweep id must not be empty"));
        }
        if self.num_trials == 0 {
            return Err(config_error!("the number of trials must be positive"));
        }
        if self.n_jobs == 0 {
            return Err(config_error!("the parallelism degree must be at least 1"));
        }
        Ok(())
    }
}
