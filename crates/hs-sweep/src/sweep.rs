//! Sweep orchestration: a tracked run around every trial, and a summary of
//! the best result after the search.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hs_tracking::{RunStatus, TrackingClient};
use hs_types::{DecodedParams, SweepResult};

use crate::config::SweepConfig;
use crate::driver::{Objective, SearchDriver, SearchOutcome};
use crate::space::SearchSpace;
use crate::trial::TrialSampler;

/// Orchestrates a hyperparameter sweep.
///
/// Bundles a validated [`SweepConfig`] with a tracking client and hands
/// driver-ready objectives to a search driver. The client is configured by
/// construction; no runtime configured-guard exists anywhere downstream.
pub struct SweepManager<C: TrackingClient> {
    config: SweepConfig,
    tracker: Arc<Mutex<C>>,
}

impl<C: TrackingClient> SweepManager<C> {
    /// Fails fast on an invalid sweep configuration, before any trial or
    /// run exists.
    pub fn new(config: SweepConfig, client: C) -> SweepResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tracker: Arc::new(Mutex::new(client)),
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Shared handle to the tracking client, e.g. for post-sweep inspection.
    pub fn tracker(&self) -> Arc<Mutex<C>> {
        Arc::clone(&self.tracker)
    }

    /// Bundle the search-space document path, the training function, and
    /// the tracking client into a driver-ready objective.
    ///
    /// The training function receives the decoded parameters and the open
    /// run's id, and returns the scalar objective value.
    pub fn objective<F>(&self, space_path: impl Into<PathBuf>, train: F) -> SweepObjective<C, F>
    where
        F: Fn(&DecodedParams, Uuid) -> anyhow::Result<f64> + Sync,
    {
        SweepObjective {
            space_path: space_path.into(),
            train,
            tracker: Arc::clone(&self.tracker),
        }
    }

    /// Run the full search, then record the best parameters and value under
    /// a dedicated summary run.
    pub fn run_search(
        &self,
        driver: &mut dyn SearchDriver,
        objective: &dyn Objective,
    ) -> SweepResult<SearchOutcome> {
        info!(
            sweep = %self.config.sweep_id,
            driver = driver.name(),
            trials = self.config.num_trials,
            n_jobs = self.config.n_jobs,
            direction = %self.config.direction,
            "starting hyperparameter sweep"
        );

        let outcome = driver.optimize(
            self.config.direction,
            self.config.num_trials,
            self.config.n_jobs,
            objective,
        )?;

        self.log_summary(&outcome)?;

        info!(
            sweep = %self.config.sweep_id,
            best_value = outcome.best_value,
            trials = outcome.trials_completed,
            "sweep finished"
        );
        Ok(outcome)
    }

    fn log_summary(&self, outcome: &SearchOutcome) -> SweepResult<()> {
        let name = format!("{}-summary", self.config.sweep_id);
        let mut tracker = self.tracker.lock();
        let run_id = tracker.open_run(Some(&name))?;

        let written = write_summary(&mut *tracker, run_id, outcome);
        let status = if written.is_ok() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        let closed = tracker.close_run(run_id, status);

        written.and(closed.map_err(Into::into))
    }
}

fn write_summary<C: TrackingClient + ?Sized>(
    tracker: &mut C,
    run_id: Uuid,
    outcome: &SearchOutcome,
) -> SweepResult<()> {
    for (key, value) in &outcome.best_params {
        tracker.log_param(run_id, key, &value.to_string())?;
    }
    tracker.log_metric(run_id, "best_value", outcome.best_value)?;
    Ok(())
}

/// Driver-facing objective for one sweep: explicit state instead of a
/// capturing closure, so it can be shared across trial worker threads.
pub struct SweepObjective<C: TrackingClient, F> {
    space_path: PathBuf,
    train: F,
    tracker: Arc<Mutex<C>>,
}

impl<C, F> SweepObjective<C, F>
where
    C: TrackingClient,
    F: Fn(&DecodedParams, Uuid) -> anyhow::Result<f64> + Sync,
{
    /// Decode, log params, train, log the objective metric. The caller
    /// closes the run on every exit path.
    fn run_trial(
        &self,
        trial: &mut dyn TrialSampler,
        run_id: Uuid,
        space: &SearchSpace,
    ) -> SweepResult<f64> {
        let params = space.decode(trial)?;
        {
            let mut tracker = self.tracker.lock();
            for (key, value) in params.iter() {
                tracker.log_param(run_id, key, &value.to_string())?;
            }
        }

        // The lock is never held across the training function.
        let value = (self.train)(&params, run_id)?;

        self.tracker.lock().log_metric(run_id, "objective", value)?;
        Ok(value)
    }
}

impl<C, F> Objective for SweepObjective<C, F>
where
    C: TrackingClient,
    F: Fn(&DecodedParams, Uuid) -> anyhow::Result<f64> + Sync,
{
    fn evaluate(&self, trial: &mut dyn TrialSampler) -> SweepResult<f64> {
        // A malformed space document fails here, before any run is opened.
        let space = SearchSpace::load(&self.space_path)?;

        let run_id = self.tracker.lock().open_run(None)?;
        debug!(trial = trial.number(), run = %run_id, "trial run opened");

        let result = self.run_trial(trial, run_id, &space);

        let status = if result.is_ok() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        if let Err(close_err) = self.tracker.lock().close_run(run_id, status) {
            if result.is_ok() {
                return Err(close_err.into());
            }
            // Keep the trial's own error; the closure failure is secondary.
            warn!(run = %run_id, error = %close_err, "failed to close trial run");
        }
        result
    }
}
