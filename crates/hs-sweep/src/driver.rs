//! Search-driver seam and the uniform random reference driver.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::unbounded;
use tracing::debug;

use hs_types::{ParamValue, SweepError, SweepResult};

use crate::config::Direction;
use crate::trial::{RandomTrial, TrialSampler};

/// One evaluation of the search objective for a single trial.
///
/// Implementations bundle their state explicitly (see
/// [`SweepObjective`](crate::SweepObjective)) instead of capturing it in a
/// closure, so drivers can share them across worker threads.
pub trait Objective: Sync {
    fn evaluate(&self, trial: &mut dyn TrialSampler) -> SweepResult<f64>;
}

/// Record of one completed trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub number: usize,
    pub value: f64,
    /// Sampled parameters only; fixed entries are logged per run instead.
    pub params: Vec<(String, ParamValue)>,
}

/// Final result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Sampled parameters of the best trial.
    pub best_params: Vec<(String, ParamValue)>,
    pub best_value: f64,
    pub trials_completed: usize,
}

/// A search driver runs the trial budget against an objective.
///
/// Trial scheduling and parallelism live entirely behind this seam; the
/// orchestrator only hands over the budget from its sweep configuration.
pub trait SearchDriver: Send {
    fn optimize(
        &mut self,
        direction: Direction,
        n_trials: usize,
        n_jobs: usize,
        objective: &dyn Objective,
    ) -> SweepResult<SearchOutcome>;

    /// Human-readable driver name.
    fn name(&self) -> &str;
}

/// Independent uniform random sampling across the search space.
///
/// The reference [`SearchDriver`]: no adaptation between trials, so every
/// trial is independent and the whole budget can run in parallel. The first
/// trial error aborts the search; remaining workers stop picking up work and
/// the error propagates.
#[derive(Debug, Clone, Default)]
pub struct RandomDriver {
    seed: Option<u64>,
}

impl RandomDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the per-trial sampling streams for reproducible sweeps.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn run_trials(
        &self,
        n_trials: usize,
        n_jobs: usize,
        objective: &dyn Objective,
    ) -> SweepResult<Vec<TrialRecord>> {
        let (task_tx, task_rx) = unbounded();
        for number in 0..n_trials {
            // The receiver outlives this loop, so the send cannot fail.
            let _ = task_tx.send(number);
        }
        drop(task_tx);

        let abort = AtomicBool::new(false);
        let seed = self.seed;
        let mut records = Vec::with_capacity(n_trials);
        let mut first_error = None;

        std::thread::scope(|scope| {
            let mut workers = Vec::with_capacity(n_jobs);
            for _ in 0..n_jobs {
                let task_rx = task_rx.clone();
                let abort = &abort;
                workers.push(scope.spawn(move || {
                    let mut completed = Vec::new();
                    while let Ok(number) = task_rx.recv() {
                        if abort.load(Ordering::Relaxed) {
                            break;
                        }
                        let mut trial = RandomTrial::new(number, seed);
                        match objective.evaluate(&mut trial) {
                            Ok(value) => {
                                debug!(trial = number, value, "trial completed");
                                completed.push(TrialRecord {
                                    number,
                                    value,
                                    params: trial.into_sampled(),
                                });
                            }
                            Err(err) => {
                                abort.store(true, Ordering::Relaxed);
                                return Err(err);
                            }
                        }
                    }
                    Ok(completed)
                }));
            }

            for worker in workers {
                match worker.join() {
                    Ok(Ok(mut completed)) => records.append(&mut completed),
                    Ok(Err(err)) => {
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });

        if let Some(err) = first_error {
            return Err(err);
        }
        records.sort_by_key(|record| record.number);
        Ok(records)
    }
}

impl SearchDriver for RandomDriver {
    fn optimize(
        &mut self,
        direction: Direction,
        n_trials: usize,
        n_jobs: usize,
        objective: &dyn Objective,
    ) -> SweepResult<SearchOutcome> {
        let n_jobs = n_jobs.max(1).min(n_trials.max(1));
        let records = self.run_trials(n_trials, n_jobs, objective)?;

        // NaN objectives never win.
        let best = records
            .iter()
            .filter(|record| !record.value.is_nan())
            .reduce(|best, next| {
                if direction.improves(next.value, best.value) {
                    next
                } else {
                    best
                }
            })
            .ok_or(SweepError::NoCompletedTrials)?;

        Ok(SearchOutcome {
            best_params: best.params.clone(),
            best_value: best.value,
            trials_completed: records.len(),
        })
    }

    fn name(&self) -> &str {
        "random"
    }
}
