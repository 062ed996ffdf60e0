//! Trial-sampling context: the seam between the decoder and a search driver.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use hs_types::{ParamValue, SweepResult, TrialError};

/// Per-trial sampling context handed to the decoder.
///
/// Implementations record every sampled value. Sampling the same name twice
/// is a contract violation: the decoder runs at most once per trial.
pub trait TrialSampler {
    /// Zero-based trial sequence number.
    fn number(&self) -> usize;

    /// Sample a uniform integer in `[low, high]` inclusive.
    fn suggest_int(&mut self, name: &str, low: i64, high: i64) -> SweepResult<i64>;

    /// Sample a uniform real in `[low, high]`.
    fn suggest_float(&mut self, name: &str, low: f64, high: f64) -> SweepResult<f64>;

    /// Sample one member of a discrete choice set.
    fn suggest_categorical(&mut self, name: &str, choices: &[Value]) -> SweepResult<Value>;

    /// Values sampled so far, in sampling order. Fixed defaults never appear
    /// here; they are constant per trial and only logged with the run.
    fn sampled(&self) -> &[(String, ParamValue)];
}

/// Uniform random sampling context used by the reference driver.
#[derive(Debug)]
pub struct RandomTrial {
    number: usize,
    rng: StdRng,
    sampled: Vec<(String, ParamValue)>,
}

impl RandomTrial {
    /// A `base_seed` derives a distinct per-trial seed, making whole sweeps
    /// reproducible.
    pub fn new(number: usize, base_seed: Option<u64>) -> Self {
        let rng = match base_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(number as u64)),
            None => StdRng::from_os_rng(),
        };
        Self {
            number,
            rng,
            sampled: Vec::new(),
        }
    }

    /// Consume the trial, keeping its sampled values.
    pub fn into_sampled(self) -> Vec<(String, ParamValue)> {
        self.sampled
    }

    fn ensure_fresh(&self, name: &str) -> Result<(), TrialError> {
        if self.sampled.iter().any(|(n, _)| n == name) {
            return Err(TrialError::DuplicateParam {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl TrialSampler for RandomTrial {
    fn number(&self) -> usize {
        self.number
    }

    fn suggest_int(&mut self, name: &str, low: i64, high: i64) -> SweepResult<i64> {
        self.ensure_fresh(name)?;
        if low > high {
            return Err(TrialError::InvalidBounds {
                low: low as f64,
                high: high as f64,
            }
            .into());
        }
        let value = self.rng.random_range(low..=high);
        self.sampled.push((name.to_string(), ParamValue::Int(value)));
        Ok(value)
    }

    fn suggest_float(&mut self, name: &str, low: f64, high: f64) -> SweepResult<f64> {
        self.ensure_fresh(name)?;
        if low > high {
            return Err(TrialError::InvalidBounds { low, high }.into());
        }
        let value = self.rng.random_range(low..=high);
        self.sampled
            .push((name.to_string(), ParamValue::Float(value)));
        Ok(value)
    }

    fn suggest_categorical(&mut self, name: &str, choices: &[Value]) -> SweepResult<Value> {
        self.ensure_fresh(name)?;
        if choices.is_empty() {
            return Err(TrialError::EmptyChoices {
                name: name.to_string(),
            }
            .into());
        }
        let choice = choices[self.rng.random_range(0..choices.len())].clone();
        self.sampled
            .push((name.to_string(), ParamValue::from_json(&choice)));
        Ok(choice)
    }

    fn sampled(&self) -> &[(String, ParamValue)] {
        &self.sampled
    }
}
