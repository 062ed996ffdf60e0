use thiserror::Error;
use uuid::Uuid;

/// Main error type for the HyperSweep system
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Search space error: {0}")]
    Space(#[from] SpaceError),

    #[error("Trial error: {0}")]
    Trial(#[from] TrialError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure raised by the caller-supplied training function. Carried
    /// as-is, never translated.
    #[error(transparent)]
    Training(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No completed trials available")]
    NoCompletedTrials,
}

/// Search-space validation errors, raised when a declarative space document
/// is loaded
#[derive(Error, Debug)]
pub enum SpaceError {
    #[error("Hyperparameter '{name}': the type is not defined")]
    MissingType { name: String },

    #[error("Hyperparameter '{name}': the default value is not defined")]
    MissingDefault { name: String },

    #[error("Hyperparameter '{name}': the range should be a list of two elements, got {len}")]
    RangeArity { name: String, len: usize },

    #[error("Hyperparameter '{name}': low ({low}) must not exceed high ({high})")]
    InvalidBounds { name: String, low: f64, high: f64 },

    #[error("Hyperparameter '{name}': the type '{declared}' is not valid for a range")]
    InvalidRangeType { name: String, declared: String },

    #[error("Hyperparameter '{name}': categorical sampling requires an iter list of choices")]
    CategoricalNeedsChoices { name: String },

    #[error("Hyperparameter '{name}': range bound is not a valid {expected}")]
    NonNumericBound { name: String, expected: &'static str },

    #[error("Search space document has no 'hyperparameters' section")]
    MissingSection,
}

/// Trial-sampling contract errors
#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Parameter '{name}' was already sampled for this trial")]
    DuplicateParam { name: String },

    #[error("Parameter '{name}': categorical choices cannot be empty")]
    EmptyChoices { name: String },

    #[error("Sampling bounds are invalid: low ({low}) must not exceed high ({high})")]
    InvalidBounds { low: f64, high: f64 },
}

/// Experiment-tracking errors
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Invalid tracking configuration: {0}")]
    InvalidConfig(String),

    #[error("Run not found: {0}")]
    RunNotFound(Uuid),

    #[error("Run is not active: {0}")]
    RunNotActive(Uuid),
}

/// Result type alias for HyperSweep operations
pub type SweepResult<T> = Result<T, SweepError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::SweepError::Config(format!($($arg)*))
    };
}

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::SweepError::Validation(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SpaceError::RangeArity {
            name: "lr".to_string(),
            len: 3,
        };

        assert!(error.to_string().contains("lr"));
        assert!(error.to_string().contains("two elements"));
        assert!(error.to_string().contains('3'));
    }

    #[test]
    fn test_error_conversion() {
        let space_error = SpaceError::MissingType {
            name: "batch_size".to_string(),
        };
        let sweep_error: SweepError = space_error.into();

        match sweep_error {
            SweepError::Space(_) => (),
            _ => panic!("Expected Space error"),
        }
    }

    #[test]
    fn test_training_error_is_transparent() {
        let inner = anyhow::anyhow!("loss diverged at step 42");
        let sweep_error: SweepError = inner.into();

        assert_eq!(sweep_error.to_string(), "loss diverged at step 42");
        match sweep_error {
            SweepError::Training(_) => (),
            _ => panic!("Expected Training error"),
        }
    }

    #[test]
    fn test_macros() {
        let _config_err = config_error!("Missing required field: {}", "experiment");
        let _validation_err = validation_error!("Invalid value: {}", 42);
    }
}
