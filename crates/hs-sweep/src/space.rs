//! Search space definitions and declarative-document decoding.
//!
//! A search space is described by an external JSON document with a
//! `"hyperparameters"` object (and an optional free-text `"help"` entry,
//! which is ignored). Every entry is validated once at load time into a
//! tagged [`Sampling`] variant; decoding a trial is then a straight match
//! over the validated definitions.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use hs_types::{DecodedParams, ParamValue, SpaceError, SweepResult};

use crate::trial::TrialSampler;

/// A single hyperparameter dimension in the search space.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperparameterDef {
    pub name: String,
    /// Declared default, used verbatim when the entry is [`Sampling::Fixed`].
    pub default: Value,
    pub sampling: Sampling,
}

/// How one hyperparameter is sampled.
///
/// A non-empty `iter` list always wins over `range`, regardless of the
/// declared numeric type; an empty `iter` list counts as absent. Existing
/// space documents rely on this precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Sampling {
    /// Neither `iter` nor `range` declared: the default is used verbatim,
    /// constant across all trials.
    Fixed,
    /// Discrete choice from the declared `iter` list.
    Categorical { choices: Vec<Value> },
    /// Uniform integer in `[low, high]` inclusive.
    IntRange { low: i64, high: i64 },
    /// Uniform real in `[low, high]`.
    FloatRange { low: f64, high: f64 },
}

/// Raw JSON shape of one hyperparameter entry. Every field is optional so
/// validation can report precisely which required piece is missing.
#[derive(Debug, Deserialize)]
struct RawHyperparameter {
    #[serde(rename = "type")]
    kind: Option<String>,
    default: Option<Value>,
    iter: Option<Vec<Value>>,
    range: Option<Vec<Value>>,
}

/// The full search space: an ordered list of hyperparameter definitions.
///
/// Order follows the document's declaration order, and decoding and
/// parameter logging preserve it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSpace {
    params: Vec<HyperparameterDef>,
}

impl SearchSpace {
    /// Load and validate a search space from a JSON document on disk.
    pub fn load(path: impl AsRef<Path>) -> SweepResult<Self> {
        let text = fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&text)?;
        Self::from_document(&document)
    }

    /// Validate a search space from an already-parsed document.
    ///
    /// Only the `"hyperparameters"` object is read; any other top-level
    /// entries (such as `"help"`) are ignored.
    pub fn from_document(document: &Value) -> SweepResult<Self> {
        let section = document
            .get("hyperparameters")
            .and_then(Value::as_object)
            .ok_or(SpaceError::MissingSection)?;

        let mut params = Vec::with_capacity(section.len());
        for (name, entry) in section {
            let raw: RawHyperparameter = serde_json::from_value(entry.clone())?;
            params.push(validate_entry(name, raw)?);
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &[HyperparameterDef] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Produce the concrete parameter assignment for one trial.
    ///
    /// Entries are decoded independently, in declaration order; fixed
    /// entries never touch the sampling context. One decode per trial: the
    /// context rejects re-sampling an already-recorded name.
    pub fn decode(&self, trial: &mut dyn TrialSampler) -> SweepResult<DecodedParams> {
        let mut decoded = DecodedParams::new();
        for def in &self.params {
            let value = match &def.sampling {
                Sampling::Fixed => ParamValue::from_json(&def.default),
                Sampling::Categorical { choices } => {
                    let choice = trial.suggest_categorical(&def.name, choices)?;
                    ParamValue::from_json(&choice)
                }
                Sampling::IntRange { low, high } => {
                    ParamValue::Int(trial.suggest_int(&def.name, *low, *high)?)
                }
                Sampling::FloatRange { low, high } => {
                    ParamValue::Float(trial.suggest_float(&def.name, *low, *high)?)
                }
            };
            decoded.insert(def.name.clone(), value);
        }
        Ok(decoded)
    }
}

fn validate_entry(name: &str, raw: RawHyperparameter) -> Result<HyperparameterDef, SpaceError> {
    let declared = raw.kind.ok_or_else(|| SpaceError::MissingType {
        name: name.to_string(),
    })?;
    let default = raw.default.ok_or_else(|| SpaceError::MissingDefault {
        name: name.to_string(),
    })?;

    // An empty iter list counts as absent.
    let iter = raw.iter.filter(|choices| !choices.is_empty());

    if declared == "categorical" && iter.is_none() && raw.range.is_some() {
        return Err(SpaceError::CategoricalNeedsChoices {
            name: name.to_string(),
        });
    }

    let sampling = if let Some(choices) = iter {
        Sampling::Categorical { choices }
    } else if let Some(range) = raw.range {
        if range.len() != 2 {
            return Err(SpaceError::RangeArity {
                name: name.to_string(),
                len: range.len(),
            });
        }
        match declared.as_str() {
            "int" => {
                let low = int_bound(name, &range[0])?;
                let high = int_bound(name, &range[1])?;
                if low > high {
                    return Err(SpaceError::InvalidBounds {
                        name: name.to_string(),
                        low: low as f64,
                        high: high as f64,
                    });
                }
                Sampling::IntRange { low, high }
            }
            "float" => {
                let low = float_bound(name, &range[0])?;
                let high = float_bound(name, &range[1])?;
                if low > high {
                    return Err(SpaceError::InvalidBounds {
                        name: name.to_string(),
                        low,
                        high,
                    });
                }
                Sampling::FloatRange { low, high }
            }
            other => {
                return Err(SpaceError::InvalidRangeType {
                    name: name.to_string(),
                    declared: other.to_string(),
                })
            }
        }
    } else {
        Sampling::Fixed
    };

    Ok(HyperparameterDef {
        name: name.to_string(),
        default,
        sampling,
    })
}

fn int_bound(name: &str, bound: &Value) -> Result<i64, SpaceError> {
    bound.as_i64().ok_or(SpaceError::NonNumericBound {
        name: name.to_string(),
        expected: "integer",
    })
}

fn float_bound(name: &str, bound: &Value) -> Result<f64, SpaceError> {
    bound.as_f64().ok_or(SpaceError::NonNumericBound {
        name: name.to_string(),
        expected: "number",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::RandomTrial;
    use hs_types::SweepError;
    use serde_json::json;

    fn space(document: serde_json::Value) -> SweepResult<SearchSpace> {
        SearchSpace::from_document(&document)
    }

    fn trial(number: usize) -> RandomTrial {
        RandomTrial::new(number, Some(99))
    }

    #[test]
    fn fixed_entry_returns_default_verbatim() {
        let space = space(json!({
            "hyperparameters": {
                "optimizer": {"type": "categorical", "default": "adam"},
                "epochs": {"type": "int", "default": 10}
            }
        }))
        .unwrap();

        for number in 0..20 {
            let params = space.decode(&mut trial(number)).unwrap();
            assert_eq!(
                params.get("optimizer"),
                Some(&ParamValue::Json(json!("adam")))
            );
            assert_eq!(params.get("epochs"), Some(&ParamValue::Int(10)));
        }
    }

    #[test]
    fn iter_entry_always_yields_a_member() {
        let space = space(json!({
            "hyperparameters": {
                "batch_size": {"type": "int", "default": 32, "iter": [16, 32, 64]}
            }
        }))
        .unwrap();

        for number in 0..50 {
            let params = space.decode(&mut trial(number)).unwrap();
            let value = params.get("batch_size").unwrap().as_i64().unwrap();
            assert!([16, 32, 64].contains(&value), "unexpected member: {value}");
        }
    }

    #[test]
    fn int_range_is_inclusive_and_integral() {
        let space = space(json!({
            "hyperparameters": {
                "layers": {"type": "int", "default": 2, "range": [1, 4]}
            }
        }))
        .unwrap();

        let mut seen = std::collections::HashSet::new();
        for number in 0..200 {
            let params = space.decode(&mut trial(number)).unwrap();
            let value = params.get("layers").unwrap().as_i64().unwrap();
            assert!((1..=4).contains(&value), "out of range: {value}");
            seen.insert(value);
        }
        // Bounds are inclusive; with 200 draws both ends show up
        assert!(seen.contains(&1));
        assert!(seen.contains(&4));
    }

    #[test]
    fn float_range_respects_bounds() {
        let space = space(json!({
            "hyperparameters": {
                "lr": {"type": "float", "default": 0.1, "range": [0.001, 0.1]}
            }
        }))
        .unwrap();

        for number in 0..100 {
            let params = space.decode(&mut trial(number)).unwrap();
            let value = params.get("lr").unwrap().as_f64().unwrap();
            assert!((0.001..=0.1).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn categorical_with_range_is_rejected() {
        let err = space(json!({
            "hyperparameters": {
                "kind": {"type": "categorical", "default": 1, "range": [1, 2]}
            }
        }))
        .unwrap_err();

        match err {
            SweepError::Space(SpaceError::CategoricalNeedsChoices { name }) => {
                assert_eq!(name, "kind")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = space(json!({
            "hyperparameters": {"lr": {"default": 0.1}}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::MissingType { .. })
        ));
    }

    #[test]
    fn missing_default_is_rejected() {
        let err = space(json!({
            "hyperparameters": {"lr": {"type": "float", "range": [0.0, 1.0]}}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::MissingDefault { .. })
        ));
    }

    #[test]
    fn range_must_have_two_elements() {
        let err = space(json!({
            "hyperparameters": {
                "lr": {"type": "float", "default": 0.1, "range": [0.0, 0.5, 1.0]}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::RangeArity { len: 3, .. })
        ));
    }

    #[test]
    fn range_with_non_numeric_type_is_rejected() {
        let err = space(json!({
            "hyperparameters": {
                "kind": {"type": "str", "default": "a", "range": [0, 1]}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::InvalidRangeType { .. })
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = space(json!({
            "hyperparameters": {
                "lr": {"type": "float", "default": 0.1, "range": [1.0, 0.0]}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn int_range_rejects_fractional_bounds() {
        let err = space(json!({
            "hyperparameters": {
                "layers": {"type": "int", "default": 2, "range": [1.5, 4]}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::NonNumericBound { .. })
        ));
    }

    #[test]
    fn iter_wins_over_range() {
        // Declared as an int range, but iter takes precedence.
        let space = space(json!({
            "hyperparameters": {
                "units": {"type": "int", "default": 8, "iter": [8, 128], "range": [1, 4]}
            }
        }))
        .unwrap();

        for number in 0..50 {
            let params = space.decode(&mut trial(number)).unwrap();
            let value = params.get("units").unwrap().as_i64().unwrap();
            assert!([8, 128].contains(&value), "range leaked through: {value}");
        }
    }

    #[test]
    fn empty_iter_counts_as_absent() {
        let space = space(json!({
            "hyperparameters": {
                "units": {"type": "int", "default": 8, "iter": [], "range": [1, 4]}
            }
        }))
        .unwrap();

        assert_eq!(
            space.params()[0].sampling,
            Sampling::IntRange { low: 1, high: 4 }
        );
    }

    #[test]
    fn missing_hyperparameters_section_is_rejected() {
        let err = space(json!({"help": "no section here"})).unwrap_err();
        assert!(matches!(
            err,
            SweepError::Space(SpaceError::MissingSection)
        ));
    }

    #[test]
    fn declaration_order_is_preserved() {
        let space = space(json!({
            "hyperparameters": {
                "zeta": {"type": "float", "default": 0.0, "range": [0.0, 1.0]},
                "alpha": {"type": "int", "default": 1, "range": [1, 5]},
                "mu": {"type": "categorical", "default": "x", "iter": ["x", "y"]}
            }
        }))
        .unwrap();

        let names: Vec<&str> = space.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);

        let params = space.decode(&mut trial(0)).unwrap();
        let decoded_names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(decoded_names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn decoding_the_same_trial_twice_fails() {
        let space = space(json!({
            "hyperparameters": {
                "lr": {"type": "float", "default": 0.1, "range": [0.0, 1.0]}
            }
        }))
        .unwrap();

        let mut trial = trial(0);
        space.decode(&mut trial).unwrap();
        let err = space.decode(&mut trial).unwrap_err();
        assert!(matches!(
            err,
            SweepError::Trial(hs_types::TrialError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn load_reads_document_from_disk() {
        let document = json!({
            "help": "search space for the unit tests",
            "hyperparameters": {
                "lr": {"type": "float", "default": 0.1, "range": [0.001, 0.1]},
                "batch_size": {"type": "int", "default": 32, "iter": [16, 32, 64]}
            }
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space.json");
        std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

        let space = SearchSpace::load(&path).unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.params()[0].name, "lr");
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let err = SearchSpace::load("/nonexistent/space.json").unwrap_err();
        assert!(matches!(err, SweepError::Io(_)));
    }
}
