//! Concrete parameter values produced by decoding a search space.

use serde::{Deserialize, Serialize};

/// A concrete value sampled (or taken verbatim) for one hyperparameter.
///
/// `Int` is listed before `Float` so that untagged deserialization keeps
/// whole numbers integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    /// Categorical atom or any other JSON value taken from the space
    /// document.
    Json(serde_json::Value),
}

impl ParamValue {
    /// Convert a JSON atom from the space document, preferring the
    /// narrowest numeric representation.
    pub fn from_json(value: &serde_json::Value) -> Self {
        if let Some(i) = value.as_i64() {
            Self::Int(i)
        } else if let Some(f) = value.as_f64() {
            Self::Float(f)
        } else {
            Self::Json(value.clone())
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Json(_) => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Json(serde_json::Value::String(s)) => write!(f, "{s}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// The decoded parameter assignment for one trial.
///
/// Entries keep the search space's declaration order so downstream logging
/// sees parameters in the same order they were declared.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DecodedParams {
    entries: Vec<(String, ParamValue)>,
}

impl DecodedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for DecodedParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
