use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::registry::{self, Attribute, Method};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Evaluation configuration: which attributes to score, with which
/// methods, at which weights. Built once at startup and passed by
/// reference into the driver; the engine holds no ambient state.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    pub name: String,
    /// How a not-applicable attribute score affects the overall verdict.
    #[serde(default)]
    pub missing: MissingPolicy,
    pub attributes: BTreeMap<Attribute, AttributeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeConfig {
    /// Method → relative weight. Weights need not sum to 1.
    pub evaluators: BTreeMap<Method, f64>,
}

// ---------------------------------------------------------------------------
// Missing-data policy
// ---------------------------------------------------------------------------

/// Policy for "not applicable" attribute scores in the overall verdict.
///
/// `Neutral` excludes them from the conjunction, so a reference with no
/// DOI on either side can still match overall; a pair where every
/// attribute is uncomparable gets an undefined overall. `Fail` counts
/// every not-applicable score as a failing vote, so a single missing
/// optional field fails the whole reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    Neutral,
    Fail,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        Self::Neutral
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl EvalConfig {
    pub fn from_toml(input: &str) -> Result<Self, EvalError> {
        let config: EvalConfig =
            toml::from_str(input).map_err(|e| EvalError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        if self.attributes.is_empty() {
            return Err(EvalError::ConfigValidation(
                "at least one attribute is required".into(),
            ));
        }

        for (attribute, attr_config) in &self.attributes {
            if attr_config.evaluators.is_empty() {
                return Err(EvalError::ConfigValidation(format!(
                    "attribute '{attribute}': at least one evaluator is required"
                )));
            }
            for (method, weight) in &attr_config.evaluators {
                if !weight.is_finite() || *weight <= 0.0 {
                    return Err(EvalError::ConfigValidation(format!(
                        "attribute '{attribute}', evaluator '{method}': \
                         weight must be a positive number, got {weight}"
                    )));
                }
                // Resolve here so a bad pairing fails at load time, not in
                // the middle of a batch.
                registry::comparator(*attribute, *method)?;
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
