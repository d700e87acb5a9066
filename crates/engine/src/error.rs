use std::fmt;

use crate::registry::{Attribute, Method};

/// Fatal engine errors. A bad configuration invalidates every evaluation
/// that would follow, so these abort the run. Lookup failures are not
/// here; the batch driver absorbs those per-reference (see
/// [`crate::driver::LookupError`]).
#[derive(Debug)]
pub enum EvalError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty evaluator set, bad weight, etc.).
    ConfigValidation(String),
    /// A configured (attribute, method) pair has no registered comparator.
    UnknownComparator { attribute: Attribute, method: Method },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownComparator { attribute, method } => {
                write!(f, "no '{method}' comparator registered for attribute '{attribute}'")
            }
        }
    }
}

impl std::error::Error for EvalError {}
