use std::fmt;

use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::evaluate::evaluate_reference;
use crate::model::{Reference, ReferenceOutcome, ReportMeta, VerifyReport, VerifySummary};

// ---------------------------------------------------------------------------
// Lookup collaborator
// ---------------------------------------------------------------------------

/// External citation-index lookup. Implementations decide how to search
/// (DOI-exact, title+author, …) and own their own timeouts; a timeout
/// surfaces as an error here, which the driver records as not-found.
pub trait Lookup {
    /// Best candidate record for `reference`, or `None` when the index
    /// has no match.
    fn search(&self, reference: &Reference) -> Result<Option<Reference>, LookupError>;
}

/// Failure from the lookup collaborator. The batch driver absorbs these
/// into not-found outcomes so one bad reference cannot abort a batch.
#[derive(Debug)]
pub struct LookupError(pub String);

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup failed: {}", self.0)
    }
}

impl std::error::Error for LookupError {}

// ---------------------------------------------------------------------------
// Batch driver
// ---------------------------------------------------------------------------

/// Verify a batch of references against `index`, one at a time, strictly
/// in input order. Only a configuration error aborts; a failed or empty
/// lookup degrades to a not-found outcome for that one reference.
pub fn run(
    config: &EvalConfig,
    references: Vec<Reference>,
    index: &dyn Lookup,
) -> Result<VerifyReport, EvalError> {
    let mut outcomes = Vec::with_capacity(references.len());

    for reference in references {
        let located = index.search(&reference).unwrap_or(None);
        let evaluation = match &located {
            Some(candidate) => Some(evaluate_reference(config, &reference, candidate)?),
            None => None,
        };
        outcomes.push(ReferenceOutcome {
            reference,
            located,
            evaluation,
        });
    }

    let summary = compute_summary(&outcomes);

    Ok(VerifyReport {
        meta: ReportMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        references: outcomes,
    })
}

/// Count outcomes by verdict.
pub fn compute_summary(outcomes: &[ReferenceOutcome]) -> VerifySummary {
    let mut summary = VerifySummary {
        total: outcomes.len(),
        matched: 0,
        mismatched: 0,
        undefined: 0,
        not_found: 0,
    };

    for outcome in outcomes {
        match &outcome.evaluation {
            None => summary.not_found += 1,
            Some(verdict) => match verdict.overall {
                Some(true) => summary.matched += 1,
                Some(false) => summary.mismatched += 1,
                None => summary.undefined += 1,
            },
        }
    }

    summary
}
