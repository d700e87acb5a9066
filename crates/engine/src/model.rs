use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::registry::{Attribute, Method};

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// A bibliographic reference: either extracted from a document (the
/// source, treated as ground truth) or returned by the citation index
/// (the candidate). Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: Option<String>,
    #[serde(default)]
    pub author: Vec<Author>,
    pub doi: Option<String>,
    /// Carried for the report, never scored.
    pub url: Option<String>,
    /// Publication year, kept as text.
    pub date: Option<String>,
    /// Journal / container title. Carried for the report, never scored.
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub given: Option<String>,
    pub family: Option<String>,
}

impl Author {
    /// Matching relation used by the author comparator: family names
    /// equal, given names ignored. An author without a family name
    /// matches nothing.
    pub fn matches(&self, other: &Author) -> bool {
        match (&self.family, &other.family) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Result of one comparison: a similarity in [0.0, 1.0], or the marker
/// for "could not be compared" (missing data on one or both sides).
/// `NotApplicable` is excluded from aggregation rather than coerced to a
/// number; it serializes as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    NotApplicable,
}

impl Score {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }

    /// Whether this score counts as a passing vote in the overall
    /// conjunction (numeric and non-zero).
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Value(v) if v > 0.0)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// One comparator invocation: method name, score, configured weight.
#[derive(Debug, Clone, Serialize)]
pub struct MethodScore {
    pub method: Method,
    pub score: Score,
    pub weight: f64,
}

/// One attribute's aggregated score plus the per-method scores behind it.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeVerdict {
    pub score: Score,
    #[serde(rename = "evaluation-method")]
    pub methods: Vec<MethodScore>,
}

/// Full verdict for one (source, candidate) pair. `overall` is `None`
/// when every configured attribute was uncomparable (undefined).
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceVerdict {
    pub overall: Option<bool>,
    #[serde(rename = "reference element")]
    pub elements: BTreeMap<Attribute, AttributeVerdict>,
}

// ---------------------------------------------------------------------------
// Batch output
// ---------------------------------------------------------------------------

/// One batch entry. Outcomes always appear in input order.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceOutcome {
    pub reference: Reference,
    #[serde(rename = "reference-located", serialize_with = "located_or_marker")]
    pub located: Option<Reference>,
    #[serde(serialize_with = "verdict_or_marker")]
    pub evaluation: Option<ReferenceVerdict>,
}

fn located_or_marker<S: Serializer>(v: &Option<Reference>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(reference) => reference.serialize(s),
        None => s.serialize_str("not found"),
    }
}

fn verdict_or_marker<S: Serializer>(v: &Option<ReferenceVerdict>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(verdict) => verdict.serialize(s),
        None => s.serialize_str("none"),
    }
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VerifySummary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub undefined: usize,
    pub not_found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub meta: ReportMeta,
    pub summary: VerifySummary,
    pub references: Vec<ReferenceOutcome>,
}
