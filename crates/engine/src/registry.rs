//! Attribute and method names, and the comparator dispatch table.
//!
//! Attributes are an enumerated set rather than free-form strings, so a
//! configuration naming a field that does not exist on [`Reference`]
//! fails at deserialization time. The table itself is a compile-time
//! `match`: fixed at build, read-only forever after.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compare;
use crate::error::EvalError;
use crate::model::{Reference, Score};

/// A scored field of a reference. These are the valid configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Title,
    Author,
    Doi,
    Date,
    Volume,
    Pages,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Author => write!(f, "author"),
            Self::Doi => write!(f, "doi"),
            Self::Date => write!(f, "date"),
            Self::Volume => write!(f, "volume"),
            Self::Pages => write!(f, "pages"),
        }
    }
}

/// A comparison algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Boolean,
    Levenshtein,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Levenshtein => write!(f, "levenshtein"),
        }
    }
}

/// A registered comparison strategy: stateless, pure function of the two
/// references.
pub type Comparator = fn(&Reference, &Reference) -> Score;

/// Resolve the comparator registered for (attribute, method).
/// Unregistered pairs are a configuration error, never a silent skip;
/// [`crate::config::EvalConfig::validate`] calls this for every
/// configured pair so bad pairings surface at load time.
pub fn comparator(attribute: Attribute, method: Method) -> Result<Comparator, EvalError> {
    use Attribute::*;
    use Method::*;

    let comparator: Comparator = match (attribute, method) {
        (Title, Boolean) => |s, c| compare::boolean_title(s.title.as_deref(), c.title.as_deref()),
        (Title, Levenshtein) => {
            |s, c| compare::levenshtein_title(s.title.as_deref(), c.title.as_deref())
        }
        (Author, Boolean) => |s, c| compare::boolean_author(&s.author, &c.author),
        (Doi, Boolean) => |s, c| compare::boolean_doi(s.doi.as_deref(), c.doi.as_deref()),
        (Date, Boolean) => |s, c| compare::boolean_date(s.date.as_deref(), c.date.as_deref()),
        (Date, Levenshtein) => {
            |s, c| compare::levenshtein_date(s.date.as_deref(), c.date.as_deref())
        }
        (Volume, Boolean) => {
            |s, c| compare::boolean_volume(s.volume.as_deref(), c.volume.as_deref())
        }
        (Volume, Levenshtein) => {
            |s, c| compare::levenshtein_volume(s.volume.as_deref(), c.volume.as_deref())
        }
        (Pages, Boolean) => |s, c| compare::boolean_pages(s.pages.as_deref(), c.pages.as_deref()),
        (attribute, method) => return Err(EvalError::UnknownComparator { attribute, method }),
    };

    Ok(comparator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_pairs_resolve() {
        let pairs = [
            (Attribute::Title, Method::Boolean),
            (Attribute::Title, Method::Levenshtein),
            (Attribute::Author, Method::Boolean),
            (Attribute::Doi, Method::Boolean),
            (Attribute::Date, Method::Boolean),
            (Attribute::Date, Method::Levenshtein),
            (Attribute::Volume, Method::Boolean),
            (Attribute::Volume, Method::Levenshtein),
            (Attribute::Pages, Method::Boolean),
        ];
        for (attribute, method) in pairs {
            assert!(comparator(attribute, method).is_ok(), "{attribute}/{method} should resolve");
        }
    }

    #[test]
    fn unregistered_pairs_fail_loudly() {
        for (attribute, method) in [
            (Attribute::Author, Method::Levenshtein),
            (Attribute::Doi, Method::Levenshtein),
            (Attribute::Pages, Method::Levenshtein),
        ] {
            let err = comparator(attribute, method).unwrap_err();
            assert!(
                matches!(err, EvalError::UnknownComparator { .. }),
                "{attribute}/{method} should be unregistered"
            );
        }
    }

    #[test]
    fn resolved_comparator_reads_the_right_field() {
        let src = Reference {
            doi: Some("10.1145/1250734.1250746".into()),
            ..Reference::default()
        };
        let cand = Reference {
            doi: Some("10.1145/1250734.1250746".into()),
            ..Reference::default()
        };
        let compare = comparator(Attribute::Doi, Method::Boolean).unwrap();
        assert_eq!(compare(&src, &cand), Score::Value(1.0));
    }
}
