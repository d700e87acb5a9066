//! Comparator library: one free function per (attribute, algorithm)
//! pair, registered in [`crate::registry`].
//!
//! Boolean comparators score 1.0/0.0 on equality; levenshtein
//! comparators score a normalized edit-distance similarity. Missing
//! data splits two ways: a reference without a title or authors is a
//! definite mismatch (0.0), while a missing doi/date/volume/pages on
//! either side means the comparison cannot be made at all
//! (`Score::NotApplicable`).

use crate::distance::normalized_similarity;
use crate::model::{Author, Score};
use crate::normalize::normalize;

fn bool_score(equal: bool) -> Score {
    Score::Value(if equal { 1.0 } else { 0.0 })
}

/// Equality after trim, N/A when either side is absent. Shared by the
/// date, volume, and pages boolean comparators.
fn trimmed_eq(src: Option<&str>, cand: Option<&str>) -> Score {
    match (src, cand) {
        (Some(s), Some(c)) => bool_score(s.trim() == c.trim()),
        _ => Score::NotApplicable,
    }
}

/// Similarity after trim, N/A when either side is absent. Shared by the
/// date and volume levenshtein comparators.
fn trimmed_similarity(src: Option<&str>, cand: Option<&str>) -> Score {
    match (src, cand) {
        (Some(s), Some(c)) => Score::Value(normalized_similarity(s.trim(), c.trim())),
        _ => Score::NotApplicable,
    }
}

pub fn boolean_title(src: Option<&str>, cand: Option<&str>) -> Score {
    match (src, cand) {
        (Some(s), Some(c)) => bool_score(normalize(s) == normalize(c)),
        _ => Score::Value(0.0),
    }
}

/// Every source author must have a family-name match somewhere in the
/// candidate list (order-independent containment, not list equality).
/// An empty source list scores 0.0 (no data cannot vacuously pass).
pub fn boolean_author(src: &[Author], cand: &[Author]) -> Score {
    if src.is_empty() {
        return Score::Value(0.0);
    }
    bool_score(src.iter().all(|a| cand.iter().any(|c| a.matches(c))))
}

pub fn boolean_doi(src: Option<&str>, cand: Option<&str>) -> Score {
    match (src, cand) {
        (Some(s), Some(c)) => bool_score(s.trim().eq_ignore_ascii_case(c.trim())),
        _ => Score::NotApplicable,
    }
}

pub fn boolean_date(src: Option<&str>, cand: Option<&str>) -> Score {
    trimmed_eq(src, cand)
}

pub fn boolean_volume(src: Option<&str>, cand: Option<&str>) -> Score {
    trimmed_eq(src, cand)
}

pub fn boolean_pages(src: Option<&str>, cand: Option<&str>) -> Score {
    trimmed_eq(src, cand)
}

pub fn levenshtein_title(src: Option<&str>, cand: Option<&str>) -> Score {
    match (src, cand) {
        (Some(s), Some(c)) => Score::Value(normalized_similarity(&normalize(s), &normalize(c))),
        _ => Score::Value(0.0),
    }
}

pub fn levenshtein_date(src: Option<&str>, cand: Option<&str>) -> Score {
    trimmed_similarity(src, cand)
}

pub fn levenshtein_volume(src: Option<&str>, cand: Option<&str>) -> Score {
    trimmed_similarity(src, cand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(given: Option<&str>, family: Option<&str>) -> Author {
        Author {
            given: given.map(String::from),
            family: family.map(String::from),
        }
    }

    #[test]
    fn title_equal_after_normalization() {
        assert_eq!(
            boolean_title(Some("Self-Adaptive Systems"), Some("Self Adaptive systems ")),
            Score::Value(1.0)
        );
    }

    #[test]
    fn title_mismatch() {
        assert_eq!(
            boolean_title(Some("Abstracting Abstract Machines"), Some("Equality Saturation")),
            Score::Value(0.0)
        );
    }

    #[test]
    fn title_absence_is_mismatch_not_na() {
        assert_eq!(boolean_title(None, Some("anything")), Score::Value(0.0));
        assert_eq!(boolean_title(Some("anything"), None), Score::Value(0.0));
        assert_eq!(levenshtein_title(None, Some("anything")), Score::Value(0.0));
    }

    #[test]
    fn author_matches_by_family_only() {
        let src = vec![author(Some("Jane"), Some("Smith"))];
        let cand = vec![author(Some("John"), Some("Smith"))];
        assert_eq!(boolean_author(&src, &cand), Score::Value(1.0));
    }

    #[test]
    fn author_order_independent_containment() {
        let src = vec![
            author(Some("Matthew"), Some("Might")),
            author(Some("Olin"), Some("Shivers")),
        ];
        let cand = vec![
            author(Some("O."), Some("Shivers")),
            author(Some("M."), Some("Might")),
            author(None, Some("Extra")),
        ];
        assert_eq!(boolean_author(&src, &cand), Score::Value(1.0));
    }

    #[test]
    fn author_missing_from_candidate_fails() {
        let src = vec![
            author(None, Some("Might")),
            author(None, Some("Shivers")),
        ];
        let cand = vec![author(None, Some("Might"))];
        assert_eq!(boolean_author(&src, &cand), Score::Value(0.0));
    }

    #[test]
    fn author_empty_source_cannot_pass() {
        let cand = vec![author(None, Some("Smith"))];
        assert_eq!(boolean_author(&[], &cand), Score::Value(0.0));
    }

    #[test]
    fn author_without_family_matches_nothing() {
        let src = vec![author(Some("Jane"), None)];
        let cand = vec![author(Some("Jane"), None)];
        assert_eq!(boolean_author(&src, &cand), Score::Value(0.0));
    }

    #[test]
    fn doi_case_insensitive() {
        assert_eq!(
            boolean_doi(Some("10.1145/1250734.1250746"), Some("10.1145/1250734.1250746")),
            Score::Value(1.0)
        );
        assert_eq!(
            boolean_doi(Some("10.5555/ABC"), Some("10.5555/abc")),
            Score::Value(1.0)
        );
    }

    #[test]
    fn optional_attributes_absent_are_not_applicable() {
        assert_eq!(boolean_doi(None, Some("10.1/x")), Score::NotApplicable);
        assert_eq!(boolean_doi(Some("10.1/x"), None), Score::NotApplicable);
        assert_eq!(boolean_date(None, Some("2009")), Score::NotApplicable);
        assert_eq!(boolean_volume(Some("58"), None), Score::NotApplicable);
        assert_eq!(boolean_pages(None, None), Score::NotApplicable);
        assert_eq!(levenshtein_date(None, Some("2009")), Score::NotApplicable);
        assert_eq!(levenshtein_volume(None, None), Score::NotApplicable);
    }

    #[test]
    fn date_and_pages_trim_before_equality() {
        assert_eq!(boolean_date(Some(" 2009"), Some("2009 ")), Score::Value(1.0));
        assert_eq!(boolean_pages(Some("465-478"), Some("465-478")), Score::Value(1.0));
        assert_eq!(boolean_pages(Some("465-478"), Some("465")), Score::Value(0.0));
    }

    #[test]
    fn levenshtein_partial_similarity() {
        let score = levenshtein_title(Some("Abstracting Abstract Machines"), Some("Abstracting Machines"));
        match score {
            Score::Value(v) => assert!(v > 0.0 && v < 1.0, "expected partial score, got {v}"),
            Score::NotApplicable => panic!("expected a numeric score"),
        }
    }

    #[test]
    fn levenshtein_identical_after_normalization() {
        assert_eq!(
            levenshtein_title(Some("Trace-Monkey"), Some("trace monkey")),
            Score::Value(1.0)
        );
    }
}
