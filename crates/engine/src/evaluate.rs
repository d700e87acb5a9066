use std::collections::BTreeMap;

use crate::config::{AttributeConfig, EvalConfig, MissingPolicy};
use crate::error::EvalError;
use crate::model::{AttributeVerdict, MethodScore, Reference, ReferenceVerdict, Score};
use crate::registry::{self, Attribute};

/// Evaluate one attribute of a (source, candidate) pair with every
/// configured method, then combine into a single attribute score.
pub fn evaluate_attribute(
    attribute: Attribute,
    attr_config: &AttributeConfig,
    source: &Reference,
    candidate: &Reference,
) -> Result<AttributeVerdict, EvalError> {
    let mut methods = Vec::with_capacity(attr_config.evaluators.len());
    for (&method, &weight) in &attr_config.evaluators {
        let compare = registry::comparator(attribute, method)?;
        methods.push(MethodScore {
            method,
            score: compare(source, candidate),
            weight,
        });
    }

    // A single method's score stands verbatim; weighting only applies
    // when there is something to combine.
    let score = if methods.len() == 1 {
        methods[0].score
    } else {
        aggregate(&methods)
    };

    Ok(AttributeVerdict { score, methods })
}

/// Weighted mean over the numeric scores only. NotApplicable entries
/// contribute no weight; with no numeric scores at all the attribute is
/// itself NotApplicable (never a divide-by-zero).
fn aggregate(methods: &[MethodScore]) -> Score {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for method in methods {
        if let Score::Value(v) = method.score {
            weighted_sum += v * method.weight;
            total_weight += method.weight;
        }
    }
    if total_weight > 0.0 {
        Score::Value(weighted_sum / total_weight)
    } else {
        Score::NotApplicable
    }
}

/// Evaluate every configured attribute of the pair and combine into the
/// overall verdict. No attribute-specific branching lives here; dispatch
/// is entirely registry-driven.
pub fn evaluate_reference(
    config: &EvalConfig,
    source: &Reference,
    candidate: &Reference,
) -> Result<ReferenceVerdict, EvalError> {
    let mut elements = BTreeMap::new();
    for (attribute, attr_config) in &config.attributes {
        let verdict = evaluate_attribute(*attribute, attr_config, source, candidate)?;
        elements.insert(*attribute, verdict);
    }
    let overall = overall_verdict(&elements, config.missing);
    Ok(ReferenceVerdict { overall, elements })
}

/// Conjunction over attribute scores. Under `Neutral`, not-applicable
/// scores abstain and an all-abstained pair is undefined (`None`); under
/// `Fail`, any not-applicable score is a failing vote.
fn overall_verdict(
    elements: &BTreeMap<Attribute, AttributeVerdict>,
    missing: MissingPolicy,
) -> Option<bool> {
    match missing {
        MissingPolicy::Fail => Some(elements.values().all(|v| v.score.is_pass())),
        MissingPolicy::Neutral => {
            let mut comparable = 0;
            for verdict in elements.values() {
                match verdict.score {
                    Score::NotApplicable => continue,
                    score => {
                        comparable += 1;
                        if !score.is_pass() {
                            return Some(false);
                        }
                    }
                }
            }
            if comparable == 0 {
                None
            } else {
                Some(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Method;

    fn attr_config(evaluators: &[(Method, f64)]) -> AttributeConfig {
        AttributeConfig {
            evaluators: evaluators.iter().copied().collect(),
        }
    }

    fn titled(title: &str) -> Reference {
        Reference {
            title: Some(title.into()),
            ..Reference::default()
        }
    }

    fn config(toml: &str) -> EvalConfig {
        EvalConfig::from_toml(toml).unwrap()
    }

    #[test]
    fn weighted_mean_three_to_one() {
        // boolean mismatch (0.0, weight 1) + levenshtein match (1.0, weight 3) = 0.75
        let methods = vec![
            MethodScore { method: Method::Levenshtein, score: Score::Value(1.0), weight: 3.0 },
            MethodScore { method: Method::Boolean, score: Score::Value(0.0), weight: 1.0 },
        ];
        assert_eq!(aggregate(&methods), Score::Value(0.75));
    }

    #[test]
    fn aggregate_excludes_not_applicable() {
        let methods = vec![
            MethodScore { method: Method::Boolean, score: Score::NotApplicable, weight: 5.0 },
            MethodScore { method: Method::Levenshtein, score: Score::Value(0.8), weight: 1.0 },
        ];
        assert_eq!(aggregate(&methods), Score::Value(0.8));
    }

    #[test]
    fn aggregate_underflow_is_not_applicable() {
        let methods = vec![
            MethodScore { method: Method::Boolean, score: Score::NotApplicable, weight: 1.0 },
            MethodScore { method: Method::Levenshtein, score: Score::NotApplicable, weight: 1.0 },
        ];
        assert_eq!(aggregate(&methods), Score::NotApplicable);
    }

    #[test]
    fn single_method_bypasses_weighting() {
        // With one method the raw score must come through even when its
        // weight would distort a weighted path.
        let cfg = attr_config(&[(Method::Levenshtein, 0.01)]);
        let verdict = evaluate_attribute(
            Attribute::Title,
            &cfg,
            &titled("Abstracting Abstract Machines"),
            &titled("Abstracting Machines"),
        )
        .unwrap();

        let raw = verdict.methods[0].score;
        assert_eq!(verdict.score, raw);
        match raw {
            Score::Value(v) => assert!(v > 0.01, "raw score must not be weight-scaled"),
            Score::NotApplicable => panic!("expected a numeric score"),
        }
    }

    #[test]
    fn single_method_na_passes_through() {
        let cfg = attr_config(&[(Method::Boolean, 1.0)]);
        let verdict = evaluate_attribute(
            Attribute::Doi,
            &cfg,
            &Reference::default(),
            &Reference::default(),
        )
        .unwrap();
        assert_eq!(verdict.score, Score::NotApplicable);
    }

    const TITLE_DOI_CONFIG: &str = r#"
name = "test"

[attributes.title.evaluators]
boolean = 1.0
levenshtein = 3.0

[attributes.doi.evaluators]
boolean = 1.0
"#;

    #[test]
    fn missing_doi_excluded_under_neutral() {
        // Source has no DOI: doi scores N/A, title matches → overall true.
        let cfg = config(TITLE_DOI_CONFIG);
        let source = titled("Self-Adaptive Systems");
        let candidate = Reference {
            doi: Some("10.1000/demo".into()),
            ..titled("Self Adaptive systems ")
        };

        let verdict = evaluate_reference(&cfg, &source, &candidate).unwrap();
        assert_eq!(verdict.elements[&Attribute::Doi].score, Score::NotApplicable);
        assert_eq!(verdict.elements[&Attribute::Title].score, Score::Value(1.0));
        assert_eq!(verdict.overall, Some(true));
    }

    #[test]
    fn missing_doi_fails_under_fail_policy() {
        let cfg = config(&format!("missing = \"fail\"\n{TITLE_DOI_CONFIG}"));
        let source = titled("Self-Adaptive Systems");
        let candidate = Reference {
            doi: Some("10.1000/demo".into()),
            ..titled("Self Adaptive systems")
        };

        let verdict = evaluate_reference(&cfg, &source, &candidate).unwrap();
        assert_eq!(verdict.overall, Some(false));
    }

    #[test]
    fn all_not_applicable_is_undefined() {
        let cfg = config(
            r#"
name = "doi-only"

[attributes.doi.evaluators]
boolean = 1.0
"#,
        );
        let verdict =
            evaluate_reference(&cfg, &Reference::default(), &Reference::default()).unwrap();
        assert_eq!(verdict.overall, None);
    }

    #[test]
    fn zero_score_fails_under_both_policies() {
        let boolean_only = r#"
name = "strict"

[attributes.title.evaluators]
boolean = 1.0

[attributes.doi.evaluators]
boolean = 1.0
"#;
        for header in ["", "missing = \"fail\"\n"] {
            let cfg = config(&format!("{header}{boolean_only}"));
            let source = Reference {
                doi: Some("10.1/a".into()),
                ..titled("Equality Saturation")
            };
            let candidate = Reference {
                doi: Some("10.1/a".into()),
                ..titled("Abstracting Abstract Machines")
            };
            let verdict = evaluate_reference(&cfg, &source, &candidate).unwrap();
            assert_eq!(verdict.overall, Some(false));
        }
    }
}
