//! Candidate `Reference` extraction from Crossref work records.

use refcheck_engine::{Author, Reference};

/// Publication year as text, from `published.date-parts` with a fallback
/// to `issued` (always present on Crossref works, unlike `published`).
fn extract_year(work: &serde_json::Value) -> Option<String> {
    ["published", "issued"]
        .into_iter()
        .find_map(|field| work[field]["date-parts"][0][0].as_i64())
        .map(|year| year.to_string())
}

/// Author list. Entries missing a name part are kept as-is; an author
/// without a family name simply never matches.
fn extract_authors(work: &serde_json::Value) -> Vec<Author> {
    work["author"]
        .as_array()
        .map(|authors| {
            authors
                .iter()
                .map(|a| Author {
                    given: a["given"].as_str().map(String::from),
                    family: a["family"].as_str().map(String::from),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Crossref serves title and container-title as arrays; only the first
/// entry is meaningful here.
fn first_string(value: &serde_json::Value) -> Option<String> {
    value[0].as_str().map(String::from)
}

/// Build a candidate `Reference` from a Crossref work record.
pub fn extract_reference(work: &serde_json::Value) -> Reference {
    Reference {
        title: first_string(&work["title"]),
        author: extract_authors(work),
        doi: work["DOI"].as_str().map(String::from),
        url: work["URL"].as_str().map(String::from),
        date: extract_year(work),
        journal: first_string(&work["container-title"]),
        volume: work["volume"].as_str().map(String::from),
        pages: work["page"].as_str().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_full_work() {
        let work = json!({
            "title": ["Trace-based just-in-time type specialization for dynamic languages"],
            "author": [
                {"given": "Andreas", "family": "Gal"},
                {"given": "Brendan", "family": "Eich"}
            ],
            "DOI": "10.1145/1542476.1542528",
            "URL": "https://doi.org/10.1145/1542476.1542528",
            "published": {"date-parts": [[2009, 6, 15]]},
            "container-title": ["ACM SIGPLAN Notices"],
            "volume": "44",
            "page": "465-478"
        });

        let reference = extract_reference(&work);
        assert_eq!(
            reference.title.as_deref(),
            Some("Trace-based just-in-time type specialization for dynamic languages")
        );
        assert_eq!(reference.author.len(), 2);
        assert_eq!(reference.author[0].family.as_deref(), Some("Gal"));
        assert_eq!(reference.doi.as_deref(), Some("10.1145/1542476.1542528"));
        assert_eq!(reference.date.as_deref(), Some("2009"));
        assert_eq!(reference.journal.as_deref(), Some("ACM SIGPLAN Notices"));
        assert_eq!(reference.volume.as_deref(), Some("44"));
        assert_eq!(reference.pages.as_deref(), Some("465-478"));
    }

    #[test]
    fn empty_work_extracts_to_empty_reference() {
        let reference = extract_reference(&json!({}));
        assert_eq!(reference, Reference::default());
    }

    #[test]
    fn year_falls_back_to_issued() {
        let work = json!({
            "issued": {"date-parts": [[1995]]}
        });
        assert_eq!(extract_reference(&work).date.as_deref(), Some("1995"));
    }

    #[test]
    fn malformed_date_parts_is_none() {
        let work = json!({
            "published": {"date-parts": [[]]}
        });
        assert_eq!(extract_reference(&work).date, None);
    }

    #[test]
    fn author_without_family_is_kept() {
        let work = json!({
            "author": [{"given": "Group Name"}]
        });
        let reference = extract_reference(&work);
        assert_eq!(reference.author.len(), 1);
        assert_eq!(reference.author[0].given.as_deref(), Some("Group Name"));
        assert_eq!(reference.author[0].family, None);
    }
}
