//! Crossref REST API client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the two
//! lookups the verifier needs: DOI-exact retrieval and title+author
//! search, with DOI taking priority when a reference carries one.

use std::time::Duration;

use refcheck_engine::{Lookup, LookupError, Reference};

use crate::extract::extract_reference;

const CROSSREF_API_BASE: &str = "https://api.crossref.org";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Crossref API client (blocking).
pub struct CrossrefClient {
    http: reqwest::blocking::Client,
    api_base: String,
    mailto: String,
}

/// Error type for Crossref operations.
#[derive(Debug)]
pub enum CrossrefError {
    /// Network error or timeout
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
}

impl std::fmt::Display for CrossrefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossrefError::Network(msg) => write!(f, "network error: {}", msg),
            CrossrefError::Http(code, msg) => write!(f, "Crossref HTTP {}: {}", code, msg),
            CrossrefError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CrossrefError {}

impl CrossrefClient {
    /// Create a client against the public API. `mailto` joins Crossref's
    /// polite pool and is sent with every request.
    pub fn new(mailto: &str) -> Self {
        Self::with_api_base(mailto, CROSSREF_API_BASE)
    }

    /// Create a client against a specific base URL (tests point this at
    /// a mock server).
    pub fn with_api_base(mailto: &str, api_base: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("refcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            mailto: mailto.to_string(),
        }
    }

    /// Exact lookup by DOI. A 404 means the DOI is unknown to the index,
    /// not an error.
    pub fn work_by_doi(&self, doi: &str) -> Result<Option<serde_json::Value>, CrossrefError> {
        let url = format!("{}/works/{}", self.api_base, doi.trim());
        let resp = self
            .http
            .get(&url)
            .query(&[("mailto", self.mailto.as_str())])
            .send()
            .map_err(|e| CrossrefError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(CrossrefError::Http(status, body));
        }

        let json: serde_json::Value =
            resp.json().map_err(|e| CrossrefError::Parse(e.to_string()))?;
        match json.get("message") {
            Some(message) if message.is_object() => Ok(Some(message.clone())),
            _ => Err(CrossrefError::Parse("missing 'message' in Crossref response".into())),
        }
    }

    /// Fuzzy search by title and author family names. Returns the
    /// best-ranked work, or `None` when the index has nothing.
    pub fn search_title(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<serde_json::Value>, CrossrefError> {
        let mut params = vec![
            ("query.title".to_string(), title.to_string()),
            ("rows".to_string(), "1".to_string()),
            ("mailto".to_string(), self.mailto.clone()),
        ];
        let author_query = authors.join(" ");
        if !author_query.is_empty() {
            params.push(("query.author".to_string(), author_query));
        }

        let url = format!("{}/works", self.api_base);
        let resp = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| CrossrefError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(CrossrefError::Http(status, body));
        }

        let json: serde_json::Value =
            resp.json().map_err(|e| CrossrefError::Parse(e.to_string()))?;
        match json["message"]["items"].as_array() {
            Some(items) if !items.is_empty() => Ok(Some(items[0].clone())),
            _ => Ok(None),
        }
    }

    /// Multi-stage lookup: DOI-exact when the reference carries a DOI,
    /// otherwise title+author search. A reference with neither has
    /// nothing to query on.
    pub fn best_work(&self, reference: &Reference) -> Result<Option<serde_json::Value>, CrossrefError> {
        if let Some(ref doi) = reference.doi {
            return self.work_by_doi(doi);
        }
        match reference.title {
            Some(ref title) => {
                let families: Vec<String> =
                    reference.author.iter().filter_map(|a| a.family.clone()).collect();
                self.search_title(title, &families)
            }
            None => Ok(None),
        }
    }
}

impl Lookup for CrossrefClient {
    fn search(&self, reference: &Reference) -> Result<Option<Reference>, LookupError> {
        let work = self
            .best_work(reference)
            .map_err(|e| LookupError(e.to_string()))?;
        Ok(work.as_ref().map(extract_reference))
    }
}
