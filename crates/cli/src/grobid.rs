//! `refcheck extract` — PDF to TEI bibliography via a Grobid service.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::exit_codes::{EXIT_EXTRACT_UPSTREAM, EXIT_EXTRACT_VALIDATION};
use crate::CliError;

const MAX_RETRIES: u32 = 3;

fn upstream_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_EXTRACT_UPSTREAM, message: msg.into(), hint: None }
}

/// Grobid client (blocking).
pub struct GrobidClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

impl GrobidClient {
    pub fn new(api_base: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("refcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a PDF to `processReferences` and return the TEI XML.
    ///
    /// Retries 429/5xx with doubling backoff. Grobid answers 503 while
    /// every worker thread is busy, so a second attempt usually lands.
    pub fn process_references(&self, pdf: Vec<u8>, file_name: &str) -> Result<String, CliError> {
        let url = format!("{}/api/processReferences", self.api_base);
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let part = reqwest::blocking::multipart::Part::bytes(pdf.clone())
                .file_name(file_name.to_string())
                .mime_str("application/pdf")
                .map_err(|e| upstream_err(format!("cannot build upload: {e}")))?;
            let form = reqwest::blocking::multipart::Form::new().part("input", part);

            match self.http.post(&url).multipart(form).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 204 {
                        return Err(CliError {
                            code: EXIT_EXTRACT_VALIDATION,
                            message: "Grobid found no references in the document".into(),
                            hint: None,
                        });
                    }

                    if status == 400 {
                        let body = resp.text().unwrap_or_default();
                        return Err(CliError {
                            code: EXIT_EXTRACT_VALIDATION,
                            message: format!("Grobid rejected the document (400): {body}"),
                            hint: Some("is the input a PDF?".into()),
                        });
                    }

                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            return Err(upstream_err(format!(
                                "Grobid error (HTTP {status}) after {MAX_RETRIES} attempts"
                            )));
                        }
                        eprintln!(
                            "warning: retry {}/{} in {}s (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            backoff_secs,
                            status,
                        );
                        thread::sleep(Duration::from_secs(backoff_secs));
                        backoff_secs *= 2;
                        continue;
                    }

                    if !(200..300).contains(&status) {
                        let body = resp.text().unwrap_or_default();
                        return Err(upstream_err(format!("Grobid error ({status}): {body}")));
                    }

                    return resp
                        .text()
                        .map_err(|e| upstream_err(format!("failed to read Grobid response: {e}")));
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(upstream_err(format!(
                            "Grobid unreachable after {MAX_RETRIES} attempts: {e}"
                        ))
                        .with_hint("is a Grobid service running? (--grobid-url)"));
                    }
                    eprintln!(
                        "warning: retry {}/{} in {}s ({})",
                        attempt + 1,
                        MAX_RETRIES,
                        backoff_secs,
                        e,
                    );
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

pub fn cmd_extract(
    document: PathBuf,
    grobid_url: String,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let pdf = std::fs::read(&document)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", document.display())))?;

    let file_name = document
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let out_path = output.unwrap_or_else(|| document.with_extension("grobid.tei.xml"));

    let client = GrobidClient::new(&grobid_url);
    let tei = client.process_references(pdf, &file_name)?;

    std::fs::write(&out_path, &tei)
        .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", out_path.display())))?;
    eprintln!("wrote {}", out_path.display());

    Ok(())
}
