//! `refcheck verify` / `refcheck validate` — run reference verification.

use std::path::PathBuf;

use refcheck_crossref::CrossrefClient;
use refcheck_engine::{EvalConfig, Lookup, LookupError, Reference, VerifyReport};

use crate::exit_codes::{EXIT_VERIFY_INVALID_CONFIG, EXIT_VERIFY_MISMATCH, EXIT_VERIFY_NOT_FOUND};
use crate::tei;
use crate::CliError;

fn verify_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Lookup wrapper that reports failures on stderr before the driver
/// absorbs them into not-found outcomes.
struct WarnOnError<L>(L);

impl<L: Lookup> Lookup for WarnOnError<L> {
    fn search(&self, reference: &Reference) -> Result<Option<Reference>, LookupError> {
        match self.0.search(reference) {
            Err(e) => {
                let label = reference
                    .doi
                    .as_deref()
                    .or(reference.title.as_deref())
                    .unwrap_or("<untitled reference>");
                eprintln!("warning: {label}: {e}");
                Err(e)
            }
            found => found,
        }
    }
}

pub fn cmd_verify(
    bibliography: PathBuf,
    config_path: PathBuf,
    output: Option<PathBuf>,
    json_output: bool,
    mailto: Option<String>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", config_path.display())))?;
    let config = EvalConfig::from_toml(&config_str)
        .map_err(|e| verify_err(EXIT_VERIFY_INVALID_CONFIG, e.to_string()))?;

    let xml = std::fs::read_to_string(&bibliography)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", bibliography.display())))?;
    let references = tei::parse_bibliography(&xml).map_err(|e| CliError::runtime(e.to_string()))?;

    if references.is_empty() {
        return Err(CliError::runtime(format!(
            "no references found in {}",
            bibliography.display()
        ))
        .with_hint("is this a Grobid processReferences TEI file?"));
    }

    let mailto = resolve_mailto(mailto)?;
    let index = WarnOnError(CrossrefClient::new(&mailto));

    let report = refcheck_engine::run(&config, references, &index)
        .map_err(|e| CliError::runtime(e.to_string()))?;

    write_report(&report, &output, json_output)?;

    let s = &report.summary;
    eprintln!(
        "verified {} reference(s) — {} matched, {} mismatched, {} undefined, {} not found",
        s.total, s.matched, s.mismatched, s.undefined, s.not_found,
    );

    if s.mismatched > 0 {
        return Err(verify_err(EXIT_VERIFY_MISMATCH, "reference mismatches found"));
    }
    if s.not_found > 0 {
        return Err(verify_err(EXIT_VERIFY_NOT_FOUND, "references missing from the index"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", config_path.display())))?;

    match EvalConfig::from_toml(&config_str) {
        Ok(config) => {
            let evaluator_count: usize =
                config.attributes.values().map(|a| a.evaluators.len()).sum();
            eprintln!(
                "valid: '{}' with {} attribute(s), {} evaluator(s)",
                config.name,
                config.attributes.len(),
                evaluator_count,
            );
            Ok(())
        }
        Err(e) => Err(verify_err(EXIT_VERIFY_INVALID_CONFIG, e.to_string())),
    }
}

/// Resolve the polite-pool email: flag value > CROSSREF_MAILTO (folded
/// into the flag by clap) > error.
fn resolve_mailto(flag: Option<String>) -> Result<String, CliError> {
    if let Some(mailto) = flag {
        let trimmed = mailto.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }
    Err(CliError::usage("missing Crossref contact email")
        .with_hint("use --mailto or set CROSSREF_MAILTO"))
}

fn write_report(
    report: &VerifyReport,
    output: &Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(report)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    Ok(())
}
