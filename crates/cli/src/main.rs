// refcheck CLI - bibliographic reference verification against Crossref

mod exit_codes;
mod grobid;
mod tei;
mod verify;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "refcheck")]
#[command(about = "Verify bibliographic references against the Crossref index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a TEI bibliography against Crossref
    #[command(after_help = "\
Examples:
  refcheck verify paper.grobid.tei.xml --config eval.toml --mailto you@lab.edu
  refcheck verify paper.grobid.tei.xml --config eval.toml --output results.json
  refcheck verify paper.grobid.tei.xml --config eval.toml --json
  CROSSREF_MAILTO=you@lab.edu refcheck verify paper.grobid.tei.xml --config eval.toml")]
    Verify {
        /// Path to the Grobid TEI XML bibliography
        bibliography: PathBuf,

        /// Path to the evaluation config (TOML)
        #[arg(long)]
        config: PathBuf,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Contact email for the Crossref polite pool
        #[arg(long, env = "CROSSREF_MAILTO")]
        mailto: Option<String>,
    },

    /// Validate an evaluation config without running
    #[command(after_help = "\
Examples:
  refcheck validate eval.toml")]
    Validate {
        /// Path to the evaluation config (TOML)
        config: PathBuf,
    },

    /// Extract a TEI bibliography from a PDF via a Grobid service
    #[command(after_help = "\
Examples:
  refcheck extract paper.pdf
  refcheck extract paper.pdf -o paper.grobid.tei.xml
  refcheck extract paper.pdf --grobid-url http://grobid.internal:8070")]
    Extract {
        /// Path to the PDF document
        document: PathBuf,

        /// Base URL of the Grobid service
        #[arg(long, env = "GROBID_URL", default_value = "http://localhost:8070")]
        grobid_url: String,

        /// Output path (defaults to the input with a .grobid.tei.xml suffix)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Verify { bibliography, config, output, json, mailto } => {
            verify::cmd_verify(bibliography, config, output, json, mailto)
        }
        Commands::Validate { config } => verify::cmd_validate(config),
        Commands::Extract { document, grobid_url, output } => {
            grobid::cmd_extract(document, grobid_url, output)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
