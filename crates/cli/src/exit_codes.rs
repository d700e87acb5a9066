//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | Runtime error (IO, bad input data)       |
//! | 2       | Universal | CLI usage error (bad args, missing opts) |
//! | 3-9     | verify    | Verification outcomes and failures       |
//! | 50-59   | extract   | Grobid document-processing codes         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Runtime error - unreadable input, malformed TEI, write failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// At least one reference failed verification (overall mismatch).
pub const EXIT_VERIFY_MISMATCH: u8 = 3;

/// No mismatches, but at least one reference had no candidate in the
/// index. Like `diff(1)`, "something to look at" is a non-zero exit.
pub const EXIT_VERIFY_NOT_FOUND: u8 = 4;

/// Evaluation config failed to parse or validate.
pub const EXIT_VERIFY_INVALID_CONFIG: u8 = 5;

/// Grobid rejected the document (not a PDF, or no references found).
pub const EXIT_EXTRACT_VALIDATION: u8 = 50;

/// Grobid unreachable or still failing after retries.
pub const EXIT_EXTRACT_UPSTREAM: u8 = 51;
