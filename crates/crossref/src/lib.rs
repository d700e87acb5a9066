//! `refcheck-crossref` — Crossref API client.
//!
//! Blocking client for the Crossref REST API plus extraction of
//! candidate references from work records. Implements the engine's
//! [`refcheck_engine::Lookup`] seam so the batch driver can stay
//! ignorant of HTTP.

pub mod client;
pub mod extract;

pub use client::{CrossrefClient, CrossrefError};
pub use extract::extract_reference;
