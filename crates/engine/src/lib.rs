//! `refcheck-engine` — Reference evaluation engine.
//!
//! Pure engine crate: receives pre-extracted references and a lookup
//! collaborator, returns scored verdicts. No CLI or IO dependencies.

pub mod compare;
pub mod config;
pub mod distance;
pub mod driver;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod normalize;
pub mod registry;

pub use config::{EvalConfig, MissingPolicy};
pub use driver::{run, Lookup, LookupError};
pub use error::EvalError;
pub use model::{Author, Reference, Score, VerifyReport};
pub use registry::{Attribute, Method};
