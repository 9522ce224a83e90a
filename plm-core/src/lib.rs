//! plm-core: Shared infrastructure for TruePLM command-line tools.
pub mod config;
pub mod error;
pub mod observability;
pub mod plm;

pub use error::PlmError;
