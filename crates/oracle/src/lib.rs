//! External diagnosis oracle contract and backends.
//!
//! The engine consumes [`AnomalyOracle`] as a narrow async seam; the
//! Gemini backend is the only real implementation, and tests inject
//! fakes through the same trait.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiOracle;
pub use provider::{AnomalyOracle, OracleError};
