use async_trait::async_trait;

use automind_core::{AnomalyCandidate, TelemetrySnapshot};

/// Trait for the external diagnosis oracle — each backend implements this.
///
/// `Ok(None)` means the oracle looked and found nothing wrong. Any `Err`
/// is treated by the diagnosis stage exactly like unavailability and
/// recovered via the deterministic fallback heuristics.
#[async_trait]
pub trait AnomalyOracle: Send + Sync {
    /// Classify a telemetry snapshot into an anomaly candidate, or `None`
    /// when the vehicle looks healthy.
    async fn classify(
        &self,
        vehicle_model: &str,
        snapshot: &TelemetrySnapshot,
    ) -> Result<Option<AnomalyCandidate>, OracleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} — {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("oracle not configured: {0}")]
    NotConfigured(String),
}
