//! Diagnosis stage — anomaly classification with a deterministic fallback.
//!
//! The primary path delegates to the external [`AnomalyOracle`]. Any
//! oracle failure (timeout, malformed response, unavailable, or no
//! oracle configured at all) is recovered locally by a fixed-priority
//! heuristic, so the stage always produces a verdict and never returns
//! an error to the orchestrator.

use std::sync::Arc;

use tracing::warn;

use automind_core::{AnomalyCandidate, Severity, TelemetrySnapshot};
use automind_oracle::AnomalyOracle;

pub struct DiagnosisStage {
    oracle: Option<Arc<dyn AnomalyOracle>>,
}

impl DiagnosisStage {
    pub fn new(oracle: Option<Arc<dyn AnomalyOracle>>) -> Self {
        Self { oracle }
    }

    /// Fallback-only stage, used when no oracle is configured.
    pub fn fallback_only() -> Self {
        Self { oracle: None }
    }

    /// Classify a snapshot into an anomaly candidate, or `None` when
    /// healthy. Infallible: oracle errors fall through to [`fallback_diagnose`].
    pub async fn diagnose(
        &self,
        vehicle_model: &str,
        snap: &TelemetrySnapshot,
    ) -> Option<AnomalyCandidate> {
        if let Some(oracle) = &self.oracle {
            match oracle.classify(vehicle_model, snap).await {
                Ok(verdict) => return verdict,
                Err(e) => {
                    warn!(model = vehicle_model, error = %e, "oracle failed, falling back to heuristics");
                }
            }
        }
        fallback_diagnose(snap)
    }
}

/// Deterministic heuristic fallback, evaluated in fixed priority order.
/// Only the first matching rule fires.
pub fn fallback_diagnose(snap: &TelemetrySnapshot) -> Option<AnomalyCandidate> {
    if snap.engine_temp > 110.0 {
        return Some(AnomalyCandidate {
            kind: "Engine Overheating".to_string(),
            severity: Severity::Critical,
            confidence: 0.95,
            description: "Engine temperature exceeds safe operating limits.".to_string(),
            recommended_action: "Stop vehicle immediately and check coolant.".to_string(),
        });
    }
    if snap.brake_wear_level > 80.0 {
        return Some(AnomalyCandidate {
            kind: "Brake Pad Wear".to_string(),
            severity: Severity::High,
            confidence: 0.98,
            description: "Brake pads are critically worn.".to_string(),
            recommended_action: "Schedule brake pad replacement.".to_string(),
        });
    }
    if snap.battery_voltage < 12.0 {
        return Some(AnomalyCandidate {
            kind: "Low Battery Voltage".to_string(),
            severity: Severity::Medium,
            confidence: 0.85,
            description: "Battery voltage is below nominal range.".to_string(),
            recommended_action: "Check alternator and battery health.".to_string(),
        });
    }
    None
}
