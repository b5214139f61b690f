//! Orchestrator — the predictive-maintenance pipeline composition root.
//!
//! One cycle runs the diagnosis stage, conditionally the digital twin,
//! applies the corroboration policy, emits at most one alert, mutates
//! the vehicle's status/health score, and records a trust event for
//! every stage invocation. The orchestrator owns no state beyond its
//! stage dependencies; all persistence goes through [`EngineStore`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use automind_core::{
    Alert, AlertStatus, AnomalyCandidate, EngineError, Severity, TrustEvent, Vehicle,
    VehicleStatus,
};

use crate::diagnosis::DiagnosisStage;
use crate::store::EngineStore;
use crate::twin;
use crate::ueba::TrustScorer;

/// Health-score decrement applied per confirmed alert.
const HEALTH_PENALTY: u8 = 20;

/// A very high-confidence diagnosis bypasses physics corroboration.
const CONFIDENCE_BYPASS: f64 = 0.9;

pub const DIAGNOSIS_AGENT: &str = "Diagnosis Agent";
pub const TWIN_AGENT: &str = "Digital Twin Agent";

/// Result of one orchestration cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub vehicle: Vehicle,
    pub alert: Option<Alert>,
    pub summary: String,
}

pub struct Orchestrator {
    store: Arc<dyn EngineStore>,
    diagnosis: DiagnosisStage,
    scorer: Arc<TrustScorer>,
    /// Per-vehicle cycle serialization. Grow-only: the fleet is small
    /// and ids are stable for the process lifetime.
    vehicle_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn EngineStore>,
        diagnosis: DiagnosisStage,
        scorer: Arc<TrustScorer>,
    ) -> Self {
        Self {
            store,
            diagnosis,
            scorer,
            vehicle_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run one full predictive-maintenance cycle for a vehicle.
    ///
    /// At most one cycle runs per vehicle at a time; cycles for
    /// different vehicles proceed concurrently.
    pub async fn run_cycle(&self, vehicle_id: &str) -> Result<CycleOutcome, EngineError> {
        let lock = self.vehicle_lock(vehicle_id).await;
        let _guard = lock.lock().await;

        // 1. Ingest. A missing vehicle aborts before any stage runs.
        let (mut vehicle, snapshot) = self.store.get_vehicle(vehicle_id).await?;

        // 2. Diagnosis stage, timed and trust-scored.
        let started = Instant::now();
        let candidate = self.diagnosis.diagnose(&vehicle.model, &snapshot).await;
        self.record_trust(DIAGNOSIS_AGENT, "Analyze Telematics", started)
            .await;

        // 3. Short-circuit: nothing to validate.
        let Some(candidate) = candidate else {
            return Ok(CycleOutcome {
                vehicle,
                alert: None,
                summary: "Routine scan complete. System healthy.".to_string(),
            });
        };

        // 4. Digital twin validation, timed and trust-scored.
        let started = Instant::now();
        let validation = twin::validate(&vehicle.model, &snapshot);
        self.record_trust(TWIN_AGENT, "Physics Simulation", started)
            .await;

        // 5. Corroboration: physics support OR a very confident diagnosis.
        let accepted = validation.anomaly_consistent || candidate.confidence > CONFIDENCE_BYPASS;
        if !accepted {
            info!(
                vehicle = vehicle_id,
                kind = %candidate.kind,
                confidence = candidate.confidence,
                "candidate suppressed by digital twin"
            );
            return Ok(CycleOutcome {
                vehicle,
                alert: None,
                summary: "Prediction suppressed by Digital Twin. Physics model mismatch."
                    .to_string(),
            });
        }

        // 6. Confirmed: emit the alert and escalate the vehicle.
        let alert = build_alert(vehicle_id, &candidate);
        self.persist_with_retry("alert", || self.store.save_alert(&alert))
            .await?;

        vehicle.status = escalate(vehicle.status, candidate.severity);
        vehicle.health_score = vehicle.health_score.saturating_sub(HEALTH_PENALTY);
        self.persist_with_retry("vehicle", || self.store.update_vehicle(&vehicle))
            .await?;

        info!(
            vehicle = vehicle_id,
            kind = %alert.kind,
            severity = ?alert.severity,
            status = ?vehicle.status,
            "alert confirmed"
        );

        let summary = format!(
            "Anomaly Detected: {}. Digital Twin Confidence: {:.0}%. Logs: {}",
            alert.kind,
            validation.confidence * 100.0,
            validation.explanation_log.join(" ")
        );

        Ok(CycleOutcome {
            vehicle,
            alert: Some(alert),
            summary,
        })
    }

    /// Latest trust score per agent, from the persisted trust log.
    pub async fn agent_trust_scores(&self) -> Result<HashMap<String, u8>, EngineError> {
        self.store.agent_trust_scores().await
    }

    /// Full trust log, newest first.
    pub async fn list_trust_events(&self) -> Result<Vec<TrustEvent>, EngineError> {
        self.store.list_trust_events().await
    }

    async fn vehicle_lock(&self, vehicle_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.vehicle_locks.lock().await;
        locks
            .entry(vehicle_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Score a stage invocation and append the trust event. Trust-log
    /// writes are fire-and-forget: a failure is logged, never surfaced.
    async fn record_trust(&self, agent_name: &str, action: &str, started: Instant) {
        let event = self.scorer.observe(agent_name, action, started.elapsed());
        if let Err(e) = self.store.append_trust_event(&event).await {
            warn!(agent = agent_name, error = %e, "trust event write failed");
        }
    }

    /// Alert/vehicle writes drive user-visible state: retry once, then
    /// surface the failure.
    async fn persist_with_retry<F, Fut>(&self, what: &str, write: F) -> Result<(), EngineError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<(), EngineError>>,
    {
        if let Err(first) = write().await {
            warn!(what, error = %first, "persist failed, retrying once");
            write()
                .await
                .map_err(|e| EngineError::Persist(format!("{} write: {}", what, e)))?;
        }
        Ok(())
    }
}

fn build_alert(vehicle_id: &str, candidate: &AnomalyCandidate) -> Alert {
    Alert {
        id: Uuid::new_v4().to_string(),
        vehicle_id: vehicle_id.to_string(),
        kind: candidate.kind.clone(),
        severity: candidate.severity,
        confidence: candidate.confidence,
        description: candidate.description.clone(),
        recommended_action: candidate.recommended_action.clone(),
        status: AlertStatus::New,
        created_at: Utc::now(),
    }
}

/// Severity → status escalation. CRITICAL escalates to CRITICAL, any
/// other accepted severity to WARNING. The engine never downgrades, and
/// IN_SERVICE (externally owned) is left untouched.
fn escalate(current: VehicleStatus, severity: Severity) -> VehicleStatus {
    let target = if severity == Severity::Critical {
        VehicleStatus::Critical
    } else {
        VehicleStatus::Warning
    };
    if target.rank() > current.rank() {
        target
    } else {
        current
    }
}
