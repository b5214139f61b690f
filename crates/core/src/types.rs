use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Telemetry ───────────────────────────────────────────────────────

/// One immutable reading of a vehicle's sensors at an instant.
///
/// Created by ingestion, consumed read-only by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// km/h
    pub speed: f64,
    pub rpm: f64,
    /// °C
    pub engine_temp: f64,
    /// Volts — ~12-14V for ICE platforms, HV rail for EVs.
    pub battery_voltage: f64,
    /// 0-100%
    pub brake_wear_level: f64,
    pub captured_at: DateTime<Utc>,
}

// ── Anomaly judgements ──────────────────────────────────────────────

/// Alert / candidate severity, ordered LOW < MEDIUM < HIGH < CRITICAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// An unconfirmed anomaly judgement pending corroboration.
///
/// Produced by the diagnosis stage; `None` upstream means "no anomaly".
/// Never persisted directly — it is the precursor to an [`Alert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyCandidate {
    /// Free-form fault category, e.g. "Engine Overheating".
    pub kind: String,
    pub severity: Severity,
    /// In [0,1].
    pub confidence: f64,
    pub description: String,
    pub recommended_action: String,
}

/// Outcome of the digital-twin physics consistency check.
///
/// Always produced, even when nothing is wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff any physics rule triggered.
    pub anomaly_consistent: bool,
    /// Max confidence among triggered rules, in [0,1]. Zero when nominal.
    pub confidence: f64,
    /// One human-readable line per triggered rule (or a single nominal line).
    pub explanation_log: Vec<String>,
}

// ── Alerts ──────────────────────────────────────────────────────────

/// Lifecycle of a maintenance alert. The engine only ever creates
/// alerts as `New`; downstream scheduling/repair workflows move them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    New,
    Scheduled,
    Resolved,
}

/// A confirmed maintenance alert. Immutable once created except for
/// `status`. Alerts accumulate across cycles — there is no dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub vehicle_id: String,
    pub kind: String,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
    pub recommended_action: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

// ── Vehicles ────────────────────────────────────────────────────────

/// Vehicle health state. The engine only escalates HEALTHY → WARNING →
/// CRITICAL; IN_SERVICE is entered and exited by external workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Healthy,
    Warning,
    Critical,
    InService,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub vin: String,
    pub model: String,
    pub year: u16,
    pub owner_id: String,
    pub status: VehicleStatus,
    /// 0-100; decremented by confirmed alerts, reset only by repair completion.
    pub health_score: u8,
}

// ── Trust scoring ───────────────────────────────────────────────────

/// Learned behavioral profile for one pipeline stage ("agent").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub agent_name: String,
    pub baseline_latency_ms: u64,
    /// Total invocations seen; never reset within the process lifetime.
    pub interaction_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustStatus {
    Normal,
    Anomaly,
}

/// One append-only trust-log entry — exactly one per stage invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustEvent {
    pub id: String,
    pub agent_name: String,
    pub action: String,
    /// 0-100.
    pub trust_score: u8,
    pub status: TrustStatus,
    pub observed_at: DateTime<Utc>,
}

impl VehicleStatus {
    /// Escalation rank: HEALTHY < WARNING < CRITICAL. IN_SERVICE sits
    /// outside the escalation ladder and is never entered by the engine.
    pub fn rank(self) -> u8 {
        match self {
            VehicleStatus::Healthy => 0,
            VehicleStatus::Warning => 1,
            VehicleStatus::Critical => 2,
            VehicleStatus::InService => 3,
        }
    }
}
