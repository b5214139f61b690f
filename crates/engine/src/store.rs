//! Store seam — vehicles, alerts, and the trust log.
//!
//! The engine reads and writes through this trait only; the production
//! backing can be any relational or key-value store. [`MemoryStore`]
//! backs tests and the demo binary.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use automind_core::{
    Alert, EngineError, TelemetrySnapshot, TrustEvent, Vehicle, VehicleStatus,
};

#[async_trait]
pub trait EngineStore: Send + Sync {
    /// Fetch a vehicle and its current telemetry snapshot.
    async fn get_vehicle(&self, id: &str) -> Result<(Vehicle, TelemetrySnapshot), EngineError>;

    /// Persist a newly created alert. Alerts accumulate; existing ones
    /// are never overwritten.
    async fn save_alert(&self, alert: &Alert) -> Result<(), EngineError>;

    /// Persist a vehicle's mutated status/health score.
    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<(), EngineError>;

    /// Append one trust-log entry.
    async fn append_trust_event(&self, event: &TrustEvent) -> Result<(), EngineError>;

    /// All trust-log entries, newest first.
    async fn list_trust_events(&self) -> Result<Vec<TrustEvent>, EngineError>;

    /// Latest trust score per agent.
    async fn agent_trust_scores(&self) -> Result<HashMap<String, u8>, EngineError>;
}

// ── In-memory store ─────────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    vehicles: HashMap<String, (Vehicle, TelemetrySnapshot)>,
    /// Newest first.
    alerts: Vec<Alert>,
    trust_events: Vec<TrustEvent>,
}

/// In-memory store for tests and the demo fleet.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the two-vehicle demo fleet.
    pub fn with_demo_fleet() -> Self {
        let store = Self::new();
        store.insert_vehicle(
            Vehicle {
                id: "v1".to_string(),
                vin: "1HGCM82633A004352".to_string(),
                model: "Tesla Model 3".to_string(),
                year: 2023,
                owner_id: "u1".to_string(),
                status: VehicleStatus::Healthy,
                health_score: 98,
            },
            TelemetrySnapshot {
                speed: 65.0,
                rpm: 0.0,
                engine_temp: 40.0,
                battery_voltage: 400.0,
                brake_wear_level: 10.0,
                captured_at: Utc::now(),
            },
        );
        store.insert_vehicle(
            Vehicle {
                id: "v2".to_string(),
                vin: "1G1YY22U655114233".to_string(),
                model: "Ford F-150 Lightning".to_string(),
                year: 2022,
                owner_id: "u1".to_string(),
                status: VehicleStatus::Warning,
                health_score: 72,
            },
            TelemetrySnapshot {
                speed: 45.0,
                rpm: 0.0,
                engine_temp: 55.0,
                battery_voltage: 380.0,
                brake_wear_level: 82.0,
                captured_at: Utc::now(),
            },
        );
        store
    }

    pub fn insert_vehicle(&self, vehicle: Vehicle, snapshot: TelemetrySnapshot) {
        let mut state = self.state.write().expect("memory store lock poisoned");
        state.vehicles.insert(vehicle.id.clone(), (vehicle, snapshot));
    }

    /// Replace a vehicle's current snapshot (ingestion path).
    pub fn set_snapshot(&self, vehicle_id: &str, snapshot: TelemetrySnapshot) -> bool {
        let mut state = self.state.write().expect("memory store lock poisoned");
        match state.vehicles.get_mut(vehicle_id) {
            Some((_, current)) => {
                *current = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        let state = self.state.read().expect("memory store lock poisoned");
        state.alerts.clone()
    }

    pub fn vehicle_ids(&self) -> Vec<String> {
        let state = self.state.read().expect("memory store lock poisoned");
        let mut ids: Vec<_> = state.vehicles.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn get_vehicle(&self, id: &str) -> Result<(Vehicle, TelemetrySnapshot), EngineError> {
        let state = self.state.read().expect("memory store lock poisoned");
        state
            .vehicles
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::VehicleNotFound(id.to_string()))
    }

    async fn save_alert(&self, alert: &Alert) -> Result<(), EngineError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        state.alerts.insert(0, alert.clone());
        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<(), EngineError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        match state.vehicles.get_mut(&vehicle.id) {
            Some((current, _)) => {
                *current = vehicle.clone();
                Ok(())
            }
            None => Err(EngineError::VehicleNotFound(vehicle.id.clone())),
        }
    }

    async fn append_trust_event(&self, event: &TrustEvent) -> Result<(), EngineError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        state.trust_events.insert(0, event.clone());
        Ok(())
    }

    async fn list_trust_events(&self) -> Result<Vec<TrustEvent>, EngineError> {
        let state = self.state.read().expect("memory store lock poisoned");
        Ok(state.trust_events.clone())
    }

    async fn agent_trust_scores(&self) -> Result<HashMap<String, u8>, EngineError> {
        let state = self.state.read().expect("memory store lock poisoned");
        let mut scores = HashMap::new();
        // Events are newest first; keep the first score seen per agent.
        for event in &state.trust_events {
            scores
                .entry(event.agent_name.clone())
                .or_insert(event.trust_score);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use automind_core::{AlertStatus, Severity, TrustStatus};

    use super::*;

    fn event(agent: &str, score: u8) -> TrustEvent {
        TrustEvent {
            id: uuid::Uuid::new_v4().to_string(),
            agent_name: agent.to_string(),
            action: "test".to_string(),
            trust_score: score,
            status: TrustStatus::Normal,
            observed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_vehicle_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_vehicle("nope").await.unwrap_err();
        assert!(matches!(err, EngineError::VehicleNotFound(_)));
    }

    #[tokio::test]
    async fn demo_fleet_is_seeded() {
        let store = MemoryStore::with_demo_fleet();
        assert_eq!(store.vehicle_ids(), vec!["v1", "v2"]);
        let (vehicle, snap) = store.get_vehicle("v2").await.unwrap();
        assert_eq!(vehicle.model, "Ford F-150 Lightning");
        assert!((snap.brake_wear_level - 82.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn alerts_accumulate_newest_first() {
        let store = MemoryStore::with_demo_fleet();
        for kind in ["first", "second"] {
            store
                .save_alert(&Alert {
                    id: uuid::Uuid::new_v4().to_string(),
                    vehicle_id: "v1".to_string(),
                    kind: kind.to_string(),
                    severity: Severity::High,
                    confidence: 0.9,
                    description: String::new(),
                    recommended_action: String::new(),
                    status: AlertStatus::New,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let alerts = store.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, "second");
    }

    #[tokio::test]
    async fn trust_scores_report_latest_per_agent() {
        let store = MemoryStore::new();
        store.append_trust_event(&event("Diagnosis Agent", 95)).await.unwrap();
        store.append_trust_event(&event("Diagnosis Agent", 80)).await.unwrap();
        store.append_trust_event(&event("Digital Twin Agent", 100)).await.unwrap();

        let scores = store.agent_trust_scores().await.unwrap();
        assert_eq!(scores["Diagnosis Agent"], 80);
        assert_eq!(scores["Digital Twin Agent"], 100);
    }
}
