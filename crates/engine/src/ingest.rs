//! Telemetry drift simulation for demo ingestion.
//!
//! Produces the next snapshot for a vehicle by drifting the previous
//! reading. Only the demo binary drives this; the orchestrator core
//! consumes whatever snapshot the store returns.

use std::sync::Mutex;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use automind_core::TelemetrySnapshot;

pub struct DriftSimulator {
    rng: Mutex<SmallRng>,
}

impl DriftSimulator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Drift a snapshot: engine temperature wanders by [-5, +10)°C, and
    /// F-150 platforms get their brake wear pinned at 88% so the demo
    /// reliably exercises the mechanical-wear path.
    pub fn drift(&self, model: &str, previous: &TelemetrySnapshot) -> TelemetrySnapshot {
        let mut rng = self.rng.lock().expect("drift rng mutex poisoned");
        let mut next = previous.clone();
        next.engine_temp += rng.gen::<f64>() * 15.0 - 5.0;
        if model.contains("F-150") {
            next.brake_wear_level = 88.0;
        }
        next.captured_at = Utc::now();
        next
    }
}

impl Default for DriftSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap() -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed: 60.0,
            rpm: 2000.0,
            engine_temp: 90.0,
            battery_voltage: 13.5,
            brake_wear_level: 20.0,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn drift_stays_within_the_wander_band() {
        let sim = DriftSimulator::with_seed(7);
        for _ in 0..100 {
            let next = sim.drift("Toyota Corolla", &snap());
            assert!(next.engine_temp >= 85.0 && next.engine_temp < 100.0);
            assert!((next.brake_wear_level - 20.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn f150_brake_wear_is_forced_critical() {
        let sim = DriftSimulator::with_seed(7);
        let next = sim.drift("Ford F-150 Lightning", &snap());
        assert!((next.brake_wear_level - 88.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_seed_same_drift() {
        let a = DriftSimulator::with_seed(11).drift("Toyota Corolla", &snap());
        let b = DriftSimulator::with_seed(11).drift("Toyota Corolla", &snap());
        assert!((a.engine_temp - b.engine_temp).abs() < f64::EPSILON);
    }
}
