//! Digital twin — physics consistency validation.
//!
//! Independently checks whether the raw snapshot values sit inside known
//! operating envelopes, producing its own judgement and confidence. Pure
//! and infallible: no external calls, no error path. It exists to be a
//! deterministic second opinion next to the diagnosis oracle.

use automind_core::{TelemetrySnapshot, ValidationResult};

/// Aggregate confidence is the **maximum** among triggered checks, not a
/// sum: a single strong signal must not be diluted by weak ones.
pub fn validate(model: &str, snap: &TelemetrySnapshot) -> ValidationResult {
    let mut anomaly_consistent = false;
    let mut confidence: f64 = 0.0;
    let mut log = Vec::new();

    // 1. Thermal check. Expected max temperature depends on RPM.
    let envelope_max = if snap.rpm > 3000.0 { 115.0 } else { 105.0 };
    if snap.engine_temp > envelope_max {
        log.push(format!(
            "[Thermal] Temp {:.1}°C exceeds expected max {:.0}°C for RPM {:.0}.",
            snap.engine_temp, envelope_max, snap.rpm
        ));
        anomaly_consistent = true;
        confidence = ((snap.engine_temp - envelope_max) / 10.0).min(0.99);
    } else if snap.engine_temp < 60.0 && snap.rpm > 2000.0 {
        // Sensor-failure signature: cold reading under active load.
        log.push(format!(
            "[Thermal] Temp {:.1}°C is abnormally low for active RPM {:.0}. Possible sensor failure.",
            snap.engine_temp, snap.rpm
        ));
        anomaly_consistent = true;
        confidence = 0.75;
    }

    // 2. Electrical check. Alternator should hold >13V with the engine running.
    if snap.rpm > 0.0 && snap.battery_voltage < 13.0 {
        log.push(format!(
            "[Electrical] Alternator output {:.1}V too low for active engine.",
            snap.battery_voltage
        ));
        anomaly_consistent = true;
        confidence = confidence.max(0.85);
    }

    // 3. Mechanical wear check.
    if snap.brake_wear_level > 85.0 {
        log.push(format!(
            "[Mechanical] Brake wear critical at {:.1}%. Physical limit approach imminent.",
            snap.brake_wear_level
        ));
        anomaly_consistent = true;
        confidence = confidence.max(0.95);
    }

    // 4. Powertrain override for high-voltage platforms.
    if is_ev_platform(model) && snap.battery_voltage < 350.0 && snap.rpm > 0.0 {
        log.push(format!(
            "[EV-Powertrain] High Voltage rail sag detected: {:.1}V.",
            snap.battery_voltage
        ));
        anomaly_consistent = true;
        confidence = confidence.max(0.90);
    }

    if !anomaly_consistent {
        log.push("Simulation parameters within nominal operating bounds.".to_string());
    }

    ValidationResult {
        anomaly_consistent,
        confidence,
        explanation_log: log,
    }
}

/// Model names that indicate an electric/high-voltage platform.
fn is_ev_platform(model: &str) -> bool {
    model.contains("Tesla") || model.contains("Lightning")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn snap(engine_temp: f64, rpm: f64, voltage: f64, brake_wear: f64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed: 60.0,
            rpm,
            engine_temp,
            battery_voltage: voltage,
            brake_wear_level: brake_wear,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn nominal_snapshot_is_consistent_with_single_log_line() {
        let result = validate("Toyota Corolla", &snap(95.0, 2500.0, 13.5, 20.0));
        assert!(!result.anomaly_consistent);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.explanation_log.len(), 1);
        assert!(result.explanation_log[0].contains("nominal"));
    }

    #[test]
    fn thermal_envelope_widens_at_high_rpm() {
        // 110°C is over the low-RPM envelope (105) but inside the
        // high-RPM one (115).
        let low = validate("Toyota Corolla", &snap(110.0, 2000.0, 13.5, 20.0));
        assert!(low.anomaly_consistent);
        assert!((low.confidence - 0.5).abs() < 1e-9);

        let high = validate("Toyota Corolla", &snap(110.0, 3500.0, 13.5, 20.0));
        assert!(!high.anomaly_consistent);
    }

    #[test]
    fn thermal_confidence_scales_with_deviation_and_caps() {
        let result = validate("Toyota Corolla", &snap(120.0, 3500.0, 13.5, 20.0));
        assert!((result.confidence - 0.5).abs() < 1e-9);

        // Deviation far beyond the envelope caps at 0.99.
        let result = validate("Toyota Corolla", &snap(250.0, 3500.0, 13.5, 20.0));
        assert!((result.confidence - 0.99).abs() < 1e-9);
    }

    #[test]
    fn cold_engine_under_load_flags_sensor_failure() {
        let result = validate("Toyota Corolla", &snap(40.0, 2500.0, 13.5, 20.0));
        assert!(result.anomaly_consistent);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert!(result.explanation_log[0].contains("sensor failure"));
    }

    #[test]
    fn confidence_is_max_not_sum() {
        // Mechanical (0.95) and electrical (0.85) both fire; aggregate
        // stays at 0.95, never 1.80.
        let result = validate("Toyota Corolla", &snap(90.0, 2000.0, 12.5, 90.0));
        assert!(result.anomaly_consistent);
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert_eq!(result.explanation_log.len(), 2);
    }

    #[test]
    fn brake_wear_alone_scores_mechanical_confidence() {
        let result = validate("Toyota Corolla", &snap(90.0, 2000.0, 13.5, 90.0));
        assert!((result.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn ev_rail_sag_fires_for_ev_platforms_only() {
        // 340V is rail sag on a HV platform, but well above the 13V
        // alternator threshold, so nothing fires for an ICE model.
        let ev = validate("Tesla Model 3", &snap(90.0, 1000.0, 340.0, 20.0));
        assert!(ev.anomaly_consistent);
        assert!((ev.confidence - 0.90).abs() < 1e-9);
        assert!(ev.explanation_log[0].contains("EV-Powertrain"));

        let ice = validate("Toyota Corolla", &snap(90.0, 1000.0, 340.0, 20.0));
        assert!(!ice.anomaly_consistent);
    }

    #[test]
    fn ev_rule_stacks_on_top_of_other_checks() {
        // Brake wear (0.95) plus EV sag (0.90): max wins, both log lines present.
        let result = validate("Ford F-150 Lightning", &snap(90.0, 1000.0, 340.0, 90.0));
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert_eq!(result.explanation_log.len(), 2);
    }
}
