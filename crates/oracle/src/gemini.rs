use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use automind_core::{AnomalyCandidate, Severity, TelemetrySnapshot};

use crate::provider::{AnomalyOracle, OracleError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini-backed diagnosis oracle.
///
/// Sends the snapshot as a diagnostic prompt to the `generateContent`
/// API with a strict JSON `responseSchema`, and parses the judgement at
/// the boundary. The request carries a hard timeout; a timeout, a
/// non-200 status, or a malformed body all surface as [`OracleError`]
/// and trigger the caller's fallback path.
pub struct GeminiOracle {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

/// Wire shape of the oracle's structured judgement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Judgement {
    is_anomaly: bool,
    alert_type: Option<String>,
    severity: Option<Severity>,
    confidence: Option<f64>,
    description: Option<String>,
    recommended_action: Option<String>,
}

impl GeminiOracle {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn build_prompt(vehicle_model: &str, snap: &TelemetrySnapshot) -> String {
        format!(
            "Act as an expert automotive diagnostic AI. Analyze the following telematics data for a {}.\n\n\
             Telematics:\n\
             - Engine Temp: {:.1}°C\n\
             - RPM: {:.0}\n\
             - Speed: {:.0} km/h\n\
             - Battery: {:.1}V\n\
             - Brake Wear: {:.1}%\n\n\
             Determine if there is a potential anomaly. If yes, provide severity, confidence, and recommended action.",
            vehicle_model,
            snap.engine_temp,
            snap.rpm,
            snap.speed,
            snap.battery_voltage,
            snap.brake_wear_level,
        )
    }

    fn build_request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "isAnomaly": { "type": "BOOLEAN" },
                        "alertType": { "type": "STRING" },
                        "severity": { "type": "STRING", "enum": ["LOW", "MEDIUM", "HIGH", "CRITICAL"] },
                        "confidence": { "type": "NUMBER" },
                        "description": { "type": "STRING" },
                        "recommendedAction": { "type": "STRING" }
                    },
                    "required": ["isAnomaly"]
                }
            }
        })
    }

    /// Convert a parsed judgement into the candidate contract, clamping
    /// confidence into [0,1] at the boundary.
    fn into_candidate(judgement: Judgement) -> Option<AnomalyCandidate> {
        if !judgement.is_anomaly {
            return None;
        }
        Some(AnomalyCandidate {
            kind: judgement.alert_type.unwrap_or_else(|| "Unknown".to_string()),
            severity: judgement.severity.unwrap_or(Severity::Low),
            confidence: judgement.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
            description: judgement
                .description
                .unwrap_or_else(|| "Anomaly detected".to_string()),
            recommended_action: judgement
                .recommended_action
                .unwrap_or_else(|| "Inspect".to_string()),
        })
    }
}

#[async_trait]
impl AnomalyOracle for GeminiOracle {
    async fn classify(
        &self,
        vehicle_model: &str,
        snapshot: &TelemetrySnapshot,
    ) -> Result<Option<AnomalyCandidate>, OracleError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );
        let prompt = Self::build_prompt(vehicle_model, snapshot);
        let body = Self::build_request_body(&prompt);

        debug!(model = %self.model, "gemini classify request");

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let text = resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                OracleError::Parse("missing candidates[0].content.parts[0].text".into())
            })?;

        let judgement: Judgement = serde_json::from_str(text)
            .map_err(|e| OracleError::Parse(format!("bad judgement JSON: {}", e)))?;

        Ok(Self::into_candidate(judgement))
    }
}
