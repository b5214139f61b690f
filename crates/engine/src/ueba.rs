//! UEBA trust scorer — behavioral trust per pipeline stage.
//!
//! Wraps every stage invocation, measuring latency against a per-stage
//! baseline and maintaining a rolling trust score and anomaly flag per
//! agent. Scores are behavioral health of the *stage*, not the vehicle.
//!
//! The sporadic "glitch" penalty is intentionally stochastic background
//! noise, not a measured signal; its random source is injectable and
//! seedable so tests can pin or disable it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use automind_core::{AgentProfile, TrustEvent, TrustStatus};

/// Baseline latency for agents never seen before.
const DEFAULT_BASELINE_MS: u64 = 1000;

/// Probability of the sporadic glitch penalty per invocation.
const GLITCH_PROBABILITY: f64 = 0.02;
const GLITCH_PENALTY: f64 = 20.0;

/// Well-known pipeline stages and their expected latencies.
const KNOWN_BASELINES: &[(&str, u64)] = &[
    ("Diagnosis Agent", 1500),
    ("Digital Twin Agent", 500),
    ("Scheduling Agent", 800),
    ("OEM Insights Agent", 2000),
];

struct ScorerState {
    profiles: HashMap<String, AgentProfile>,
    /// `None` disables the glitch penalty entirely.
    rng: Option<SmallRng>,
}

/// Thread-safe trust scorer shared by all concurrent cycles.
///
/// All vehicles funnel through the same small set of named agents, so
/// profile state is shared mutable state and lives behind one mutex.
pub struct TrustScorer {
    state: Mutex<ScorerState>,
}

impl TrustScorer {
    /// Entropy-seeded glitch source (production behavior).
    pub fn new() -> Self {
        Self::with_rng(Some(SmallRng::from_entropy()))
    }

    /// Deterministic glitch source for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Some(SmallRng::seed_from_u64(seed)))
    }

    /// No glitch penalty at all — fully deterministic scoring.
    pub fn without_glitch() -> Self {
        Self::with_rng(None)
    }

    fn with_rng(rng: Option<SmallRng>) -> Self {
        let profiles = KNOWN_BASELINES
            .iter()
            .map(|(name, baseline)| {
                (
                    name.to_string(),
                    AgentProfile {
                        agent_name: name.to_string(),
                        baseline_latency_ms: *baseline,
                        interaction_count: 0,
                    },
                )
            })
            .collect();
        Self {
            state: Mutex::new(ScorerState { profiles, rng }),
        }
    }

    /// Score one stage invocation. The agent's interaction count is
    /// incremented *before* scoring, so the experience bonus reflects
    /// the call currently being scored.
    pub fn score(&self, agent_name: &str, elapsed: Duration) -> (u8, TrustStatus) {
        let mut state = self.state.lock().expect("trust scorer mutex poisoned");

        let profile = state
            .profiles
            .entry(agent_name.to_string())
            .or_insert_with(|| AgentProfile {
                agent_name: agent_name.to_string(),
                baseline_latency_ms: DEFAULT_BASELINE_MS,
                interaction_count: 0,
            });
        profile.interaction_count += 1;

        let baseline = profile.baseline_latency_ms as f64;
        let interaction_count = profile.interaction_count;
        let elapsed_ms = elapsed.as_millis() as f64;

        let mut score: f64 = 100.0;

        // Latency tiers are mutually exclusive; only the first applies.
        if elapsed_ms > baseline * 3.0 {
            score -= 15.0;
        } else if elapsed_ms > baseline * 1.5 {
            score -= 5.0;
        }

        // Sporadic glitch, independent of elapsed time.
        if let Some(rng) = state.rng.as_mut() {
            if rng.gen::<f64>() < GLITCH_PROBABILITY {
                score -= GLITCH_PENALTY;
            }
        }

        // Experience bonus: stages seen more often are trusted slightly more.
        score += (interaction_count as f64 * 0.1).min(5.0);

        let score = score.clamp(0.0, 100.0).floor() as u8;
        let status = if score < 80 {
            TrustStatus::Anomaly
        } else {
            TrustStatus::Normal
        };
        (score, status)
    }

    /// Score an invocation and build the append-only trust-log entry.
    pub fn observe(&self, agent_name: &str, action: &str, elapsed: Duration) -> TrustEvent {
        let (trust_score, status) = self.score(agent_name, elapsed);
        TrustEvent {
            id: Uuid::new_v4().to_string(),
            agent_name: agent_name.to_string(),
            action: action.to_string(),
            trust_score,
            status,
            observed_at: Utc::now(),
        }
    }

    /// Current interaction count for an agent (0 if unseen).
    pub fn interaction_count(&self, agent_name: &str) -> u64 {
        let state = self.state.lock().expect("trust scorer mutex poisoned");
        state
            .profiles
            .get(agent_name)
            .map(|p| p.interaction_count)
            .unwrap_or(0)
    }

    /// Snapshot of all agent profiles.
    pub fn profiles(&self) -> Vec<AgentProfile> {
        let state = self.state.lock().expect("trust scorer mutex poisoned");
        let mut profiles: Vec<_> = state.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
        profiles
    }
}

impl Default for TrustScorer {
    fn default() -> Self {
        Self::new()
    }
}
