use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub oracle: OracleConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            oracle: OracleConfig::from_env(),
        }
    }
}

/// Diagnosis-oracle settings. The engine runs fallback-only when no
/// API key is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl OracleConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("GEMINI_API_KEY"),
            model: env_or("GEMINI_MODEL", "gemini-3-pro-preview"),
            timeout_ms: env_u64("ORACLE_TIMEOUT_MS", 10_000),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
