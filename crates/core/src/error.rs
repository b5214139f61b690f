use thiserror::Error;

/// Engine-level error taxonomy.
///
/// Only `VehicleNotFound` and a repeated `Persist` failure on
/// alert/vehicle writes ever reach callers; oracle failures are
/// absorbed by the diagnosis fallback and trust-log write failures
/// are logged and dropped.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("persist failed after retry: {0}")]
    Persist(String),

    #[error("store error: {0}")]
    Store(String),
}
