//! Predictive-maintenance orchestration and trust engine.
//!
//! This crate provides:
//! - Diagnosis stage with an external-oracle primary path and a
//!   deterministic heuristic fallback
//! - Digital twin physics-consistency validation
//! - UEBA behavioral trust scoring per pipeline stage
//! - Store seam with an in-memory implementation
//! - The orchestrator tying one cycle together per vehicle

pub mod diagnosis;
pub mod ingest;
pub mod orchestrator;
pub mod store;
pub mod twin;
pub mod ueba;

pub use diagnosis::DiagnosisStage;
pub use ingest::DriftSimulator;
pub use orchestrator::{CycleOutcome, Orchestrator, DIAGNOSIS_AGENT, TWIN_AGENT};
pub use store::{EngineStore, MemoryStore};
pub use ueba::TrustScorer;
