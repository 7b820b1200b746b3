//! Workflow simulation engine.
//!
//! Given a manifest of interdependent tasks, computes a parallel schedule,
//! the critical path, an ordered phase grouping and summary statistics
//! comparing sequential and parallel execution time.
//!
//! The engine is a pure, synchronous function of its inputs: no I/O, no shared
//! state between calls.

pub mod config;
pub mod critical_path;
pub mod interner;
pub mod logging;
pub mod models;
pub mod phases;
pub mod simulation;
pub mod sorting;
pub mod summary;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use config::{SimulationConfig, DEFAULT_PHASE_NAME};
pub use critical_path::{
    calculate_critical_path, CriticalPathResult, CycleError, SchedulerError, TaskTiming,
};
pub use models::{
    Artifact, Deliverable, Manifest, Phase, PhaseBoundary, QualityGate, ScheduleEntry,
    SimulationResult, Summary, TaskSpec,
};
pub use phases::{assign_phases, PhaseAssignment};
pub use simulation::{simulate, simulate_json, SimulationError, Simulator};
pub use summary::{collect_deliverables, collect_quality_gates, savings_percent, summarize};
pub use validation::{validate_manifest, ResourceExhausted, ValidationError, ValidationIssue};
