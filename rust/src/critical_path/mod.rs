//! Critical path scheduling.
//!
//! Computes earliest start/finish times with a topological forward pass,
//! the makespan, and the set of zero-slack tasks that gate it. Several
//! terminal tasks may tie at the makespan, so the critical path is a set of
//! possibly convergent chains rather than a single ordered path.

mod calculation;
mod types;

pub use calculation::calculate_critical_path;
pub use types::{CriticalPathResult, CycleError, SchedulerError, TaskTiming};
