//! Core data types for the simulation engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An artifact a task produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

/// A normalized task from the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub parallel_ok: bool,
    #[serde(default)]
    pub checkpoint: bool,
    #[serde(default)]
    pub priority: String,
    /// Whole minutes. Signed so that ingestion mistakes reach validation.
    #[serde(default)]
    pub estimated_minutes: i64,
    #[serde(default)]
    pub produces: Vec<Artifact>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Declaration position in the source document, comparable with
    /// [`PhaseBoundary::position`]. `None` inherits the previous task's position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl TaskSpec {
    /// Create a task with the given id, duration and dependencies; all other
    /// fields take their empty defaults.
    pub fn new(id: impl Into<String>, estimated_minutes: i64, depends_on: Vec<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            agent: String::new(),
            depends_on,
            parallel_ok: false,
            checkpoint: false,
            priority: String::new(),
            estimated_minutes,
            produces: Vec::new(),
            acceptance_criteria: Vec::new(),
            position: None,
        }
    }
}

/// A phase marker discovered by the ingestion collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundary {
    pub name: String,
    pub position: u64,
}

/// Normalized manifest as exchanged with hosting services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub phase_boundaries: Vec<PhaseBoundary>,
}

/// An ordered group of tasks with its aggregates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub number: usize,
    pub name: String,
    /// Member task ids in manifest order.
    pub tasks: Vec<String>,
    pub total_minutes: i64,
    pub parallel_minutes: i64,
    pub is_parallel: bool,
    pub has_checkpoint: bool,
    /// Distinct agents in first-seen order.
    pub agents: Vec<String>,
}

/// One task's place in the computed schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub task_id: String,
    pub task_name: String,
    pub agent: String,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub slack: i64,
    pub phase_name: String,
    pub is_critical_path: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishes_at: Option<NaiveDateTime>,
}

/// Global figures for one simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_phases: usize,
    pub total_tasks: usize,
    pub total_agents: usize,
    pub checkpoint_count: usize,
    pub sequential_minutes: i64,
    pub parallel_minutes: i64,
    pub savings_percent: u32,
}

/// A flattened `produces` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub task_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

/// A task acting as a validation/approval checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGate {
    pub task_id: String,
    pub name: String,
    pub description: String,
}

/// Result of one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub summary: Summary,
    pub phases: Vec<Phase>,
    /// Sorted by earliest start, ties in manifest order.
    pub timeline: Vec<ScheduleEntry>,
    /// Critical task ids in manifest order. A set, not a path.
    pub critical_path: Vec<String>,
    pub deliverables: Vec<Deliverable>,
    pub quality_gates: Vec<QualityGate>,
}

impl SimulationResult {
    /// Look up a task's timeline entry.
    pub fn entry(&self, task_id: &str) -> Option<&ScheduleEntry> {
        self.timeline.iter().find(|e| e.task_id == task_id)
    }
}
