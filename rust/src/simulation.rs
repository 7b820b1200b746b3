//! Simulation driver: validation, phases, scheduling, aggregation, assembly.

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::critical_path::{calculate_critical_path, CriticalPathResult, CycleError, SchedulerError};
use crate::log_changes;
use crate::models::{Manifest, PhaseBoundary, ScheduleEntry, SimulationResult, TaskSpec};
use crate::phases::{assign_phases, PhaseAssignment};
use crate::sorting::sort_timeline;
use crate::summary::{collect_deliverables, collect_quality_gates, summarize};
use crate::validation::{
    validate_manifest, ManifestError, ResourceExhausted, ValidationError, ValidationIssue,
};

/// Errors that end a simulation request. None of them are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    ResourceExhausted(#[from] ResourceExhausted),
    #[error("malformed manifest: {0}")]
    Manifest(String),
    #[error("failed to serialize result: {0}")]
    Output(String),
}

impl From<SchedulerError> for SimulationError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::DuplicateTaskId(id) => SimulationError::Validation(ValidationError {
                issues: vec![ValidationIssue::DuplicateTaskId(id)],
            }),
            SchedulerError::UnknownDependency { task, dependency } => {
                SimulationError::Validation(ValidationError {
                    issues: vec![ValidationIssue::UnknownDependency { task, dependency }],
                })
            }
            SchedulerError::Cycle(cycle) => SimulationError::Cycle(cycle),
        }
    }
}

impl From<ManifestError> for SimulationError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Invalid(e) => SimulationError::Validation(e),
            ManifestError::TooLarge(e) => SimulationError::ResourceExhausted(e),
        }
    }
}

/// One simulation over a borrowed manifest.
pub struct Simulator<'a> {
    tasks: &'a [TaskSpec],
    boundaries: &'a [PhaseBoundary],
    config: &'a SimulationConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(
        tasks: &'a [TaskSpec],
        boundaries: &'a [PhaseBoundary],
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            tasks,
            boundaries,
            config,
        }
    }

    /// Run the simulation.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        let verbosity = self.config.verbosity;

        validate_manifest(self.tasks, self.config)?;

        let assignment = assign_phases(
            self.tasks,
            self.boundaries,
            &self.config.default_phase_name,
            verbosity,
        );
        log_changes!(
            verbosity,
            "[PHASE] {} tasks in {} phases",
            self.tasks.len(),
            assignment.phases.len()
        );

        let schedule = calculate_critical_path(self.tasks, verbosity)?;

        let summary = summarize(self.tasks, &assignment.phases, &schedule);
        log_changes!(
            verbosity,
            "[SUMMARY] sequential={}m parallel={}m savings={}%",
            summary.sequential_minutes,
            summary.parallel_minutes,
            summary.savings_percent
        );

        let timeline = self.build_timeline(&assignment, &schedule);
        let critical_path = schedule
            .critical_tasks()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(SimulationResult {
            summary,
            phases: assignment.into_phases(),
            timeline,
            critical_path,
            deliverables: collect_deliverables(self.tasks),
            quality_gates: collect_quality_gates(self.tasks, self.config),
        })
    }

    fn build_timeline(
        &self,
        assignment: &PhaseAssignment,
        schedule: &CriticalPathResult,
    ) -> Vec<ScheduleEntry> {
        let entries = self
            .tasks
            .iter()
            .enumerate()
            .filter_map(|(manifest_index, task)| {
                let timing = schedule.timing(&task.id)?;
                let entry = ScheduleEntry {
                    task_id: task.id.clone(),
                    task_name: task.name.clone(),
                    agent: task.agent.clone(),
                    earliest_start: timing.earliest_start,
                    earliest_finish: timing.earliest_finish,
                    slack: timing.slack,
                    phase_name: assignment
                        .phase_of(&task.id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    is_critical_path: schedule.is_critical(&task.id),
                    starts_at: self.project(timing.earliest_start),
                    finishes_at: self.project(timing.earliest_finish),
                };
                Some((manifest_index, entry))
            })
            .collect();

        sort_timeline(entries)
    }

    /// Wall-clock time `minutes` after the configured anchor.
    fn project(&self, minutes: i64) -> Option<NaiveDateTime> {
        let anchor = self.config.anchor?;
        anchor.checked_add_signed(Duration::try_minutes(minutes)?)
    }
}

/// Simulate a manifest.
pub fn simulate(
    tasks: &[TaskSpec],
    boundaries: &[PhaseBoundary],
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(tasks, boundaries, config).run()
}

/// Simulate a JSON manifest and return the JSON result.
pub fn simulate_json(manifest_json: &str, config: &SimulationConfig) -> Result<String, SimulationError> {
    let manifest: Manifest = serde_json::from_str(manifest_json)
        .map_err(|e| SimulationError::Manifest(e.to_string()))?;
    let result = simulate(&manifest.tasks, &manifest.phase_boundaries, config)?;
    serde_json::to_string(&result).map_err(|e| SimulationError::Output(e.to_string()))
}
