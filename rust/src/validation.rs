//! Manifest validation run before any scheduling work.
//!
//! Checks the size bounds first, then collects every per-task issue so that a
//! caller can report all authoring mistakes at once.

use thiserror::Error;

use crate::config::SimulationConfig;
use crate::interner::TaskIndex;
use crate::log_checks;
use crate::models::TaskSpec;

/// A single authoring mistake in the manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("task at manifest index {0} has an empty id")]
    EmptyTaskId(usize),
    #[error("duplicate task id '{0}'")]
    DuplicateTaskId(String),
    #[error("task '{task}' has negative duration {minutes}m")]
    NegativeDuration { task: String, minutes: i64 },
    #[error("task '{0}' depends on itself")]
    SelfDependency(String),
    #[error("task '{task}' depends on undefined task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
    #[error("total duration overflows at task '{0}'")]
    TotalDurationOverflow(String),
}

/// The manifest failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid manifest: {}", format_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The manifest exceeds the configured work bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("manifest has {count} {kind}, limit is {limit}")]
pub struct ResourceExhausted {
    /// "tasks" or "edges".
    pub kind: &'static str,
    pub count: usize,
    pub limit: usize,
}

/// Reject manifests larger than the configured task/edge bounds.
pub fn check_bounds(tasks: &[TaskSpec], config: &SimulationConfig) -> Result<(), ResourceExhausted> {
    if tasks.len() > config.max_tasks {
        return Err(ResourceExhausted {
            kind: "tasks",
            count: tasks.len(),
            limit: config.max_tasks,
        });
    }

    let edges: usize = tasks.iter().map(|t| t.depends_on.len()).sum();
    if edges > config.max_edges {
        return Err(ResourceExhausted {
            kind: "edges",
            count: edges,
            limit: config.max_edges,
        });
    }

    Ok(())
}

/// Validate ids, durations and dependency references.
///
/// Issues are reported in manifest order.
pub fn validate_tasks(tasks: &[TaskSpec], verbosity: u8) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    let mut index = TaskIndex::with_capacity(tasks.len());
    // Every finish time is bounded by the sum of all durations
    let mut total_minutes: Option<i64> = Some(0);

    for (position, task) in tasks.iter().enumerate() {
        if task.id.trim().is_empty() {
            issues.push(ValidationIssue::EmptyTaskId(position));
        } else if index.insert(&task.id).is_err() {
            issues.push(ValidationIssue::DuplicateTaskId(task.id.clone()));
        }

        if task.estimated_minutes < 0 {
            issues.push(ValidationIssue::NegativeDuration {
                task: task.id.clone(),
                minutes: task.estimated_minutes,
            });
        } else if let Some(total) = total_minutes {
            total_minutes = total.checked_add(task.estimated_minutes);
            if total_minutes.is_none() {
                issues.push(ValidationIssue::TotalDurationOverflow(task.id.clone()));
            }
        }
    }

    for task in tasks {
        for dep in &task.depends_on {
            if dep == &task.id {
                issues.push(ValidationIssue::SelfDependency(task.id.clone()));
            } else if index.get(dep).is_none() {
                issues.push(ValidationIssue::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    if issues.is_empty() {
        return Ok(());
    }

    for issue in &issues {
        log_checks!(verbosity, "[VALIDATE] {}", issue);
    }
    Err(ValidationError { issues })
}

/// Run the bound check and the per-task validation.
pub fn validate_manifest(tasks: &[TaskSpec], config: &SimulationConfig) -> Result<(), ManifestError> {
    check_bounds(tasks, config)?;
    validate_tasks(tasks, config.verbosity)?;
    Ok(())
}

/// Failure from [`validate_manifest`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    TooLarge(#[from] ResourceExhausted),
}
