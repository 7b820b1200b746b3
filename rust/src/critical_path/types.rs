//! Types for critical path calculation.

use thiserror::Error;

use crate::interner::{TaskIdx, TaskIndex};

/// Per-task timing information, in whole minutes from the start of the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: i64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: i64,
    /// Latest allowable start time (from backward pass).
    pub latest_start: i64,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: i64,
    /// Slack = latest_start - earliest_start.
    pub slack: i64,
}

/// The dependency graph contains a cycle.
///
/// `task_ids` lists every task the forward pass could not process, which is
/// the cycle members plus everything downstream of them, in manifest order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cyclic dependency detected among tasks: [{}]", .task_ids.join(", "))]
pub struct CycleError {
    pub task_ids: Vec<String>,
}

/// Errors that can occur during critical path calculation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("duplicate task id '{0}'")]
    DuplicateTaskId(String),
    #[error("task '{task}' depends on undefined task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Result of the forward pass, backtrace and backward pass.
#[derive(Clone, Debug)]
pub struct CriticalPathResult {
    pub(crate) index: TaskIndex,
    /// Timings indexed by manifest slot.
    pub(crate) timings: Vec<TaskTiming>,
    pub(crate) critical: Vec<bool>,
    /// Largest earliest finish over all tasks (0 when empty).
    pub makespan: i64,
}

impl CriticalPathResult {
    pub fn timing(&self, task_id: &str) -> Option<&TaskTiming> {
        self.index
            .get(task_id)
            .map(|idx| &self.timings[idx as usize])
    }

    /// Whether the task lies on a zero-slack chain ending at the makespan.
    pub fn is_critical(&self, task_id: &str) -> bool {
        self.index
            .get(task_id)
            .is_some_and(|idx| self.critical[idx as usize])
    }

    /// Critical task ids in manifest order.
    pub fn critical_tasks(&self) -> Vec<&str> {
        (0..self.critical.len())
            .filter(|&i| self.critical[i])
            .filter_map(|i| self.index.resolve(i as TaskIdx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_message_lists_tasks() {
        let err = CycleError {
            task_ids: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "cyclic dependency detected among tasks: [A, B]"
        );
    }

    #[test]
    fn test_scheduler_error_wraps_cycle() {
        let err: SchedulerError = CycleError {
            task_ids: vec!["x".to_string()],
        }
        .into();
        assert!(matches!(err, SchedulerError::Cycle(_)));
        assert!(err.to_string().contains("[x]"));
    }
}
