//! Phase assignment: partitions tasks into ordered phases.
//!
//! Each task lands in the phase whose boundary is the closest one at or before
//! the task's declaration position. Tasks declared before every boundary are
//! clamped into the first phase, so the partition is always total.

use rustc_hash::FxHashMap;

use crate::log_checks;
use crate::models::{Phase, PhaseBoundary, TaskSpec};

/// Outcome of phase assignment.
#[derive(Clone, Debug, Default)]
pub struct PhaseAssignment {
    /// Non-empty phases numbered from 1 in boundary order.
    pub phases: Vec<Phase>,
    /// Task id -> index into `phases`.
    task_phase: FxHashMap<String, usize>,
}

impl PhaseAssignment {
    /// The phase a task was assigned to.
    pub fn phase_of(&self, task_id: &str) -> Option<&Phase> {
        self.task_phase.get(task_id).map(|&i| &self.phases[i])
    }

    /// Consume the assignment, keeping only the phases.
    pub fn into_phases(self) -> Vec<Phase> {
        self.phases
    }
}

/// Resolve each task's effective declaration position.
///
/// Tasks without a position inherit the previous task's; the first defaults to 0.
pub fn resolve_positions(tasks: &[TaskSpec]) -> Vec<u64> {
    let mut last = 0;
    tasks
        .iter()
        .map(|task| {
            if let Some(position) = task.position {
                last = position;
            }
            last
        })
        .collect()
}

/// Partition tasks into phases.
///
/// With no boundaries every task joins one synthetic phase named `default_name`.
/// An empty manifest yields no phases, with or without boundaries.
pub fn assign_phases(
    tasks: &[TaskSpec],
    boundaries: &[PhaseBoundary],
    default_name: &str,
    verbosity: u8,
) -> PhaseAssignment {
    if tasks.is_empty() {
        return PhaseAssignment::default();
    }

    if boundaries.is_empty() {
        let members: Vec<&TaskSpec> = tasks.iter().collect();
        let phase = build_phase(1, default_name, &members);
        let task_phase = tasks.iter().map(|t| (t.id.clone(), 0)).collect();
        return PhaseAssignment {
            phases: vec![phase],
            task_phase,
        };
    }

    // Stable: equal positions keep their declared order, and the last of them wins
    let mut sorted: Vec<&PhaseBoundary> = boundaries.iter().collect();
    sorted.sort_by_key(|b| b.position);

    let positions = resolve_positions(tasks);
    let mut members: Vec<Vec<&TaskSpec>> = vec![Vec::new(); sorted.len()];

    for (task, &position) in tasks.iter().zip(&positions) {
        let slot = sorted
            .partition_point(|b| b.position <= position)
            .saturating_sub(1);
        log_checks!(
            verbosity,
            "[PHASE] task {} @{} -> '{}'",
            task.id,
            position,
            sorted[slot].name
        );
        members[slot].push(task);
    }

    let mut phases = Vec::new();
    let mut task_phase = FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());

    for (boundary, group) in sorted.iter().zip(&members) {
        if group.is_empty() {
            continue;
        }
        let idx = phases.len();
        for task in group {
            task_phase.insert(task.id.clone(), idx);
        }
        phases.push(build_phase(idx + 1, &boundary.name, group));
    }

    PhaseAssignment { phases, task_phase }
}

/// Compute a phase's aggregates from its members.
fn build_phase(number: usize, name: &str, members: &[&TaskSpec]) -> Phase {
    let total_minutes: i64 = members.iter().map(|t| t.estimated_minutes).sum();
    let is_parallel = members.iter().filter(|t| t.parallel_ok).count() > 1;
    let parallel_minutes = if is_parallel {
        members
            .iter()
            .map(|t| t.estimated_minutes)
            .max()
            .unwrap_or(0)
    } else {
        total_minutes
    };

    let mut agents: Vec<String> = Vec::new();
    for task in members {
        if !agents.contains(&task.agent) {
            agents.push(task.agent.clone());
        }
    }

    Phase {
        number,
        name: name.to_string(),
        tasks: members.iter().map(|t| t.id.clone()).collect(),
        total_minutes,
        parallel_minutes,
        is_parallel,
        has_checkpoint: members.iter().any(|t| t.checkpoint),
        agents,
    }
}
