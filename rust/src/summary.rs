//! Phase and summary aggregation.
//!
//! Pure reducers over already validated tasks, phases and schedule output.

use rustc_hash::FxHashSet;

use crate::config::SimulationConfig;
use crate::critical_path::CriticalPathResult;
use crate::models::{Deliverable, Phase, QualityGate, Summary, TaskSpec};

/// Percentage of sequential time saved by running in parallel.
///
/// Rounded to the nearest integer with ties rounding up. Exact integer
/// arithmetic: round_half_up(a / b) = floor((2a + b) / 2b).
pub fn savings_percent(sequential_minutes: i64, parallel_minutes: i64) -> u32 {
    if sequential_minutes <= 0 {
        return 0;
    }
    let saved = i128::from((sequential_minutes - parallel_minutes).max(0));
    let sequential = i128::from(sequential_minutes);
    ((200 * saved + sequential) / (2 * sequential)) as u32
}

/// Build the global summary.
pub fn summarize(tasks: &[TaskSpec], phases: &[Phase], schedule: &CriticalPathResult) -> Summary {
    let sequential_minutes: i64 = tasks.iter().map(|t| t.estimated_minutes).sum();
    let parallel_minutes = schedule.makespan;

    let agents: FxHashSet<&str> = tasks.iter().map(|t| t.agent.as_str()).collect();

    Summary {
        total_phases: phases.len(),
        total_tasks: tasks.len(),
        total_agents: agents.len(),
        checkpoint_count: tasks.iter().filter(|t| t.checkpoint).count(),
        sequential_minutes,
        parallel_minutes,
        savings_percent: savings_percent(sequential_minutes, parallel_minutes),
    }
}

/// Flatten every task's `produces` list, task order first, then declaration order.
pub fn collect_deliverables(tasks: &[TaskSpec]) -> Vec<Deliverable> {
    tasks
        .iter()
        .flat_map(|task| {
            task.produces.iter().map(move |artifact| Deliverable {
                task_id: task.id.clone(),
                name: artifact.name.clone(),
                kind: artifact.kind.clone(),
                path: artifact.path.clone(),
            })
        })
        .collect()
}

/// Tasks flagged as checkpoints or named as quality-assurance tasks.
pub fn collect_quality_gates(tasks: &[TaskSpec], config: &SimulationConfig) -> Vec<QualityGate> {
    tasks
        .iter()
        .filter(|t| t.checkpoint || config.is_quality_gate_id(&t.id))
        .map(|t| QualityGate {
            task_id: t.id.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical_path::calculate_critical_path;
    use crate::models::Artifact;
    use crate::phases::assign_phases;

    fn make_task(id: &str, minutes: i64, deps: &[&str], agent: &str) -> TaskSpec {
        TaskSpec {
            agent: agent.to_string(),
            ..TaskSpec::new(id, minutes, deps.iter().map(|d| d.to_string()).collect())
        }
    }

    fn artifact(name: &str) -> Artifact {
        Artifact {
            name: name.to_string(),
            kind: "file".to_string(),
            path: format!("out/{}", name),
        }
    }

    #[test]
    fn test_savings_percent_rounding() {
        assert_eq!(savings_percent(35, 30), 14); // 14.28
        assert_eq!(savings_percent(0, 0), 0);
        assert_eq!(savings_percent(15, 15), 0);
        assert_eq!(savings_percent(8, 7), 13); // 12.5 rounds up
        assert_eq!(savings_percent(200, 1), 100); // 99.5 rounds up
        assert_eq!(savings_percent(3, 2), 33); // 33.33
        assert_eq!(savings_percent(3, 1), 67); // 66.67
    }

    #[test]
    fn test_summary_for_fan_out() {
        let tasks = vec![
            make_task("A", 10, &[], "architect"),
            make_task("B", 20, &["A"], "backend"),
            make_task("C", 5, &["A"], "backend"),
        ];
        let phases = assign_phases(&tasks, &[], "All Tasks", 0).into_phases();
        let schedule = calculate_critical_path(&tasks, 0).unwrap();
        let summary = summarize(&tasks, &phases, &schedule);

        assert_eq!(
            summary,
            Summary {
                total_phases: 1,
                total_tasks: 3,
                total_agents: 2,
                checkpoint_count: 0,
                sequential_minutes: 35,
                parallel_minutes: 30,
                savings_percent: 14,
            }
        );
    }

    #[test]
    fn test_deliverables_preserve_order_without_dedup() {
        let mut a = make_task("a", 1, &[], "dev");
        let mut b = make_task("b", 1, &[], "dev");
        a.produces = vec![artifact("schema.sql"), artifact("api.md")];
        b.produces = vec![artifact("api.md")];

        let deliverables = collect_deliverables(&[a, b]);
        let names: Vec<(&str, &str)> = deliverables
            .iter()
            .map(|d| (d.task_id.as_str(), d.name.as_str()))
            .collect();

        assert_eq!(
            names,
            vec![("a", "schema.sql"), ("a", "api.md"), ("b", "api.md")]
        );
        assert_eq!(deliverables[0].path, "out/schema.sql");
    }

    #[test]
    fn test_quality_gates_by_flag_or_prefix() {
        let mut review = make_task("review", 5, &[], "lead");
        review.checkpoint = true;
        review.description = "Sign-off".to_string();
        let qa = make_task("qa-regression", 30, &[], "qa");
        let build = make_task("build", 10, &[], "dev");

        let gates = collect_quality_gates(&[review, build, qa], &SimulationConfig::default());
        let ids: Vec<&str> = gates.iter().map(|g| g.task_id.as_str()).collect();

        assert_eq!(ids, vec!["review", "qa-regression"]);
        assert_eq!(gates[0].description, "Sign-off");
    }

    #[test]
    fn test_custom_quality_gate_prefixes() {
        let config = SimulationConfig {
            quality_gate_prefixes: vec!["verify-".to_string()],
            ..SimulationConfig::default()
        };
        let tasks = vec![
            make_task("verify-build", 1, &[], "ci"),
            make_task("qa-smoke", 1, &[], "qa"),
        ];

        let gates = collect_quality_gates(&tasks, &config);
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].task_id, "verify-build");
    }
}
