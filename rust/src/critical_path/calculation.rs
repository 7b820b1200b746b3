//! Critical path calculation using forward and backward passes.

use std::collections::VecDeque;

use crate::interner::{TaskIdx, TaskIndex};
use crate::models::TaskSpec;
use crate::{log_changes, log_checks, log_debug};

use super::types::{CriticalPathResult, CycleError, SchedulerError, TaskTiming};

/// Dependency graph over manifest slots.
/// All lookups use direct array indexing.
struct TaskGraph {
    index: TaskIndex,
    durations: Vec<i64>,
    /// Dependencies of each task, in declaration order.
    deps: Vec<Vec<TaskIdx>>,
    /// Reverse dependencies (successors) of each task.
    successors: Vec<Vec<TaskIdx>>,
    in_degree: Vec<usize>,
}

impl TaskGraph {
    /// Build the graph, rejecting repeated ids and dependency ids that do not resolve.
    fn build(tasks: &[TaskSpec]) -> Result<Self, SchedulerError> {
        let index = TaskIndex::from_tasks(tasks).map_err(SchedulerError::DuplicateTaskId)?;
        let n = index.len();

        let mut durations = vec![0; n];
        let mut deps: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for (idx, task) in tasks.iter().enumerate() {
            let id = idx as TaskIdx;
            durations[idx] = task.estimated_minutes;

            for dep in &task.depends_on {
                let dep_id = index
                    .get(dep)
                    .ok_or_else(|| SchedulerError::UnknownDependency {
                        task: task.id.clone(),
                        dependency: dep.clone(),
                    })?;
                deps[idx].push(dep_id);
                successors[dep_id as usize].push(id);
                in_degree[idx] += 1;
            }
        }

        Ok(Self {
            index,
            durations,
            deps,
            successors,
            in_degree,
        })
    }

    fn name(&self, idx: usize) -> &str {
        self.index.resolve(idx as TaskIdx).unwrap_or("?")
    }
}

/// Calculate earliest times, makespan and the critical set for every task.
///
/// The forward pass is Kahn's algorithm seeded in manifest order. Tasks whose
/// in-degree never drops to zero are reported as a [`CycleError`]. The critical
/// set is backtraced from every task finishing at the makespan through
/// dependencies whose finish equals the dependent's start exactly. A backward
/// pass then fills latest times and slack.
pub fn calculate_critical_path(
    tasks: &[TaskSpec],
    verbosity: u8,
) -> Result<CriticalPathResult, SchedulerError> {
    let graph = TaskGraph::build(tasks)?;
    let n = graph.index.len();

    // Forward pass
    let mut earliest_start = vec![0i64; n];
    let mut earliest_finish = graph.durations.clone();
    let mut remaining = graph.in_degree.clone();
    let mut topo_order: Vec<usize> = Vec::with_capacity(n);

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();

    while let Some(current) = queue.pop_front() {
        topo_order.push(current);

        for &succ in &graph.successors[current] {
            let s = succ as usize;
            if earliest_finish[current] > earliest_start[s] {
                earliest_start[s] = earliest_finish[current];
            }
            earliest_finish[s] = earliest_start[s] + graph.durations[s];
            log_debug!(
                verbosity,
                "[FORWARD] {} -> {}: start={} finish={}",
                graph.name(current),
                graph.name(s),
                earliest_start[s],
                earliest_finish[s]
            );

            remaining[s] -= 1;
            if remaining[s] == 0 {
                queue.push_back(s);
            }
        }
    }

    if topo_order.len() < n {
        let task_ids: Vec<String> = (0..n)
            .filter(|&i| remaining[i] > 0)
            .map(|i| graph.name(i).to_string())
            .collect();
        log_checks!(verbosity, "[CYCLE] unprocessed tasks: {:?}", task_ids);
        return Err(CycleError { task_ids }.into());
    }

    let makespan = earliest_finish.iter().copied().max().unwrap_or(0);
    log_changes!(verbosity, "[SCHEDULE] {} tasks, makespan={}m", n, makespan);

    // Backtrace from every task finishing at the makespan
    let mut critical = vec![false; n];
    let mut stack: Vec<usize> = (0..n).filter(|&i| earliest_finish[i] == makespan).collect();
    for &i in &stack {
        critical[i] = true;
    }

    while let Some(task) = stack.pop() {
        for &dep in &graph.deps[task] {
            let d = dep as usize;
            if !critical[d] && earliest_finish[d] == earliest_start[task] {
                critical[d] = true;
                stack.push(d);
            }
        }
    }

    // Backward pass
    let mut timings = vec![TaskTiming::default(); n];
    for &task in topo_order.iter().rev() {
        let latest_finish = graph.successors[task]
            .iter()
            .map(|&s| timings[s as usize].latest_start)
            .min()
            .unwrap_or(makespan);
        let latest_start = latest_finish - graph.durations[task];

        timings[task] = TaskTiming {
            earliest_start: earliest_start[task],
            earliest_finish: earliest_finish[task],
            latest_start,
            latest_finish,
            slack: latest_start - earliest_start[task],
        };
    }

    for i in (0..n).filter(|&i| critical[i]) {
        log_checks!(verbosity, "[CRITICAL] {}", graph.name(i));
    }

    Ok(CriticalPathResult {
        index: graph.index,
        timings,
        critical,
        makespan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, minutes: i64, deps: &[&str]) -> TaskSpec {
        TaskSpec::new(id, minutes, deps.iter().map(|d| d.to_string()).collect())
    }

    fn timing(result: &CriticalPathResult, id: &str) -> (i64, i64) {
        let t = result.timing(id).unwrap();
        (t.earliest_start, t.earliest_finish)
    }

    #[test]
    fn test_empty_manifest() {
        let result = calculate_critical_path(&[], 0).unwrap();
        assert_eq!(result.makespan, 0);
        assert!(result.is_empty());
        assert!(result.critical_tasks().is_empty());
    }

    #[test]
    fn test_single_task() {
        let tasks = vec![make_task("only", 15, &[])];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(timing(&result, "only"), (0, 15));
        assert_eq!(result.makespan, 15);
        assert!(result.is_critical("only"));
    }

    #[test]
    fn test_fan_out() {
        let tasks = vec![
            make_task("A", 10, &[]),
            make_task("B", 20, &["A"]),
            make_task("C", 5, &["A"]),
        ];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(timing(&result, "A"), (0, 10));
        assert_eq!(timing(&result, "B"), (10, 30));
        assert_eq!(timing(&result, "C"), (10, 15));
        assert_eq!(result.makespan, 30);
        assert_eq!(result.critical_tasks(), vec!["A", "B"]);
        assert_eq!(result.timing("C").unwrap().slack, 15);
    }

    #[test]
    fn test_diamond_dependency() {
        // Path via b: 2 + 3 + 1 = 6
        // Path via c: 2 + 5 + 1 = 8 (critical)
        let tasks = vec![
            make_task("a", 2, &[]),
            make_task("b", 3, &["a"]),
            make_task("c", 5, &["a"]),
            make_task("d", 1, &["b", "c"]),
        ];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(result.makespan, 8);
        assert_eq!(result.critical_tasks(), vec!["a", "c", "d"]);
        assert_eq!(result.timing("b").unwrap().slack, 2);
    }

    #[test]
    fn test_tied_terminals_give_convergent_chains() {
        // Two independent chains of 10m each, both critical
        let tasks = vec![
            make_task("a1", 4, &[]),
            make_task("a2", 6, &["a1"]),
            make_task("b1", 7, &[]),
            make_task("b2", 3, &["b1"]),
            make_task("short", 1, &[]),
        ];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(result.makespan, 10);
        assert_eq!(result.critical_tasks(), vec!["a1", "a2", "b1", "b2"]);
        assert!(!result.is_critical("short"));
    }

    #[test]
    fn test_dependency_declared_after_dependent() {
        let tasks = vec![make_task("late", 5, &["early"]), make_task("early", 5, &[])];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(timing(&result, "early"), (0, 5));
        assert_eq!(timing(&result, "late"), (5, 10));
    }

    #[test]
    fn test_zero_duration_milestone() {
        let tasks = vec![
            make_task("work", 12, &[]),
            make_task("gate", 0, &["work"]),
        ];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        assert_eq!(timing(&result, "gate"), (12, 12));
        assert!(result.is_critical("work"));
        assert!(result.is_critical("gate"));
    }

    #[test]
    fn test_critical_iff_zero_slack() {
        let tasks = vec![
            make_task("a", 3, &[]),
            make_task("b", 8, &[]),
            make_task("c", 2, &["a"]),
            make_task("d", 4, &["a", "b"]),
            make_task("e", 1, &["c"]),
            make_task("f", 6, &["d"]),
        ];
        let result = calculate_critical_path(&tasks, 0).unwrap();

        for task in &tasks {
            let slack = result.timing(&task.id).unwrap().slack;
            assert!(slack >= 0);
            assert_eq!(result.is_critical(&task.id), slack == 0, "task {}", task.id);
        }
    }

    #[test]
    fn test_two_node_cycle() {
        let tasks = vec![make_task("A", 5, &["B"]), make_task("B", 3, &["A"])];
        let err = calculate_critical_path(&tasks, 0).unwrap_err();

        assert_eq!(
            err,
            SchedulerError::Cycle(CycleError {
                task_ids: vec!["A".to_string(), "B".to_string()],
            })
        );
    }

    #[test]
    fn test_cycle_reports_downstream_tasks() {
        let tasks = vec![
            make_task("root", 1, &[]),
            make_task("x", 1, &["root", "z"]),
            make_task("y", 1, &["x"]),
            make_task("z", 1, &["y"]),
            make_task("after", 1, &["z"]),
        ];
        let err = calculate_critical_path(&tasks, 0).unwrap_err();

        let SchedulerError::Cycle(cycle) = err else {
            panic!("expected cycle error");
        };
        assert_eq!(cycle.task_ids, vec!["x", "y", "z", "after"]);
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![make_task("a", 5, &[]), make_task("a", 3, &[])];
        let err = calculate_critical_path(&tasks, 0).unwrap_err();

        assert_eq!(err, SchedulerError::DuplicateTaskId("a".to_string()));
    }

    #[test]
    fn test_unknown_dependency() {
        let tasks = vec![make_task("B", 5, &["X"])];
        let err = calculate_critical_path(&tasks, 0).unwrap_err();

        assert_eq!(
            err,
            SchedulerError::UnknownDependency {
                task: "B".to_string(),
                dependency: "X".to_string(),
            }
        );
    }
}
