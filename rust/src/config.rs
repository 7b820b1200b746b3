//! Configuration types for the simulation engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Name of the synthetic phase used when the manifest has no boundaries.
pub const DEFAULT_PHASE_NAME: &str = "All Tasks";

/// Configuration for one simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Largest accepted task count.
    pub max_tasks: usize,
    /// Largest accepted dependency edge count.
    pub max_edges: usize,
    /// Name of the single phase used when no boundaries exist.
    pub default_phase_name: String,
    /// Id prefixes marking quality-assurance tasks (matched case-insensitively).
    pub quality_gate_prefixes: Vec<String>,
    /// Wall-clock time at minute zero. When set, timeline entries carry
    /// projected start and finish times.
    pub anchor: Option<NaiveDateTime>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            max_tasks: 10_000,
            max_edges: 100_000,
            default_phase_name: DEFAULT_PHASE_NAME.to_string(),
            quality_gate_prefixes: vec!["qa-".to_string(), "qa_".to_string(), "quality-".to_string()],
            anchor: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether a task id follows the quality-assurance naming convention.
    ///
    /// A bare prefix stem (`qa` for `qa-`) also matches.
    pub fn is_quality_gate_id(&self, task_id: &str) -> bool {
        let id = task_id.to_ascii_lowercase();
        self.quality_gate_prefixes.iter().any(|prefix| {
            let prefix = prefix.to_ascii_lowercase();
            let stem = prefix.trim_end_matches(['-', '_']);
            id.starts_with(&prefix) || (!stem.is_empty() && id == stem)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.max_tasks, 10_000);
        assert_eq!(config.max_edges, 100_000);
        assert_eq!(config.default_phase_name, "All Tasks");
        assert!(config.anchor.is_none());
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let config = SimulationConfig::from_json(r#"{"maxTasks": 50, "verbosity": 2}"#).unwrap();
        assert_eq!(config.max_tasks, 50);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.max_edges, 100_000);
        assert_eq!(config.quality_gate_prefixes.len(), 3);
    }

    #[test]
    fn test_from_json_parses_anchor() {
        let config = SimulationConfig::from_json(r#"{"anchor": "2025-03-01T09:00:00"}"#).unwrap();
        let anchor = config.anchor.unwrap();
        assert_eq!(anchor.to_string(), "2025-03-01 09:00:00");
    }

    #[test]
    fn test_quality_gate_id_matching() {
        let config = SimulationConfig::default();
        assert!(config.is_quality_gate_id("qa-review"));
        assert!(config.is_quality_gate_id("QA_final"));
        assert!(config.is_quality_gate_id("quality-audit"));
        assert!(config.is_quality_gate_id("qa"));
        assert!(!config.is_quality_gate_id("quasar"));
        assert!(!config.is_quality_gate_id("build-qa"));
    }
}
