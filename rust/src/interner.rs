//! Dense task indexing.
//!
//! Maps task id strings to integer slots in manifest order so the graph passes
//! can use flat vectors instead of string-keyed maps.

use rustc_hash::FxHashMap;

use crate::models::TaskSpec;

/// Manifest slot of a task (u32 for compact storage and fast hashing).
pub type TaskIdx = u32;

/// Bidirectional id <-> slot mapping. Slots follow first declaration order.
#[derive(Debug, Clone)]
pub struct TaskIndex {
    to_idx: FxHashMap<String, TaskIdx>,
    ids: Vec<String>,
}

impl TaskIndex {
    /// Create an empty index with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Index every task id in manifest order.
    ///
    /// Returns the first repeated id as the error.
    pub fn from_tasks(tasks: &[TaskSpec]) -> Result<Self, String> {
        let mut index = Self::with_capacity(tasks.len());
        for task in tasks {
            index.insert(&task.id).map_err(|_| task.id.clone())?;
        }
        Ok(index)
    }

    /// Assign the next slot to `id`.
    ///
    /// Returns `Err(existing)` when the id was already indexed.
    pub fn insert(&mut self, id: &str) -> Result<TaskIdx, TaskIdx> {
        if let Some(&existing) = self.to_idx.get(id) {
            return Err(existing);
        }
        let idx = self.ids.len() as TaskIdx;
        self.ids.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Ok(idx)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> Option<&str> {
        self.ids.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for TaskIndex {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
