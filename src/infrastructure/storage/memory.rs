// In-memory task store using DashMap
use crate::domain::error::LingoError;
use crate::domain::model::{NewTask, Task, TaskPatch};
use crate::domain::traits::TaskStore;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// Thread-safe in-process task table
///
/// Used with `--memory` and in tests.
#[derive(Default)]
pub struct MemoryTaskStore {
    map: DashMap<String, Task>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.map.get(id).map(|entry| entry.value().clone())
    }
}

fn owned_by(task: &Task, owner: Option<&str>) -> bool {
    match owner {
        Some(uid) => task.user_id.as_deref() == Some(uid),
        None => true,
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Task>, LingoError> {
        let mut tasks: Vec<Task> = self
            .map
            .iter()
            .filter(|entry| owned_by(entry.value(), owner))
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, LingoError> {
        let row = Task {
            id: Uuid::new_v4().to_string(),
            task: task.task,
            is_complete: false,
            translation: None,
            created_at: Utc::now(),
            user_id: task.user_id,
        };
        self.map.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: &str,
        patch: &TaskPatch,
        owner: Option<&str>,
    ) -> Result<Option<Task>, LingoError> {
        match self.map.get_mut(id) {
            Some(mut entry) if owned_by(entry.value(), owner) => {
                patch.apply_to(entry.value_mut());
                Ok(Some(entry.value().clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: &str, owner: Option<&str>) -> Result<(), LingoError> {
        self.map.remove_if(id, |_, task| owned_by(task, owner));
        Ok(())
    }
}
