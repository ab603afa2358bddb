use crate::domain::error::LingoError;
use crate::domain::model::{NewTask, Session, Task, TaskPatch, TaskScope};
use crate::domain::traits::{TaskStore, Translator};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Client-side task flows: CRUD against the store plus translate-and-save
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    translator: Arc<dyn Translator>,
    scope: TaskScope,
    sessions: watch::Receiver<Option<Session>>,
}

impl TaskService {
    pub fn new(
        store: Arc<dyn TaskStore>,
        translator: Arc<dyn Translator>,
        scope: TaskScope,
        sessions: watch::Receiver<Option<Session>>,
    ) -> Self {
        Self {
            store,
            translator,
            scope,
            sessions,
        }
    }

    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    // Owner filter for the current scope; per-user scope needs a session
    fn owner(&self) -> Result<Option<String>, LingoError> {
        match self.scope {
            TaskScope::Shared => Ok(None),
            TaskScope::PerUser => self
                .sessions
                .borrow()
                .as_ref()
                .map(|s| Some(s.user.id.clone()))
                .ok_or_else(|| LingoError::Auth("Not signed in".to_string())),
        }
    }

    /// All visible tasks, most recent first
    pub async fn fetch(&self) -> Result<Vec<Task>, LingoError> {
        let owner = self.owner()?;
        self.store.list(owner.as_deref()).await
    }

    pub async fn find(&self, id: &str) -> Result<Task, LingoError> {
        self.fetch()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| LingoError::NotFound(id.to_string()))
    }

    /// Insert a trimmed task; blank input is ignored
    pub async fn add(&self, text: &str) -> Result<Option<Task>, LingoError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let owner = self.owner()?;
        let task = self
            .store
            .insert(NewTask {
                task: text.to_string(),
                user_id: owner,
            })
            .await?;
        debug!(id = %task.id, "task added");
        Ok(Some(task))
    }

    pub async fn toggle(&self, id: &str) -> Result<Task, LingoError> {
        let current = self.find(id).await?;
        let owner = self.owner()?;
        self.store
            .update(id, &TaskPatch::complete(!current.is_complete), owner.as_deref())
            .await?
            .ok_or_else(|| LingoError::NotFound(id.to_string()))
    }

    /// Replace the task text; blank input is ignored
    pub async fn edit(&self, id: &str, text: &str) -> Result<Option<Task>, LingoError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let owner = self.owner()?;
        self.store
            .update(id, &TaskPatch::text(text), owner.as_deref())
            .await?
            .map(Some)
            .ok_or_else(|| LingoError::NotFound(id.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<(), LingoError> {
        let owner = self.owner()?;
        self.store.delete(id, owner.as_deref()).await
    }

    /// Translate a task through the relay and store the result.
    /// On failure the task is left as it was.
    pub async fn translate(&self, id: &str, target: &str) -> Result<Task, LingoError> {
        let task = self.find(id).await?;
        let translated = match self.translator.translate(&task.task, target).await {
            Ok(text) => text,
            Err(e) => {
                warn!(id = %id, target = %target, "Translation error: {}", e);
                return Err(e);
            }
        };

        let owner = self.owner()?;
        self.store
            .update(id, &TaskPatch::translation(translated), owner.as_deref())
            .await?
            .ok_or_else(|| LingoError::NotFound(id.to_string()))
    }
}
