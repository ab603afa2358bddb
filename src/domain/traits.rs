use crate::domain::error::LingoError;
use crate::domain::model::{ChatRequest, NewTask, Session, Task, TaskPatch};
use async_trait::async_trait;
use tokio::sync::watch;

/// Trait for chat-completion providers
///
/// Returns the raw provider body so the relay can tell an unusable answer
/// apart from a transport failure.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<serde_json::Value, LingoError>;
}

/// Trait for translation services used by the client side
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the language identified by `target`
    async fn translate(&self, text: &str, target: &str) -> Result<String, LingoError>;
}

/// Trait for task persistence
///
/// `owner` restricts the operation to rows whose `user_id` matches. Ids that
/// match nothing are not an error.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List tasks, most recent first
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Task>, LingoError>;

    async fn insert(&self, task: NewTask) -> Result<Task, LingoError>;

    async fn update(
        &self,
        id: &str,
        patch: &TaskPatch,
        owner: Option<&str>,
    ) -> Result<Option<Task>, LingoError>;

    async fn delete(&self, id: &str, owner: Option<&str>) -> Result<(), LingoError>;
}

/// Trait for session-based authentication
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, LingoError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, LingoError>;

    async fn sign_out(&self) -> Result<(), LingoError>;

    /// Exchange the refresh token for a new access token
    async fn refresh(&self) -> Result<Session, LingoError>;

    /// Current session, if signed in
    fn session(&self) -> Option<Session>;

    /// Receive auth-state changes
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}
