use crate::domain::error::LingoError;
use crate::domain::model::{NewTask, Session, Task, TaskPatch};
use crate::domain::traits::{AuthProvider, TaskStore};
use crate::infrastructure::storage::session::{clear_session, save_session};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

// Supabase error bodies use different keys for REST and auth endpoints
#[derive(Deserialize, Debug, Default)]
struct SupabaseErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl SupabaseErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<SupabaseErrorBody>(&text)
        .ok()
        .and_then(SupabaseErrorBody::into_message)
        .unwrap_or_else(|| format!("{} {}", status, text).trim().to_string())
}

/// PostgREST-backed task table
pub struct SupabaseTaskStore {
    client: Client,
    rest_url: String,
    anon_key: String,
    auth: Arc<dyn AuthProvider>,
}

impl SupabaseTaskStore {
    /// Requests carry the signed-in user's token, or the anon key when signed out
    pub fn new(
        client: Client,
        project_url: &str,
        anon_key: impl Into<String>,
        table: &str,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1/{}", project_url.trim_end_matches('/'), table),
            anon_key: anon_key.into(),
            auth,
        }
    }

    fn authorized(&self, builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        let token = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        builder.header("apikey", &self.anon_key).bearer_auth(token)
    }

    /// Send once; if the user's token is rejected, refresh the session and retry
    async fn send<F>(&self, build: F) -> Result<Response, LingoError>
    where
        F: Fn() -> RequestBuilder + Send,
    {
        let session = self.auth.session();
        let response = self.authorized(build(), session.as_ref()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED || session.is_none() {
            return Ok(response);
        }

        info!("Access token rejected, refreshing session");
        let refreshed = self.auth.refresh().await?;
        Ok(self.authorized(build(), Some(&refreshed)).send().await?)
    }

    fn filters(id: Option<&str>, owner: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = id {
            query.push(("id", format!("eq.{}", id)));
        }
        if let Some(uid) = owner {
            query.push(("user_id", format!("eq.{}", uid)));
        }
        query
    }

    async fn rows(response: Response) -> Result<Vec<Task>, LingoError> {
        if !response.status().is_success() {
            return Err(LingoError::Api(error_message(response).await));
        }
        Ok(response.json::<Vec<Task>>().await?)
    }
}

#[async_trait]
impl TaskStore for SupabaseTaskStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Task>, LingoError> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        query.extend(Self::filters(None, owner));

        let response = self
            .send(|| self.client.get(&self.rest_url).query(&query))
            .await?;
        let tasks = Self::rows(response).await?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, LingoError> {
        let response = self
            .send(|| {
                self.client
                    .post(&self.rest_url)
                    .header("Prefer", "return=representation")
                    .json(&task)
            })
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LingoError::Api("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        id: &str,
        patch: &TaskPatch,
        owner: Option<&str>,
    ) -> Result<Option<Task>, LingoError> {
        let query = Self::filters(Some(id), owner);
        let response = self
            .send(|| {
                self.client
                    .patch(&self.rest_url)
                    .header("Prefer", "return=representation")
                    .query(&query)
                    .json(patch)
            })
            .await?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn delete(&self, id: &str, owner: Option<&str>) -> Result<(), LingoError> {
        let query = Self::filters(Some(id), owner);
        let response = self
            .send(|| self.client.delete(&self.rest_url).query(&query))
            .await?;
        if !response.status().is_success() {
            return Err(LingoError::Api(error_message(response).await));
        }
        Ok(())
    }
}

/// GoTrue email/password auth with change notification
pub struct SupabaseAuth {
    client: Client,
    auth_url: String,
    anon_key: String,
    state: watch::Sender<Option<Session>>,
    session_path: Option<PathBuf>,
}

impl SupabaseAuth {
    pub fn new(client: Client, project_url: &str, anon_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            client,
            auth_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
            state,
            session_path: None,
        }
    }

    /// Start from a previously saved session
    pub fn with_session(self, session: Option<Session>) -> Self {
        self.state.send_replace(session);
        self
    }

    /// Write refreshed sessions to `path`, and remove it when a refresh is rejected
    pub fn persist_to(mut self, path: PathBuf) -> Self {
        self.session_path = Some(path);
        self
    }

    /// Refresh the current session if its access token has expired
    pub async fn refresh_if_expired(&self) -> Result<(), LingoError> {
        match self.session() {
            Some(session) if session.is_expired(Utc::now()) => {
                debug!(user = %session.user.id, "saved session expired");
                self.refresh().await.map(|_| ())
            }
            _ => Ok(()),
        }
    }

    // GoTrue may omit `expires_at`; derive it from `expires_in`
    fn parse_session(mut body: Value) -> Result<Session, LingoError> {
        if body.get("expires_at").is_none() {
            let expires_in = body.get("expires_in").and_then(Value::as_i64);
            if let (Some(secs), Some(fields)) = (expires_in, body.as_object_mut()) {
                fields.insert("expires_at".into(), json!(Utc::now().timestamp() + secs));
            }
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn persist(&self, session: Option<&Session>) -> Result<(), LingoError> {
        match (&self.session_path, session) {
            (Some(path), Some(session)) => save_session(path, session).await,
            (Some(path), None) => clear_session(path).await,
            (None, _) => Ok(()),
        }
    }

    async fn request_session(
        &self,
        builder: RequestBuilder,
        email: &str,
        password: &str,
    ) -> Result<Session, LingoError> {
        let response = builder
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LingoError::Auth(error_message(response).await));
        }

        let body = response.json::<Value>().await?;
        if body.get("access_token").is_none() {
            // sign-up with email confirmation enabled returns only the user
            return Err(LingoError::Auth(
                "Check your email to confirm the account, then sign in".to_string(),
            ));
        }
        let session = Self::parse_session(body)?;
        info!(user = %session.user.id, "signed in");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, LingoError> {
        let builder = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")]);
        self.request_session(builder, email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, LingoError> {
        let builder = self.client.post(format!("{}/signup", self.auth_url));
        self.request_session(builder, email, password).await
    }

    async fn sign_out(&self) -> Result<(), LingoError> {
        let Some(session) = self.session() else {
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        // Local sign-out happens even if the server call fails
        self.state.send_replace(None);
        info!(user = %session.user.id, "signed out");

        let response = response?;
        if !response.status().is_success() {
            return Err(LingoError::Auth(error_message(response).await));
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<Session, LingoError> {
        let refresh_token = self
            .session()
            .and_then(|s| s.refresh_token)
            .ok_or_else(|| LingoError::Auth("Session expired, sign in again".to_string()))?;

        let response = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            if status.is_client_error() {
                // The refresh token is no longer valid; the session is over
                warn!("Session refresh rejected: {}", message);
                self.state.send_replace(None);
                self.persist(None).await?;
            }
            return Err(LingoError::Auth(message));
        }

        let session = Self::parse_session(response.json::<Value>().await?)?;
        info!(user = %session.user.id, "session refreshed");
        self.state.send_replace(Some(session.clone()));
        self.persist(Some(&session)).await?;
        Ok(session)
    }

    fn session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}
