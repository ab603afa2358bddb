//! Translation relay HTTP server

use crate::application::translate::relay_translation;
use crate::domain::error::{LingoError, RelayError};
use crate::domain::model::{ErrorBody, TranslateRequest, TranslateResponse};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingInput => StatusCode::BAD_REQUEST,
            RelayError::InvalidUpstream => StatusCode::BAD_GATEWAY,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Read the JSON body; a body that is not JSON, or is `null`, is an internal
/// error, and any non-object value carries no fields.
fn parse_request(body: &[u8]) -> Result<TranslateRequest, LingoError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Null => Err(LingoError::Api("request body is null".to_string())),
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(TranslateRequest::default()),
    }
}

/// `POST /api/translate`
///
/// The body is parsed by hand so that an unreadable payload is reported as
/// an internal error rather than an extractor rejection.
async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, RelayError> {
    let request = parse_request(&body).map_err(|e| {
        error!("Groq translation error: {}", e);
        RelayError::Internal(e)
    })?;

    let translated_text = relay_translation(state.chat.as_ref(), &state.completion, request).await?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// Bind and serve until `shutdown` resolves
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Translation relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Translation relay stopped");
    Ok(())
}
