use crate::domain::error::RelayError;
use crate::domain::model::{ChatMessage, ChatRequest, TranslateRequest};
use crate::domain::traits::ChatCompletion;
use crate::infrastructure::config::GroqConfig;
use serde_json::Value;
use tracing::{error, warn};

pub const SYSTEM_PROMPT: &str = "You are a helpful translation assistant.";

/// Model parameters for the outbound completion
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
}

impl From<&GroqConfig> for CompletionSettings {
    fn from(config: &GroqConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        (&GroqConfig::default()).into()
    }
}

/// The instruction sent to the model; `text` and `target` appear verbatim.
pub fn build_prompt(text: &str, target: &str) -> String {
    format!(
        "Translate the following task from English to {}:\n\n\"{}\"\n\nJust return the translated sentence, nothing else.",
        target, text
    )
}

pub fn build_request(settings: &CompletionSettings, text: &str, target: &str) -> ChatRequest {
    ChatRequest {
        model: settings.model.clone(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(text, target)),
        ],
        temperature: settings.temperature,
    }
}

/// `choices[0].message.content`, trimmed; `None` when absent or blank
pub fn extract_translation(body: &Value) -> Option<String> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Falsy JSON values (`null`, `false`, `0`, `""`) count as missing
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON value the way it reads when interpolated into text
fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn required(field: Option<Value>) -> Option<String> {
    field.filter(is_truthy).map(|v| to_text(&v))
}

/// Validate, forward to the provider once, and relay the answer
pub async fn relay_translation(
    chat: &dyn ChatCompletion,
    settings: &CompletionSettings,
    request: TranslateRequest,
) -> Result<String, RelayError> {
    let (Some(text), Some(target)) = (required(request.text), required(request.target)) else {
        warn!("Rejected translation request without text or target");
        return Err(RelayError::MissingInput);
    };

    let body = chat
        .complete(&build_request(settings, &text, &target))
        .await
        .map_err(|e| {
            error!("Groq translation error: {}", e);
            RelayError::Internal(e)
        })?;

    match extract_translation(&body) {
        Some(translated) => Ok(translated),
        None => {
            error!("Groq API returned invalid response: {}", body);
            Err(RelayError::InvalidUpstream)
        }
    }
}
