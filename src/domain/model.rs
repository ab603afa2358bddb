use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// 待办事项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub is_complete: bool,
    pub translation: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

// 新建待办的请求体
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTask {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

// 部分更新，只发送存在的字段
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl TaskPatch {
    pub fn text(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            ..Self::default()
        }
    }

    pub fn complete(is_complete: bool) -> Self {
        Self {
            is_complete: Some(is_complete),
            ..Self::default()
        }
    }

    pub fn translation(translation: impl Into<String>) -> Self {
        Self {
            translation: Some(translation.into()),
            ..Self::default()
        }
    }

    /// Apply the present fields to an existing task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(text) = &self.task {
            task.task = text.clone();
        }
        if let Some(done) = self.is_complete {
            task.is_complete = done;
        }
        if let Some(translation) = &self.translation {
            task.translation = Some(translation.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

// 登录会话
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds at which `access_token` stops being accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    // 提前一分钟视为过期
    const EXPIRY_MARGIN_SECS: i64 = 60;

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now.timestamp() + Self::EXPIRY_MARGIN_SECS)
    }
}

/// Whether tasks are shared by everyone or owned by the signed-in user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    Shared,
    #[default]
    PerUser,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Language {
    pub label: &'static str,
    pub code: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { label: "Spanish", code: "es" },
    Language { label: "French", code: "fr" },
    Language { label: "Hindi", code: "hi" },
    Language { label: "German", code: "de" },
    Language { label: "Japanese", code: "ja" },
];

pub const DEFAULT_TARGET: &str = "es";

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|lang| lang.code == code)
}

// 翻译请求：字段保留原始 JSON 值，由中继按真值规则校验
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
    #[serde(default)]
    pub target: Option<serde_json::Value>,
}

impl TranslateRequest {
    pub fn new(text: &str, target: &str) -> Self {
        Self {
            text: Some(text.into()),
            target: Some(target.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Chat completions 请求体 (OpenAI 兼容)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

// PostgREST 的 id 可能是 uuid 字符串也可能是 bigint
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_accepts_numeric_ids() {
        let task: Task = serde_json::from_str(
            r#"{"id":42,"task":"Buy milk","is_complete":false,"translation":null,"created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.id, "42");
        assert!(task.translation.is_none());
        assert!(task.user_id.is_none());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let json = serde_json::to_value(TaskPatch::complete(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "is_complete": true }));
    }

    #[test]
    fn translate_response_uses_camel_case() {
        let json = serde_json::to_value(TranslateResponse {
            translated_text: "Comprar leche".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "translatedText": "Comprar leche" }));
    }

    #[test]
    fn scope_defaults_to_per_user() {
        assert_eq!(TaskScope::default(), TaskScope::PerUser);
        let scope: TaskScope = serde_json::from_str("\"shared\"").unwrap();
        assert_eq!(scope, TaskScope::Shared);
    }

    #[test]
    fn language_lookup() {
        assert_eq!(find_language("ja").map(|l| l.label), Some("Japanese"));
        assert!(find_language("xx").is_none());
        assert!(find_language(DEFAULT_TARGET).is_some());
    }

    #[test]
    fn session_expiry() {
        let mut session: Session = serde_json::from_str(
            r#"{"access_token":"jwt","refresh_token":"r1","expires_at":1714557600,"user":{"id":"u1"}}"#,
        )
        .unwrap();
        let issued = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();

        assert!(!session.is_expired(issued));
        assert!(session.is_expired(later));

        session.expires_at = None;
        assert!(!session.is_expired(later));
    }
}
