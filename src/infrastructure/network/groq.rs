use crate::domain::error::LingoError;
use crate::domain::model::ChatRequest;
use crate::domain::traits::ChatCompletion;
use crate::infrastructure::config::GroqConfig;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Groq (OpenAI-compatible) chat-completions client
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &GroqConfig, api_key: &str) -> Self {
        Self::new(client, config.base_url.clone(), api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<serde_json::Value, LingoError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        // Error statuses still carry a JSON body; the caller decides what is usable.
        let status = response.status();
        let body = response.json::<serde_json::Value>().await?;
        debug!(%status, model = %request.model, "chat completion returned");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ChatMessage;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn posts_bearer_authenticated_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "temperature": 0.3,
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"hi"}}]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(Client::new(), format!("{}/", server.url()), "gsk_test");
        let body = client.complete(&request()).await.unwrap();

        assert_eq!(body["choices"][0]["message"]["content"], "hi");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_body_is_returned() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let client = GroqClient::new(Client::new(), server.url(), "bad");
        let body = client.complete(&request()).await.unwrap();
        assert!(body.get("choices").is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = GroqClient::new(Client::new(), server.url(), "k");
        assert!(matches!(
            client.complete(&request()).await,
            Err(LingoError::Http(_))
        ));
    }
}
