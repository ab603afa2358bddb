use crate::domain::error::LingoError;
use crate::domain::model::{ErrorBody, TranslateRequest, TranslateResponse};
use crate::domain::traits::Translator;
use async_trait::async_trait;
use reqwest::Client;

/// Client side of the translation relay (`POST /api/translate`)
pub struct RelayTranslator {
    client: Client,
    base_url: String,
}

impl RelayTranslator {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for RelayTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, LingoError> {
        let body = TranslateRequest::new(text, target);

        let response = self
            .client
            .post(format!("{}/api/translate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let data = response.json::<TranslateResponse>().await?;
            return Ok(data.translated_text);
        }

        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(err) => err.error,
            Err(_) => status.to_string(),
        };
        Err(LingoError::Translation(message))
    }
}
