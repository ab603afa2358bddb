use crate::application::translate::CompletionSettings;
use crate::domain::error::LingoError;
use crate::domain::traits::ChatCompletion;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::groq::GroqClient;
use crate::infrastructure::network::http::create_client;
use std::sync::Arc;

/// Everything the relay server needs, built once and passed to handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatCompletion>,
    pub completion: CompletionSettings,
}

impl AppState {
    /// Wire the Groq client from configuration
    pub fn new(config: &Config) -> Result<Self, LingoError> {
        let chat = GroqClient::from_config(create_client()?, &config.groq, config.groq_api_key()?);
        Ok(Self::with_chat(config, Arc::new(chat)))
    }

    /// Use an explicit chat-completion backend
    pub fn with_chat(config: &Config, chat: Arc<dyn ChatCompletion>) -> Self {
        Self {
            chat,
            completion: CompletionSettings::from(&config.groq),
        }
    }
}
