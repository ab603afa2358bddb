use crate::domain::error::LingoError;
use crate::domain::model::{TaskScope, DEFAULT_TARGET};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    #[serde(default = "default_target_lang")]
    pub default_lang: String,
    #[serde(default)]
    pub scope: TaskScope,
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub groq: GroqConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Logging {
    /// tracing filter directive for the configured level name
    pub fn filter_level(&self) -> &'static str {
        match self.level.as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_groq_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: default_table(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            enable_emoji: true,
            default_lang: default_target_lang(),
            scope: TaskScope::default(),
            relay_url: default_relay_url(),
            logging: Logging::default(),
            server: ServerConfig::default(),
            groq: GroqConfig::default(),
            supabase: SupabaseConfig::default(),
        }
    }
}

// Defaults
fn default_theme() -> String {
    "temp".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_target_lang() -> String {
    DEFAULT_TARGET.to_string()
}
fn default_relay_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "INFO".to_string()
}
fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
fn default_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_table() -> String {
    "todos".to_string()
}

impl Config {
    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GROQ_API_KEY") {
            self.groq.api_key = Some(key);
        }
        if let Some(url) = get("SUPABASE_URL").or_else(|| get("NEXT_PUBLIC_SUPABASE_URL")) {
            self.supabase.url = Some(url);
        }
        if let Some(key) =
            get("SUPABASE_ANON_KEY").or_else(|| get("NEXT_PUBLIC_SUPABASE_ANON_KEY"))
        {
            self.supabase.anon_key = Some(key);
        }
        if let Some(url) = get("TASK_LINGO_RELAY_URL") {
            self.relay_url = url;
        }
    }

    pub fn groq_api_key(&self) -> Result<&str, LingoError> {
        self.groq
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LingoError::Config("Groq API key not configured".to_string()))
    }

    /// Supabase project URL and anon key, both required
    pub fn supabase_credentials(&self) -> Result<(&str, &str), LingoError> {
        let url = self
            .supabase
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| LingoError::Config("Supabase URL not configured".to_string()))?;
        let key = self
            .supabase
            .anon_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LingoError::Config("Supabase anon key not configured".to_string()))?;
        Ok((url, key))
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("task-lingo").join("config.toml"))
}

/// Where the CLI keeps the signed-in session between runs
pub fn get_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("task-lingo")
        .join("session.json")
}

pub fn load_config() -> Result<Config, LingoError> {
    let mut config = match get_config_path() {
        Some(path) if path.exists() => load_config_from(&path)?,
        _ => Config::default(),
    };
    config.apply_env();
    Ok(config)
}

/// Parse a config file, falling back to defaults when it is malformed
pub fn load_config_from(path: &Path) -> Result<Config, LingoError> {
    let content = fs::read_to_string(path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse config file: {}. Using defaults.",
                e
            );
            Ok(Config::default())
        }
    }
}

pub fn generate_config_sample() -> Result<(), LingoError> {
    let path = get_config_path()
        .ok_or_else(|| LingoError::Config("Cannot determine config directory".to_string()))?;

    if write_config_sample(&path)? {
        println!("Generated config file at: {}", path.display());
    } else {
        eprintln!("Config file already exists at: {}", path.display());
    }
    Ok(())
}

/// Write the default config to `path`; returns false if a file is already there
pub fn write_config_sample(path: &Path) -> Result<bool, LingoError> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let sample = Config::default();
    let toml_content = toml::to_string_pretty(&sample)
        .map_err(|e| LingoError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, toml_content)
        .map_err(|e| LingoError::Config(format!("Failed to write config file: {}", e)))?;
    Ok(true)
}
