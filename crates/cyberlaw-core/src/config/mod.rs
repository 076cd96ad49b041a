use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{defaults, endpoints, models, storage};
use crate::error::BotError;
use crate::llm::{GeminiClient, RetryPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    /// Name of the environment variable holding the API credential.
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    /// Overrides the key-value file location.
    pub path: Option<PathBuf>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: endpoints::GEMINI_BASE_URL.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            base_delay_ms: defaults::BASE_DELAY_MS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(storage::APP_DIR)
            .join(storage::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring unparsable config {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("Failed to read config {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), BotError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), BotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| BotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable named in settings.
    /// Empty values count as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Location of the durable key-value file.
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(storage::APP_DIR)
                .join(storage::STORAGE_FILE)
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
        }
    }

    /// Build the Gemini client. A missing credential is not an error here;
    /// it surfaces on the first fetch.
    pub fn build_llm_client(&self) -> GeminiClient {
        GeminiClient::new(self.api_key())
            .with_model(&self.llm.model)
            .with_base_url(&self.llm.base_url)
            .with_timeout(Duration::from_secs(self.llm.timeout_secs))
    }
}
