//! Configuration loading and backend factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hirebench_core::traits::TextGenerator;

use crate::gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::questions::QuestionProvider;
use crate::retry::RetryPolicy;

/// Connection settings for the Gemini backend.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API key; may reference an environment variable as `${NAME}`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BackendConfig {
    /// The API key, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Retry settings for backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }
}

/// Limits applied when running candidate code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Wall-clock budget for one call in milliseconds; 0 disables the watchdog.
    pub time_budget_ms: u64,
    pub loop_iteration_limit: u64,
    pub recursion_limit: usize,
    /// Evaluation threads allowed at once, including timed-out ones that
    /// are still running.
    pub max_in_flight: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 5000,
            loop_iteration_limit: 10_000_000,
            recursion_limit: 512,
            max_in_flight: 4,
        }
    }
}

impl EvaluationConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }
}

/// Settings for the proxy server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for non-API paths, with `index.html` as SPA fallback.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            static_dir: PathBuf::from("."),
        }
    }
}

/// Top-level hirebench configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HirebenchConfig {
    pub backend: BackendConfig,
    pub retry: RetryConfig,
    pub evaluation: EvaluationConfig,
    pub server: ServerConfig,
}

impl HirebenchConfig {
    /// Build a backend client, or `None` when no API key is configured.
    pub fn create_generator(&self) -> Result<Option<Arc<dyn TextGenerator>>> {
        let Some(api_key) = self.backend.api_key() else {
            return Ok(None);
        };
        let client = GeminiClient::new(
            api_key,
            Some(self.backend.base_url.clone()),
            Some(self.backend.model.clone()),
            self.backend.timeout_secs,
        )
        .context("failed to create Gemini client")?;
        Ok(Some(Arc::new(client)))
    }

    /// A question provider for this configuration. Without an API key it
    /// serves the fallback sets.
    pub fn question_provider(&self) -> Result<QuestionProvider> {
        Ok(match self.create_generator()? {
            Some(generator) => QuestionProvider::new(generator, self.retry.policy()),
            None => {
                tracing::warn!("no backend API key configured; serving fallback questions");
                QuestionProvider::offline()
            }
        })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `hirebench.toml` in the current directory
/// 2. `~/.config/hirebench/config.toml`
///
/// Environment variable overrides: `GEMINI_API_KEY`, `GEMINI_MODEL`.
pub fn load_config() -> Result<HirebenchConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<HirebenchConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("hirebench.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => HirebenchConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse config TOML and resolve `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<HirebenchConfig> {
    let mut config: HirebenchConfig = toml::from_str(content)?;
    config.backend.api_key = config.backend.api_key.as_deref().map(resolve_env_vars);
    config.backend.base_url = resolve_env_vars(&config.backend.base_url);
    config.backend.model = resolve_env_vars(&config.backend.model);
    Ok(config)
}

fn apply_env_overrides(config: &mut HirebenchConfig) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            config.backend.api_key = Some(key);
        }
    }
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        if !model.is_empty() {
            config.backend.model = model;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hirebench"))
}
