use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AskrError, Result};
use crate::llm::groq::{DEFAULT_MODEL, GROQ_API_BASE, GROQ_API_KEY_ENV, GroqConfig};
use crate::tools::TAVILY_API_KEY_ENV;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub model: ModelConfig,
    pub tools: ToolsConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_API_BASE.to_string(),
            max_tokens: None,
            timeout_ms: 120000,
        }
    }
}

impl ModelConfig {
    pub fn to_groq(&self) -> GroqConfig {
        GroqConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub timeout_ms: u64,
    pub arxiv: ArxivConfig,
    pub wikipedia: WikipediaConfig,
    pub tavily: TavilyConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            arxiv: ArxivConfig::default(),
            wikipedia: WikipediaConfig::default(),
            tavily: TavilyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    pub top_k_results: usize,
    pub doc_content_chars_max: usize,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            top_k_results: 2,
            doc_content_chars_max: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub lang: String,
    pub top_k_results: usize,
    pub doc_content_chars_max: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            top_k_results: 1,
            doc_content_chars_max: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TavilyConfig {
    pub max_results: usize,
    pub content_chars_max: usize,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            content_chars_max: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    pub tick_rate_ms: u64,
    pub scroll_page_size: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            scroll_page_size: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            model: ModelConfig::default(),
            tools: ToolsConfig::default(),
            tui: TuiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load; a broken file there is an error
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AskrError::Configuration(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            AskrError::Configuration(format!("Failed to parse {}: {}", path.as_ref().display(), e))
        })?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// API keys read from the process environment at startup
#[derive(Clone)]
pub struct Secrets {
    pub groq_api_key: String,
    pub tavily_api_key: String,
}

impl Secrets {
    /// Read both keys from the environment; a missing key is fatal
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup` (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AskrError::Configuration(format!("{} not set", name)))
        };

        Ok(Self {
            groq_api_key: required(GROQ_API_KEY_ENV)?,
            tavily_api_key: required(TAVILY_API_KEY_ENV)?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("groq_api_key", &"<redacted>")
            .field("tavily_api_key", &"<redacted>")
            .finish()
    }
}
