//! Configuration schema for Blogsmith.

use serde::{Deserialize, Serialize};

/// Root config for the Blogsmith service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogsmithConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl BlogsmithConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> BlogsmithConfigBuilder {
        BlogsmithConfigBuilder::new()
    }
}

/// Builder for assembling a `BlogsmithConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct BlogsmithConfigBuilder {
    config: BlogsmithConfig,
}

impl BlogsmithConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: BlogsmithConfig::default(),
        }
    }

    /// Replace the generation configuration.
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Replace the history persistence configuration.
    pub fn history(mut self, history: HistoryConfig) -> Self {
        self.config.history = history;
        self
    }

    /// Replace the signed-in session configuration.
    pub fn session(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    /// Finalize and return the built `BlogsmithConfig`.
    pub fn build(self) -> BlogsmithConfig {
        self.config
    }
}

/// Backend used for text generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    Google,
    OpenAI,
}

impl LlmProviderKind {
    /// Environment variable consulted for the API key when none is configured.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            LlmProviderKind::Google => "GOOGLE_API_KEY",
            LlmProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Generation model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: LlmProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    /// Overrides the provider's default API key variable.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            model: default_model(),
            api_key_env: None,
            system_prompt: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl GenerationConfig {
    /// Name of the environment variable holding the API key.
    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    64
}

fn default_max_output_tokens() -> u32 {
    8192
}

/// Persistence backend for content history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryProviderKind {
    /// JSONL documents on disk.
    #[default]
    File,
    /// Process-local storage, lost on exit.
    Memory,
}

impl HistoryProviderKind {
    /// Whether saved records outlive the process that wrote them.
    pub fn persists_across_runs(&self) -> bool {
        matches!(self, HistoryProviderKind::File)
    }
}

/// History persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    #[serde(default)]
    pub provider: HistoryProviderKind,
    /// Root directory for the file provider (defaults to `~/.blogsmith/history`).
    #[serde(default)]
    pub path: Option<String>,
}

/// Signed-in identity persistence used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Session file path (defaults to `~/.blogsmith/session.json`).
    #[serde(default)]
    pub path: Option<String>,
}
