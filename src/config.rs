/// Engine configuration, loaded from RON.
///
/// Every section and field has a default, so a config file only needs
/// to name what it changes:
///
/// ```ron
/// (
///     probe: (max_attempts: 3),
///     image: (width: 1024, height: 1024),
/// )
/// ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Where and how illustrations are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Prompt-rendering endpoint; the encoded prompt is appended.
    pub base_url: String,
    pub width: u32,
    pub height: u32,
    /// Renderer selection passed as the `model` query parameter.
    pub model: String,
    /// Placeholder image service used when the renderer is unreachable.
    pub placeholder_base: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://image.pollinations.ai/prompt/".to_string(),
            width: 800,
            height: 1000,
            model: "flux".to_string(),
            placeholder_base: "https://placehold.co".to_string(),
        }
    }
}

/// Reachability checks against the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub max_attempts: u32,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    /// Delay after failed attempt n is `n * backoff_step_ms`.
    pub backoff_step_ms: u64,
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout_ms: 3_500,
            backoff_step_ms: 150,
            user_agent: concat!("storybook-engine/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The external text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Language passages are translated into by `translate_pages`.
    pub target_language: String,
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 60,
            target_language: "English".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorybookConfig {
    pub image: ImageConfig,
    pub probe: ProbeConfig,
    pub generator: GeneratorConfig,
}

impl StorybookConfig {
    /// Load configuration from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse configuration from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}
