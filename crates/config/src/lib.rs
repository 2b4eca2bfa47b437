//! Configuration loading, validation, and management for Newsdesk.
//!
//! Loads configuration from `newsdesk.toml` in the working directory, falling
//! back to `~/.newsdesk/config.toml`, with environment variable overrides.
//! Validates all settings at load time — in particular the recency tier
//! table, whose weights must strictly decrease.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `newsdesk.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content tree layout
    #[serde(default)]
    pub content: ContentConfig,

    /// Recency tier table for temporal weighting
    #[serde(default)]
    pub temporal: TemporalConfig,

    /// Context assembly budgets
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

/// Where the content tree lives and how it is laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root of the content tree (briefings, posts, knowledge base, output).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Briefing directory name under the root.
    #[serde(default = "default_research_dir")]
    pub research_dir: String,

    /// Published digest directory name under the root.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,

    /// Knowledge base directory name under the root.
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: String,

    /// Snapshot inbox directory name under the root.
    #[serde(default = "default_inbox_dir")]
    pub inbox_dir: String,

    /// Output directory name under the root (context bundles, prompts).
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_research_dir() -> String {
    "research".into()
}
fn default_posts_dir() -> String {
    "posts".into()
}
fn default_knowledge_dir() -> String {
    "knowledge_base".into()
}
fn default_inbox_dir() -> String {
    "inbox".into()
}
fn default_output_dir() -> String {
    "output".into()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            research_dir: default_research_dir(),
            posts_dir: default_posts_dir(),
            knowledge_dir: default_knowledge_dir(),
            inbox_dir: default_inbox_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl ContentConfig {
    pub fn research_path(&self) -> PathBuf {
        self.root.join(&self.research_dir)
    }
    pub fn posts_path(&self) -> PathBuf {
        self.root.join(&self.posts_dir)
    }
    pub fn knowledge_path(&self) -> PathBuf {
        self.root.join(&self.knowledge_dir)
    }
    pub fn inbox_path(&self) -> PathBuf {
        self.root.join(&self.inbox_dir)
    }
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }
}

/// The recency tier table.
///
/// `boundaries_days` are inclusive upper bounds on item age; `weights` has
/// one more element than `boundaries_days` — the final weight is the clamp
/// applied to everything older than the last boundary. `max_items` optionally
/// caps how many items each tier contributes (0 = uncapped); empty means no
/// caps at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    #[serde(default = "default_boundaries")]
    pub boundaries_days: Vec<i64>,

    #[serde(default = "default_weights")]
    pub weights: Vec<f32>,

    #[serde(default)]
    pub max_items: Vec<usize>,
}

fn default_boundaries() -> Vec<i64> {
    vec![7, 30]
}
fn default_weights() -> Vec<f32> {
    vec![1.0, 0.5, 0.25]
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            boundaries_days: default_boundaries(),
            weights: default_weights(),
            max_items: vec![],
        }
    }
}

/// Token budgets for context assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Total token budget for an assembled bundle.
    #[serde(default = "default_budget_tokens")]
    pub budget_tokens: usize,

    /// Optional cap on the weighted-history section.
    #[serde(default)]
    pub history_tokens: Option<usize>,

    /// Optional cap on the knowledge section.
    #[serde(default)]
    pub knowledge_tokens: Option<usize>,

    /// How many knowledge base matches to retrieve per run.
    #[serde(default = "default_knowledge_limit")]
    pub knowledge_limit: usize,
}

fn default_budget_tokens() -> usize {
    4096
}
fn default_knowledge_limit() -> usize {
    5
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            budget_tokens: default_budget_tokens(),
            history_tokens: None,
            knowledge_tokens: None,
            knowledge_limit: default_knowledge_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default locations.
    ///
    /// Looks for `newsdesk.toml` in the working directory first, then
    /// `~/.newsdesk/config.toml`. Environment overrides:
    /// - `NEWSDESK_CONTENT_DIR` — overrides `content.root`
    pub fn load() -> Result<Self, ConfigError> {
        let local = PathBuf::from("newsdesk.toml");
        let path = if local.exists() {
            local
        } else {
            Self::config_dir().join("config.toml")
        };
        let mut config = Self::load_from(&path)?;

        if let Ok(root) = std::env::var("NEWSDESK_CONTENT_DIR") {
            config.content.root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".newsdesk")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.temporal;

        if t.weights.len() != t.boundaries_days.len() + 1 {
            return Err(ConfigError::ValidationError(format!(
                "temporal.weights must have exactly one more entry than \
                 temporal.boundaries_days ({} boundaries, {} weights)",
                t.boundaries_days.len(),
                t.weights.len()
            )));
        }

        if !t.boundaries_days.windows(2).all(|w| w[0] < w[1])
            || t.boundaries_days.iter().any(|&b| b <= 0)
        {
            return Err(ConfigError::ValidationError(
                "temporal.boundaries_days must be positive and strictly increasing".into(),
            ));
        }

        if !t.weights.windows(2).all(|w| w[0] > w[1]) {
            return Err(ConfigError::ValidationError(
                "temporal.weights must strictly decrease with tier age".into(),
            ));
        }

        if t.weights.iter().any(|&w| w <= 0.0 || w > 1.0) {
            return Err(ConfigError::ValidationError(
                "temporal.weights must lie in (0, 1]".into(),
            ));
        }

        if !t.max_items.is_empty() && t.max_items.len() != t.weights.len() {
            return Err(ConfigError::ValidationError(
                "temporal.max_items must be empty or match temporal.weights in length".into(),
            ));
        }

        if self.assembly.budget_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "assembly.budget_tokens must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            temporal: TemporalConfig::default(),
            assembly: AssemblyConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
