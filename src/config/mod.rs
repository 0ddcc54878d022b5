//! Configuration for the tutor client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/ai-tutor/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod backend;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use backend::{
    BackendConfig, ChatConfig, FileBackendConfig, FileChatConfig, FileRunnerConfig, RunnerConfig,
};
pub use observability::{FileLogging, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dark", "light"
    pub theme: String,

    /// Tutoring backend connection
    pub backend: BackendConfig,

    /// Local interpreter used by run-and-debug
    pub runner: RunnerConfig,

    /// Chat panel behaviour
    pub chat: ChatConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            backend: BackendConfig::default(),
            runner: RunnerConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,

    /// Optional [backend] section
    pub backend: Option<FileBackendConfig>,

    /// Optional [runner] section
    pub runner: Option<FileRunnerConfig>,

    /// Optional [chat] section
    pub chat: Option<FileChatConfig>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/ai-tutor/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("ai-tutor").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be parsed is an error: a broken
    /// config should fail fast, not silently fall back to defaults.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file_config(&contents).with_context(|| {
                format!(
                    "Failed to parse configuration file {} (run `ai-tutor config --reset` to start over)",
                    path.display()
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Cannot read configuration file {}", path.display())),
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Load only what the config file says, ignoring environment overrides
    ///
    /// Used when rewriting the file so env values are not persisted.
    pub fn from_file_only() -> Result<Self> {
        let file = Self::load_file_config()?;
        Ok(Self::resolve(file, |_| None))
    }

    /// Merge a parsed file config with environment overrides
    ///
    /// `env` is injected so precedence can be tested without touching the
    /// process environment.
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Theme: env > file > default
        let theme = env("AI_TUTOR_THEME")
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        // Subconfig loading with from_file() helpers, env overrides on top
        let mut backend = BackendConfig::from_file(file.backend);
        if let Some(url) = env("AI_TUTOR_BACKEND_URL") {
            backend.base_url = url;
        }
        if let Some(session) = env("AI_TUTOR_SESSION") {
            backend.session_id = (!session.is_empty()).then_some(session);
        }

        let mut runner = RunnerConfig::from_file(file.runner);
        if let Some(interpreter) = env("AI_TUTOR_PYTHON") {
            runner.interpreter = interpreter;
        }

        let chat = ChatConfig::from_file(file.chat);
        let logging = LoggingConfig::from_file(file.logging);

        Self {
            theme,
            backend,
            runner,
            chat,
            logging,
        }
    }
}
