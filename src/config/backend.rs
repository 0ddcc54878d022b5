//! Backend, runner and chat configuration
//!
//! - Backend: where the tutoring service lives and how requests are sent
//! - Runner: the local interpreter used by run-and-debug
//! - Chat: defaults for actions started from the chat panel

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Tutoring backend connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base address; endpoint paths are appended to it
    pub base_url: String,
    /// Request timeout in seconds. None leaves it to the network stack.
    pub timeout_secs: Option<u64>,
    /// Backend conversation id sent with every payload
    pub session_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: None,
            session_id: None,
        }
    }
}

/// Backend settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_id: Option<String>,
}

impl BackendConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileBackendConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            base_url: file.base_url.unwrap_or(defaults.base_url),
            // 0 means "no timeout", same as leaving it out
            timeout_secs: file.timeout_secs.filter(|&s| s > 0),
            session_id: file.session_id.filter(|s| !s.is_empty()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

/// Local interpreter settings
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Interpreter executable, invoked as `<interpreter> <file>`
    pub interpreter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileRunnerConfig {
    pub interpreter: Option<String>,
}

impl RunnerConfig {
    pub fn from_file(file: Option<FileRunnerConfig>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            interpreter: file
                .interpreter
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| Self::default().interpreter),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Chat panel settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Quiz topic used when nothing is selected
    pub default_quiz_topic: String,
    /// How long notifications stay on screen
    pub toast_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_quiz_topic: "Python Concepts".to_string(),
            toast_secs: 3,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub default_quiz_topic: Option<String>,
    pub toast_secs: Option<u64>,
}

impl ChatConfig {
    pub fn from_file(file: Option<FileChatConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            default_quiz_topic: file
                .default_quiz_topic
                .unwrap_or(defaults.default_quiz_topic),
            toast_secs: file.toast_secs.unwrap_or(defaults.toast_secs),
        }
    }
}
