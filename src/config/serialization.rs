//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML, with comments documenting every option
    pub fn to_toml(&self) -> String {
        // Optional values are written commented-out so the key stays discoverable
        let timeout = match self.backend.timeout_secs {
            Some(secs) => format!("timeout_secs = {}", secs),
            None => "# timeout_secs = 60".to_string(),
        };
        let session = match &self.backend.session_id {
            Some(id) => format!("session_id = {:?}", id),
            None => "# session_id = \"my-study-session\"".to_string(),
        };

        format!(
            r#"# ai-tutor configuration

# Theme: dark, light (press Ctrl+T in the chat panel to cycle)
theme = {theme:?}

# Tutoring backend (AI_TUTOR_BACKEND_URL env var overrides base_url)
[backend]
base_url = {base_url:?}
# Request timeout; leave unset to rely on the network stack's defaults
{timeout}
# Conversation id forwarded to the backend so it can keep chat history
{session}

# Local execution for run-and-debug (AI_TUTOR_PYTHON env var overrides)
[runner]
interpreter = {interpreter:?}

# Chat panel
[chat]
default_quiz_topic = {topic:?}
toast_secs = {toast_secs}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# File logging (in addition to the log pane or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            theme = self.theme,
            base_url = self.backend.base_url,
            timeout = timeout,
            session = session,
            interpreter = self.runner.interpreter,
            topic = self.chat.default_quiz_topic,
            toast_secs = self.chat.toast_secs,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
