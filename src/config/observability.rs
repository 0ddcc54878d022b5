//! `[logging]` section: filter level and the optional JSON log file

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{self, RollingFileAppender};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How often the JSON log file starts a new file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    const NAMES: [(&'static str, LogRotation); 3] = [
        ("hourly", LogRotation::Hourly),
        ("daily", LogRotation::Daily),
        ("never", LogRotation::Never),
    ];

    /// Case-insensitive; anything unrecognised rotates daily
    pub fn parse(name: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, rotation)| rotation)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, r)| r == self)
            .map(|(n, _)| *n)
            .unwrap_or("daily")
    }

    /// Appender writing `<dir>/<prefix>[.<period>]`
    pub fn appender(self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            LogRotation::Hourly => rolling::hourly(dir, prefix),
            LogRotation::Daily => rolling::daily(dir, prefix),
            LogRotation::Never => rolling::never(dir, prefix),
        }
    }
}

/// Resolved `[logging]` settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level for this crate's events when RUST_LOG is unset
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::default(),
            file_prefix: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// `[logging]` exactly as written in the file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Fill in whatever the file leaves out
    ///
    /// A level that is not a tracing level is ignored, so a typo cannot turn
    /// into an EnvFilter directive that silences everything. A blank prefix
    /// keeps the default file name.
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(level) = file.level.map(|l| l.trim().to_ascii_lowercase()) {
            if LEVELS.contains(&level.as_str()) {
                config.level = level;
            }
        }
        if let Some(enabled) = file.file_enabled {
            config.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            config.file_dir = dir.into();
        }
        if let Some(rotation) = file.file_rotation {
            config.file_rotation = LogRotation::parse(&rotation);
        }
        if let Some(prefix) = file.file_prefix.filter(|p| !p.trim().is_empty()) {
            config.file_prefix = prefix;
        }
        config
    }
}
