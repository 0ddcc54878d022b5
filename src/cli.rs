// CLI module - command-line argument parsing and handlers
//
// Tutor commands map one-to-one onto dispatcher actions. Configuration
// management subcommands:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --update: Rewrite config with the current template, keeping values

use crate::config::{Config, VERSION};
use crate::dispatch::Action;
use crate::selection::SelectionSpec;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// AI Tutor - Python tutoring assistant in the terminal
#[derive(Parser, Debug)]
#[command(name = "ai-tutor")]
#[command(version = VERSION)]
#[command(about = "Python tutoring assistant backed by an AI Tutor server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the chat panel (default)
    Chat,

    /// Explain a piece of code
    Explain {
        /// Selection: path[:start[-end]] or - for stdin
        selection: String,
    },

    /// Generate a quiz on code or a topic
    Quiz {
        /// Selection: path[:start[-end]] or - for stdin
        selection: Option<String>,

        /// Quiz on a topic instead of code
        #[arg(long, conflicts_with = "selection")]
        topic: Option<String>,
    },

    /// Run a Python file and ask the tutor to debug it if it fails
    Run {
        file: PathBuf,
    },

    /// Ask the tutor a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Summarize a library's documentation
    Docs {
        library: String,
    },

    /// Check that the backend is reachable
    TestBackend,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Update config with new defaults (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Which config operation was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOp {
    Show,
    Path,
    Reset,
    Edit,
    Update,
    Usage,
}

impl ConfigOp {
    pub fn from_flags(show: bool, reset: bool, edit: bool, update: bool, path: bool) -> Self {
        if path {
            ConfigOp::Path
        } else if show {
            ConfigOp::Show
        } else if reset {
            ConfigOp::Reset
        } else if edit {
            ConfigOp::Edit
        } else if update {
            ConfigOp::Update
        } else {
            ConfigOp::Usage
        }
    }
}

impl Commands {
    /// The dispatcher action for a tutor command; None for chat and config
    ///
    /// Selections are read here so a missing file fails before any request.
    pub fn to_action(&self) -> Result<Option<Action>> {
        let action = match self {
            Commands::Chat | Commands::Config { .. } => return Ok(None),
            Commands::Explain { selection } => Action::ExplainSelection {
                selection: read_selection(selection)?,
            },
            Commands::Quiz { selection, topic } => {
                let selection = match (selection, topic) {
                    (Some(spec), _) => read_selection(spec)?,
                    (None, Some(topic)) => topic.clone(),
                    (None, None) => String::new(),
                };
                Action::GenerateQuiz { selection }
            }
            Commands::Run { file } => Action::RunAndDebug { path: file.clone() },
            Commands::Ask { question } => Action::Ask {
                question: question.join(" "),
            },
            Commands::Docs { library } => Action::Docs {
                library: library.clone(),
            },
            Commands::TestBackend => Action::TestBackend,
        };
        Ok(Some(action))
    }
}

fn read_selection(spec: &str) -> Result<String> {
    SelectionSpec::parse(spec)
        .and_then(|s| s.read())
        .with_context(|| format!("Cannot read selection '{}'", spec))
}

// ─────────────────────────────────────────────────────────────────────────────
// Config handlers
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(op: ConfigOp) -> Result<()> {
    match op {
        ConfigOp::Path => handle_config_path(),
        ConfigOp::Show => handle_config_show(),
        ConfigOp::Reset => handle_config_reset(),
        ConfigOp::Edit => handle_config_edit(),
        ConfigOp::Update => handle_config_update(),
        ConfigOp::Usage => {
            println!("Usage: ai-tutor config [--show|--reset|--edit|--update|--path]");
            println!();
            println!("Options:");
            println!("  --show    Display effective configuration");
            println!("  --reset   Reset config file to defaults");
            println!("  --edit    Open config file in $EDITOR");
            println!("  --update  Update config with new defaults (preserves user values)");
            println!("  --path    Show config file path");
            Ok(())
        }
    }
}

fn require_config_path() -> Result<PathBuf> {
    match Config::config_path() {
        Some(path) => Ok(path),
        None => bail!("Could not determine config path"),
    }
}

fn handle_config_path() -> Result<()> {
    println!("{}", require_config_path()?.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("theme = {:?}", config.theme);
    println!();
    println!("[backend]");
    println!("base_url = {:?}", config.backend.base_url);
    match config.backend.timeout_secs {
        Some(secs) => println!("timeout_secs = {}", secs),
        None => println!("# timeout_secs = (none)"),
    }
    match &config.backend.session_id {
        Some(id) => println!("session_id = {:?}", id),
        None => println!("# session_id = (none)"),
    }
    println!();
    println!("[runner]");
    println!("interpreter = {:?}", config.runner.interpreter);
    println!();
    println!("[chat]");
    println!("default_quiz_topic = {:?}", config.chat.default_quiz_topic);
    println!("toast_secs = {}", config.chat.toast_secs);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = require_config_path()?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    // Write the default config (using Config's single source of truth)
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = require_config_path()?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            // Platform-specific fallback
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status().with_context(|| {
        format!(
            "Failed to launch editor '{}' (set $EDITOR to your preferred editor)",
            editor
        )
    })?;
    if !status.success() {
        bail!("Editor exited with status: {}", status);
    }
    Ok(())
}

fn handle_config_update() -> Result<()> {
    let path = require_config_path()?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return Ok(());
    }

    // File values only, so env overrides are not persisted
    let updated = Config::from_file_only()?.to_toml();

    let backup_path = path.with_extension("toml.bak");
    match std::fs::copy(&path, &backup_path) {
        Ok(_) => println!("Backup created: {}", backup_path.display()),
        Err(e) => eprintln!("Warning: Could not create backup: {}", e),
    }

    std::fs::write(&path, updated)
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
    Ok(())
}
