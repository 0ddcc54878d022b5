// Startup module - displays banner and connection settings
//
// Printed to the terminal before the chat panel takes over the screen, and
// repeated into the log pane so it stays visible afterwards.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Settings shown at startup, as (label, value)
fn settings(config: &Config) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("backend", config.backend.base_url.clone()),
        ("python", config.runner.interpreter.clone()),
        ("theme", config.theme.clone()),
    ];
    if let Some(session) = &config.backend.session_id {
        rows.push(("session", session.clone()));
    }
    if let Some(secs) = config.backend.timeout_secs {
        rows.push(("timeout", format!("{}s", secs)));
    }
    rows
}

/// Print the startup banner
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}AI Tutor{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Python tutoring assistant{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for (label, value) in settings(config) {
        println!("  {MAGENTA}▸{RESET} {DIM}{:<8}{RESET} {BOLD}{}{RESET}", label, value);
    }
    println!();
}

/// Print startup messages to the log pane
pub fn log_startup(config: &Config) {
    tracing::info!("═══════════════════════════════");
    tracing::info!("  AI TUTOR v{}", VERSION);
    tracing::info!("═══════════════════════════════");

    for (label, value) in settings(config) {
        tracing::info!("▸ {} {}", label, value);
    }

    tracing::info!("Ready. Type a question or /help");
}
