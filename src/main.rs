// AI Tutor - Python tutoring assistant in the terminal
//
// Forwards code, questions and run failures to an AI Tutor backend and
// renders the replies in a chat log.
//
// Architecture:
// - Bridge (reqwest): one POST per action, placeholder + extracted reply
// - Dispatcher: maps actions to payloads, runs files locally
// - Session: bridge + display sink + backend session id, passed explicitly
// - TUI (ratatui): chat panel fed by the sink over an mpsc channel
// - CLI (clap): one-shot commands that print to the terminal

mod bridge;
mod cli;
mod config;
mod dispatch;
mod logging;
mod markup;
mod runner;
mod selection;
mod session;
mod sink;
mod startup;
mod tui;

use anyhow::Result;
use bridge::Bridge;
use clap::Parser;
use cli::{Cli, Commands, ConfigOp};
use config::Config;
use dispatch::Dispatcher;
use logging::{LogBuffer, LogTarget};
use session::Session;
use sink::{ChannelSink, ConsoleSink};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management never needs the backend or logging
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        update,
        path,
    }) = &cli.command
    {
        return cli::handle_config(ConfigOp::from_flags(*show, *reset, *edit, *update, *path));
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env()?;

    let command = cli.command.unwrap_or(Commands::Chat);
    match command.to_action()? {
        Some(action) => run_once(&config, action).await,
        None => run_chat(config).await,
    }
}

/// One-shot command: print the result to the terminal and exit
async fn run_once(config: &Config, action: dispatch::Action) -> Result<()> {
    let log_buffer = LogBuffer::new();
    // Guard must live until exit so file logs flush
    let _guard = logging::init(&config.logging, LogTarget::Stderr, &log_buffer);

    let bridge = Bridge::new(&config.backend)?;
    let session = Session::new(
        bridge,
        Arc::new(ConsoleSink),
        config.backend.session_id.clone(),
    );
    let outcome = Dispatcher::new(config).dispatch(&session, action).await?;
    tracing::debug!("Command finished: {:?}", outcome);
    Ok(())
}

/// Interactive chat panel
async fn run_chat(config: Config) -> Result<()> {
    startup::print_startup(&config);

    let log_buffer = LogBuffer::new();
    let _guard = logging::init(&config.logging, LogTarget::Panel, &log_buffer);
    startup::log_startup(&config);

    let (sink, sink_rx) = ChannelSink::new();
    let bridge = Bridge::new(&config.backend)?;
    let session = Session::new(bridge, Arc::new(sink), config.backend.session_id.clone());
    let dispatcher = Dispatcher::new(&config);

    tui::run_chat(session, dispatcher, sink_rx, log_buffer, &config).await
}
