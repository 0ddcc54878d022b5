// TUI module - the chat panel
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, sink events)
// - Turning submitted lines into dispatched actions

pub mod app;
pub mod clipboard;
pub mod input;
pub mod render;
pub mod theme;
pub mod toast;
pub mod ui;

use crate::config::Config;
use crate::dispatch::{parse_chat_line, Dispatcher, Plan};
use crate::logging::LogBuffer;
use crate::session::Session;
use crate::sink::{Notice, SinkEvent};
use anyhow::{Context, Result};
use app::ChatApp;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const PAGE: usize = 10;

/// Run the chat panel until the user quits
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// even when the loop fails.
pub async fn run_chat(
    session: Session,
    dispatcher: Dispatcher,
    mut sink_rx: mpsc::UnboundedReceiver<SinkEvent>,
    log_buffer: LogBuffer,
    config: &Config,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = ChatApp::new(config, log_buffer);
    app.session_label = session.backend_session().map(str::to_string);
    let dispatcher = Arc::new(dispatcher);

    let result = run_event_loop(&mut terminal, &mut app, &session, &dispatcher, &mut sink_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three sources feed it:
/// 1. Keyboard input
/// 2. Timer ticks (spinner, toast expiry)
/// 3. Sink events from bridge tasks
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
    session: &Session,
    dispatcher: &Arc<Dispatcher>,
    sink_rx: &mut mpsc::UnboundedReceiver<SinkEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app, session.in_flight()))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event, session, dispatcher);
                    }
                }
            } => {}

            _ = tick_interval.tick() => app.tick(),

            Some(sink_event) = sink_rx.recv() => app.push(sink_event),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key_event(
    app: &mut ChatApp,
    key_event: KeyEvent,
    session: &Session,
    dispatcher: &Arc<Dispatcher>,
) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        match key_event.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('l') => app.toggle_logs(),
            KeyCode::Char('t') => app.cycle_theme(),
            KeyCode::Char('y') => copy_last_reply(app),
            KeyCode::Char('p') => app.input.history_prev(),
            KeyCode::Char('n') => app.input.history_next(),
            KeyCode::Char('a') => app.input.home(),
            KeyCode::Char('e') => app.input.end(),
            _ => {}
        }
        return;
    }

    match key_event.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => submit_line(app, session, dispatcher),
        KeyCode::PageUp => app.scroll_up(PAGE),
        KeyCode::PageDown => app.scroll_down(PAGE),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Left => app.input.left(),
        KeyCode::Right => app.input.right(),
        KeyCode::Home => app.input.home(),
        KeyCode::End => app.input.end(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Char(c) => app.input.insert(c),
        _ => {}
    }
}

/// Echo the line into the log and dispatch it in the background
fn submit_line(app: &mut ChatApp, session: &Session, dispatcher: &Arc<Dispatcher>) {
    let line = app.submit();
    let action = match parse_chat_line(&line) {
        Ok(Some(action)) => action,
        Ok(None) => return,
        Err(e) => {
            app.notify(Notice::error(format!("{:#}", e)));
            return;
        }
    };
    app.push_user(line.trim());

    // Plain backend requests need no local work before the POST
    if let Plan::Request(endpoint, payload) = dispatcher.plan(action.clone()) {
        session.invoke(endpoint, payload);
        return;
    }

    let session = session.clone();
    let dispatcher = Arc::clone(dispatcher);
    tokio::spawn(async move {
        if let Err(e) = dispatcher.dispatch(&session, action).await {
            tracing::error!("Dispatch failed: {:#}", e);
            session.sink().notify(Notice::error(format!("{:#}", e)));
        }
    });
}

fn copy_last_reply(app: &mut ChatApp) {
    let notice = match app.last_tutor_plain() {
        None => Notice::info("Nothing to copy yet"),
        Some(text) => match clipboard::copy_to_clipboard(&text) {
            Ok(()) => Notice::info("Copied last reply"),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                Notice::error(format!("Copy failed: {}", e))
            }
        },
    };
    app.notify(notice);
}
