// Display sinks - where tutor replies and notifications end up
//
// The bridge never knows what is on the other side of a sink. The chat panel
// receives entries over a channel, one-shot CLI commands print to the
// terminal, and tests collect everything in memory.

use crate::markup;
use chrono::{DateTime, Utc};
use std::io::Write;
#[cfg(test)]
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Who produced a chat log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Tutor,
}

/// One element of the append-only chat log
#[derive(Debug, Clone)]
pub struct Entry {
    pub role: Role,
    /// Display string (markup, passed through unescaped)
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible notification, separate from the chat log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Anything that can display tutor output
pub trait DisplaySink: Send + Sync {
    /// Append a display string as a tutor/system entry
    fn show(&self, display: &str);

    /// Surface a notification outside the log
    fn notify(&self, notice: Notice);
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory log (test sink)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Debug, Default)]
struct ChatLogInner {
    entries: Vec<Entry>,
    notices: Vec<Notice>,
}

/// In-memory, unbounded chat log
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    inner: Arc<Mutex<ChatLogInner>>,
}

#[cfg(test)]
impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user entry (the direct input path, bypassing the bridge)
    pub fn push_user(&self, text: &str) {
        self.lock().entries.push(Entry::new(Role::User, text));
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Display strings of all tutor entries, oldest first
    pub fn tutor_texts(&self) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.role == Role::Tutor)
            .map(|e| e.text.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChatLogInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl DisplaySink for ChatLog {
    fn show(&self, display: &str) {
        self.lock().entries.push(Entry::new(Role::Tutor, display));
    }

    fn notify(&self, notice: Notice) {
        self.lock().notices.push(notice);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channel sink (chat panel)
// ─────────────────────────────────────────────────────────────────────────────

/// Messages delivered to the chat panel's event loop
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Entry(Entry),
    Notice(Notice),
}

/// Forwards everything to the chat panel over an unbounded channel
///
/// Unbounded so a bridge task never waits on the UI; the panel is the only
/// consumer and drains it every frame.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SinkEvent) {
        // Panel already closed: nothing left to draw on
        if self.tx.send(event).is_err() {
            tracing::debug!("Chat panel closed, dropping sink event");
        }
    }
}

impl DisplaySink for ChannelSink {
    fn show(&self, display: &str) {
        self.send(SinkEvent::Entry(Entry::new(Role::Tutor, display)));
    }

    fn notify(&self, notice: Notice) {
        self.send(SinkEvent::Notice(notice));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Console sink (one-shot commands)
// ─────────────────────────────────────────────────────────────────────────────

mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Prints display strings as plain text, notifications to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl DisplaySink for ConsoleSink {
    fn show(&self, display: &str) {
        let text = markup::to_plain(display);
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", text.trim_end_matches('\n'));
        let _ = out.flush();
    }

    fn notify(&self, notice: Notice) {
        use colors::*;
        let color = match notice.level {
            NoticeLevel::Info => CYAN,
            NoticeLevel::Error => RED,
        };
        eprintln!("{color}▸{RESET} {DIM}{}{RESET}", notice.message);
    }
}
