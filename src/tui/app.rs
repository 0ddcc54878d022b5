// Application state for the chat panel
//
// Holds everything the UI draws: the chat log, the input line, scroll
// position, log pane visibility, the current toast and theme. The event loop
// mutates it; ui::draw only reads it.

use super::input::InputLine;
use super::theme::{Theme, ThemeKind};
use super::toast::Toast;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::markup;
use crate::sink::{Entry, Notice, Role, SinkEvent};
use std::cell::Cell;
use std::time::{Duration, Instant};

pub struct ChatApp {
    /// Append-only chat log, oldest first
    pub entries: Vec<Entry>,
    pub input: InputLine,

    /// Lines scrolled up from the bottom; 0 follows new entries
    pub scroll_back: usize,
    /// Largest useful `scroll_back`, written by the renderer each frame
    pub max_scroll: Cell<usize>,

    pub show_logs: bool,
    pub log_buffer: LogBuffer,

    pub toast: Option<Toast>,
    toast_duration: Duration,

    pub theme_kind: ThemeKind,
    pub theme: Theme,

    /// Shown in the title bar
    pub base_url: String,
    pub session_label: Option<String>,

    pub animation_frame: usize,
    pub started_at: Instant,
    pub should_quit: bool,
}

impl ChatApp {
    pub fn new(config: &Config, log_buffer: LogBuffer) -> Self {
        let theme_kind = ThemeKind::from_name(&config.theme);
        Self {
            entries: Vec::new(),
            input: InputLine::default(),
            scroll_back: 0,
            max_scroll: Cell::new(0),
            show_logs: false,
            log_buffer,
            toast: None,
            toast_duration: Duration::from_secs(config.chat.toast_secs),
            theme_kind,
            theme: theme_kind.theme(),
            base_url: config.backend.base_url.clone(),
            session_label: None,
            animation_frame: 0,
            started_at: Instant::now(),
            should_quit: false,
        }
    }

    /// Apply something a bridge task produced
    pub fn push(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::Entry(entry) => self.entries.push(entry),
            SinkEvent::Notice(notice) => self.notify(notice),
        }
    }

    /// Local echo of what the user typed
    pub fn push_user(&mut self, text: &str) {
        self.entries.push(Entry::new(Role::User, text));
        // New input jumps back to the bottom
        self.scroll_back = 0;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.toast = Some(Toast::new(notice, self.toast_duration));
    }

    /// Take the input line for dispatch
    pub fn submit(&mut self) -> String {
        self.input.submit()
    }

    /// Plain text of the most recent tutor entry
    pub fn last_tutor_plain(&self) -> Option<String> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.role == Role::Tutor)
            .map(|e| markup::to_plain(&e.text))
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = (self.scroll_back + lines).min(self.max_scroll.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn cycle_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = self.theme_kind.theme();
        self.notify(Notice::info(format!("Theme: {}", self.theme_kind.name())));
    }

    /// Advance animations and expire the toast
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    pub fn uptime(&self) -> String {
        let secs = self.started_at.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ChatApp {
        ChatApp::new(&Config::default(), LogBuffer::new())
    }

    #[test]
    fn test_sink_events_land_in_log_and_toast() {
        let mut app = app();
        app.push(SinkEvent::Entry(Entry::new(Role::Tutor, "<i>Thinking...</i>")));
        app.push(SinkEvent::Notice(Notice::error("boom")));
        assert_eq!(app.entries.len(), 1);
        assert_eq!(
            app.toast.as_ref().map(|t| t.notice.message.as_str()),
            Some("boom")
        );
    }

    #[test]
    fn test_last_tutor_plain_skips_user_entries() {
        let mut app = app();
        assert_eq!(app.last_tutor_plain(), None);
        app.push(SinkEvent::Entry(Entry::new(Role::Tutor, "<b>A</b><br>b")));
        app.push_user("thanks");
        assert_eq!(app.last_tutor_plain().as_deref(), Some("A\nb"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        app.max_scroll.set(5);
        app.scroll_up(10);
        assert_eq!(app.scroll_back, 5);
        app.scroll_down(2);
        assert_eq!(app.scroll_back, 3);
        app.push_user("q");
        assert_eq!(app.scroll_back, 0);
    }

    #[test]
    fn test_theme_cycles() {
        let mut app = app();
        assert_eq!(app.theme_kind, ThemeKind::Dark);
        app.cycle_theme();
        assert_eq!(app.theme_kind, ThemeKind::Light);
    }
}
