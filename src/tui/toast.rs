//! Toast notification
//!
//! A non-blocking overlay that auto-dismisses. Renders in the top-right
//! corner of the chat log on top of all other content.

use super::theme::Theme;
use crate::sink::{Notice, NoticeLevel};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

pub struct Toast {
    pub notice: Notice,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(notice: Notice, duration: Duration) -> Self {
        Self {
            notice,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Uses `Clear` so the toast is drawn over the chat log
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let message = self.notice.message.as_str();
        let message_width = u16::try_from(message.width()).unwrap_or(u16::MAX);
        let (width, height) = toast_size(message_width, area);
        let x = area.right().saturating_sub(width + 1);
        let y = area.y + 1;
        let toast_area = Rect::new(x, y, width, height);

        let color = match self.notice.level {
            NoticeLevel::Info => theme.highlight,
            NoticeLevel::Error => theme.error,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let text = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

/// Outer size for a message `message_width` columns wide
fn toast_size(message_width: u16, area: Rect) -> (u16, u16) {
    // 2 chars padding each side plus borders
    let width = message_width
        .saturating_add(4)
        .min(area.width.saturating_sub(2));
    let inner = width.saturating_sub(2).max(1);
    let text_lines = message_width.div_ceil(inner).max(1);
    let height = text_lines.saturating_add(2).min(area.height);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let toast = Toast::new(Notice::info("hi"), Duration::ZERO);
        assert!(toast.is_expired());
        let toast = Toast::new(Notice::info("hi"), Duration::from_secs(60));
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_huge_message_is_clamped_to_area() {
        let area = Rect::new(0, 0, 80, 20);
        let message_width = u16::try_from(200_000usize).unwrap_or(u16::MAX);
        assert_eq!(toast_size(message_width, area), (78, 20));
        assert_eq!(toast_size(4, area), (8, 3));
    }
}
