// UI rendering for the chat panel
//
// Layout, top to bottom:
// - title bar (backend address, session id)
// - chat log
// - log pane (Ctrl+L)
// - input line
// - status bar (spinner while requests are in flight, key hints)
// The toast is drawn last, over the chat log.

use super::app::ChatApp;
use super::render::render_display;
use crate::logging::LogLevel;
use crate::sink::Role;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LOG_PANE_HEIGHT: u16 = 8;

pub fn draw(f: &mut Frame, app: &ChatApp, in_flight: usize) {
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(3)];
    if app.show_logs {
        constraints.push(Constraint::Length(LOG_PANE_HEIGHT));
    }
    constraints.extend([Constraint::Length(3), Constraint::Length(1)]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    render_title(f, chunks[0], app);
    render_chat_log(f, chunks[1], app);
    let mut next = 2;
    if app.show_logs {
        render_logs(f, chunks[next], app);
        next += 1;
    }
    render_input(f, chunks[next], app);
    render_status(f, chunks[next + 1], app, in_flight);

    if let Some(toast) = &app.toast {
        toast.render(f, chunks[1], &app.theme);
    }
}

fn render_title(f: &mut Frame, area: Rect, app: &ChatApp) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" AI Tutor ", theme.label(theme.title)),
        Span::styled("│ ", Style::default().fg(theme.border)),
        Span::styled(app.base_url.clone(), theme.text()),
    ];
    if let Some(session) = &app.session_label {
        spans.push(Span::styled(" │ session ", Style::default().fg(theme.border)));
        spans.push(Span::styled(session.clone(), theme.text()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chat_log(f: &mut Frame, area: Rect, app: &ChatApp) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Chat ", theme.label(theme.title)));
    let inner = block.inner(area);
    let width = inner.width as usize;
    let height = inner.height as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    for entry in &app.entries {
        let (label, color) = match entry.role {
            Role::User => ("You", theme.user),
            Role::Tutor => ("Tutor", theme.tutor),
        };
        lines.push(Line::from(vec![
            Span::styled(label, theme.label(color)),
            Span::styled(
                format!("  {}", entry.timestamp.format("%H:%M:%S")),
                Style::default().fg(theme.muted),
            ),
        ]));
        lines.extend(render_display(&entry.text, width, theme));
        lines.push(Line::default());
    }

    let max_scroll = lines.len().saturating_sub(height);
    app.max_scroll.set(max_scroll);
    let scroll_back = app.scroll_back.min(max_scroll);
    let start = max_scroll - scroll_back;
    let end = (start + height).min(lines.len());
    let visible: Vec<Line<'static>> = lines.drain(start..end).collect();

    f.render_widget(Paragraph::new(visible).block(block), area);
}

fn render_logs(f: &mut Frame, area: Rect, app: &ChatApp) {
    let theme = &app.theme;
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .log_buffer
        .tail(rows)
        .into_iter()
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Error => theme.error,
                LogLevel::Warn => theme.warn,
                LogLevel::Info => theme.fg,
                LogLevel::Debug | LogLevel::Trace => theme.muted,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(format!("{:5} ", entry.level.as_str()), Style::default().fg(color)),
                Span::styled(entry.message, theme.text()),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Logs ", theme.label(theme.muted)));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(f: &mut Frame, area: Rect, app: &ChatApp) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            " Ask a question or /help ",
            Style::default().fg(theme.muted),
        ));
    let inner = block.inner(area);

    // Keep the cursor visible on long lines
    let cursor = app.input.cursor_column() as u16;
    let offset = cursor.saturating_sub(inner.width.saturating_sub(1));
    let input = Paragraph::new(app.input.text())
        .style(theme.text())
        .scroll((0, offset))
        .block(block);
    f.render_widget(input, area);
    f.set_cursor_position(Position::new(inner.x + cursor - offset, inner.y));
}

fn render_status(f: &mut Frame, area: Rect, app: &ChatApp, in_flight: usize) {
    let theme = &app.theme;
    let state = match in_flight {
        0 => Span::styled(" ● ready", Style::default().fg(theme.tutor)),
        1 => Span::styled(
            format!(" {} waiting for the tutor", app.spinner_char()),
            Style::default().fg(theme.warn),
        ),
        n => Span::styled(
            format!(" {} waiting for {} replies", app.spinner_char(), n),
            Style::default().fg(theme.warn),
        ),
    };
    let hints = format!(
        " │ {} │ Enter send · PgUp/PgDn scroll · ^L logs · ^Y copy · ^T theme · Esc quit",
        app.uptime()
    );
    let line = Line::from(vec![state, Span::styled(hints, Style::default().fg(theme.muted))]);
    f.render_widget(Paragraph::new(line), area);
}
