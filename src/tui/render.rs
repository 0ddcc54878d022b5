// Display string rendering for the chat log
//
// Turns a display string into wrapped, styled ratatui lines:
// - markup tags (<br>, <b>, <i>, <pre>) come from crate::markup
// - tutor replies are markdown, so text runs are parsed with pulldown-cmark
//   for inline emphasis, code spans, list markers and headings
// - wrapping uses unicode display width

use super::theme::Theme;
use crate::markup::{self, Segment};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// A styled piece of one logical line
type Run = (String, Style);

/// Strip control characters and ANSI escapes that would corrupt the display
///
/// Program output shown after a run can contain colour codes; tabs are
/// expanded so width calculations stay correct.
pub fn sanitize_for_tui(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => {
                // ESC [ <params> <letter>
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\t' => result.push_str("    "),
            '\n' => result.push('\n'),
            c if c.is_control() => {}
            _ => result.push(ch),
        }
    }
    result
}

/// Render a display string to lines no wider than `width`
pub fn render_display(display: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let width = width.max(1);
    let base = theme.text();
    let mut lines = Vec::new();
    let mut current: Vec<Run> = Vec::new();

    for segment in markup::parse(&sanitize_for_tui(display)) {
        match segment {
            Segment::Text(text) => current.extend(inline_runs(&text, base, theme)),
            Segment::Bold(text) => {
                current.extend(inline_runs(&text, base.add_modifier(Modifier::BOLD), theme))
            }
            Segment::Italic(text) => {
                current.extend(inline_runs(&text, base.add_modifier(Modifier::ITALIC), theme))
            }
            Segment::Break => lines.extend(wrap_runs(std::mem::take(&mut current), width)),
            Segment::Pre(text) => {
                if !current.is_empty() {
                    lines.extend(wrap_runs(std::mem::take(&mut current), width));
                }
                for line in text.trim_end_matches('\n').split('\n') {
                    lines.extend(wrap_runs(
                        vec![(line.to_string(), theme.code_style())],
                        width,
                    ));
                }
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.extend(wrap_runs(current, width));
    }
    lines
}

/// Inline markdown of one line of reply text
fn inline_runs(text: &str, base: Style, theme: &Theme) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut style = base;
    // (ordered, next number) per open list
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;

    for event in Parser::new(text) {
        match event {
            Event::Text(t) if in_code_block => runs.push((t.to_string(), theme.code_style())),
            Event::Text(t) => runs.push((t.to_string(), style)),
            Event::Code(c) => runs.push((c.to_string(), theme.code_style())),
            Event::Html(h) | Event::InlineHtml(h) => runs.push((h.to_string(), style)),
            Event::SoftBreak | Event::HardBreak => runs.push((" ".to_string(), style)),
            Event::Rule => runs.push(("────────".to_string(), Style::default().fg(theme.muted))),
            Event::Start(Tag::Strong) | Event::Start(Tag::Heading { .. }) => {
                style = style.add_modifier(Modifier::BOLD)
            }
            Event::End(TagEnd::Strong) | Event::End(TagEnd::Heading(_)) => {
                style = style.remove_modifier(Modifier::BOLD)
            }
            Event::Start(Tag::Emphasis) => style = style.add_modifier(Modifier::ITALIC),
            Event::End(TagEnd::Emphasis) => style = style.remove_modifier(Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => style = style.add_modifier(Modifier::CROSSED_OUT),
            Event::End(TagEnd::Strikethrough) => {
                style = style.remove_modifier(Modifier::CROSSED_OUT)
            }
            Event::Start(Tag::BlockQuote) => {
                runs.push(("│ ".to_string(), Style::default().fg(theme.muted)))
            }
            Event::Start(Tag::List(start)) => lists.push(start),
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                runs.push((format!("{}{}", indent, marker), Style::default().fg(theme.highlight)));
            }
            // A lone ``` line opens a block whose content arrives on later lines
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            _ => {}
        }
    }
    runs
}

/// Split into alternating whitespace / non-whitespace tokens
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut last_ws: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if last_ws.is_some_and(|prev| prev != ws) {
            out.push(&text[start..i]);
            start = i;
        }
        last_ws = Some(ws);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Word-wrap one logical line of runs
fn wrap_runs(runs: Vec<Run>, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for (text, style) in runs {
        for token in tokens(&text) {
            let token_width = token.width();
            let is_space = token.trim().is_empty();

            if used > 0 && used + token_width > width {
                lines.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
                if is_space {
                    continue;
                }
            }

            if token_width <= width {
                spans.push(Span::styled(token.to_string(), style));
                used += token_width;
                continue;
            }

            // Longer than a whole line: hard split on character boundaries
            let mut chunk = String::new();
            for c in token.chars() {
                let cw = c.to_string().width();
                if used + cw > width && used > 0 {
                    spans.push(Span::styled(std::mem::take(&mut chunk), style));
                    lines.push(Line::from(std::mem::take(&mut spans)));
                    used = 0;
                }
                chunk.push(c);
                used += cw;
            }
            if !chunk.is_empty() {
                spans.push(Span::styled(chunk, style));
            }
        }
    }
    lines.push(Line::from(spans));
    lines
}
