//! Display markup - the chat log's tiny formatting convention
//!
//! Display strings carry a handful of HTML-like tags that every sink
//! understands:
//! - `<br>` line break (the only way a reply spans multiple lines)
//! - `<b>..</b>` bold, `<i>..</i>` italic
//! - `<pre>..</pre>` preformatted block, raw newlines kept
//!
//! Anything else is passed through unescaped as text.

/// Line break marker understood by every sink
pub const LINE_BREAK: &str = "<br>";

/// Replace raw newlines with the sink's line break marker
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK)
}

pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", text)
}

pub fn italic(text: &str) -> String {
    format!("<i>{}</i>", text)
}

pub fn pre(text: &str) -> String {
    format!("<pre>{}</pre>", text)
}

/// A parsed piece of a display string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Bold(String),
    Italic(String),
    /// Preformatted block (may contain raw newlines)
    Pre(String),
    Break,
}

/// Tags recognised by the parser, longest first so `<br/>` wins over `<b`
const TAGS: &[&str] = &[
    "<br/>", "<br />", "<br>", "<pre>", "</pre>", "<b>", "</b>", "<i>", "</i>",
];

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Plain,
    Bold,
    Italic,
    Pre,
}

/// Split a display string into styled segments
///
/// Unclosed tags run to the end of the string. Nested emphasis is flattened
/// to the innermost style.
pub fn parse(display: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut mode = Mode::Plain;
    let mut buf = String::new();
    let mut rest = display;

    let flush = |buf: &mut String, mode: Mode, segments: &mut Vec<Segment>| {
        if buf.is_empty() {
            return;
        }
        let text = std::mem::take(buf);
        segments.push(match mode {
            Mode::Plain => Segment::Text(text),
            Mode::Bold => Segment::Bold(text),
            Mode::Italic => Segment::Italic(text),
            Mode::Pre => Segment::Pre(text),
        });
    };

    while !rest.is_empty() {
        let tag = if rest.starts_with('<') {
            TAGS.iter()
                .find(|t| rest.get(..t.len()).is_some_and(|s| s.eq_ignore_ascii_case(t)))
                .copied()
        } else {
            None
        };

        let Some(tag) = tag else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                buf.push(c);
            }
            rest = chars.as_str();
            continue;
        };
        rest = &rest[tag.len()..];

        let tag = tag.to_ascii_lowercase();
        // Inside <pre> only the closing tag and line breaks are markup
        if mode == Mode::Pre && tag != "</pre>" && !tag.starts_with("<br") {
            buf.push_str(&tag);
            continue;
        }

        flush(&mut buf, mode, &mut segments);
        match tag.as_str() {
            "<br>" | "<br/>" | "<br />" => segments.push(Segment::Break),
            "<b>" => mode = Mode::Bold,
            "<i>" => mode = Mode::Italic,
            "<pre>" => mode = Mode::Pre,
            _ => mode = Mode::Plain,
        }
    }
    flush(&mut buf, mode, &mut segments);
    segments
}

/// Render a display string as plain text (for the console sink and clipboard)
pub fn to_plain(display: &str) -> String {
    let mut out = String::new();
    for segment in parse(display) {
        match segment {
            Segment::Text(t) | Segment::Bold(t) | Segment::Italic(t) => out.push_str(&t),
            Segment::Pre(t) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(t.trim_end_matches('\n'));
                out.push('\n');
            }
            Segment::Break => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_one_break_each() {
        let normalized = normalize_newlines("a\nb");
        assert!(!normalized.contains('\n'));
        assert_eq!(normalized.matches(LINE_BREAK).count(), 1);
        assert_eq!(normalized, "a<br>b");
    }

    #[test]
    fn test_crlf_is_a_single_break() {
        assert_eq!(normalize_newlines("a\r\nb\nc"), "a<br>b<br>c");
    }

    #[test]
    fn test_parse_error_string() {
        let segments = parse("<b>Error:</b> Could not connect");
        assert_eq!(
            segments,
            vec![
                Segment::Bold("Error:".to_string()),
                Segment::Text(" Could not connect".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pre_keeps_newlines_and_inner_tags() {
        let segments = parse("<b>Execution Success:</b><br><pre>1\n<i>2</i>\n</pre>");
        assert_eq!(
            segments,
            vec![
                Segment::Bold("Execution Success:".to_string()),
                Segment::Break,
                Segment::Pre("1\n<i>2</i>\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        assert_eq!(
            parse("x < y <span>z</span>"),
            vec![Segment::Text("x < y <span>z</span>".to_string())]
        );
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(
            parse("a<BR>b"),
            vec![
                Segment::Text("a".to_string()),
                Segment::Break,
                Segment::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_plain() {
        assert_eq!(to_plain("<i>Thinking...</i>"), "Thinking...");
        assert_eq!(to_plain("line one<br>line two"), "line one\nline two");
        assert_eq!(
            to_plain("<b>Execution Success:</b><br><pre>hi\n</pre>"),
            "Execution Success:\nhi\n"
        );
    }

    #[test]
    fn test_multibyte_text_survives() {
        assert_eq!(to_plain("日本<br>語"), "日本\n語");
    }
}
