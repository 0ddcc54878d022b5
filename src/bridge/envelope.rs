//! Response envelopes and the replies decoded from them
//!
//! The backend answers with a JSON object holding one of `analysis`, `quiz`,
//! `answer` or `summary`. Which one is expected depends on the endpoint, so
//! decoding is driven by the endpoint first and only falls back to probing
//! the fields in a fixed priority order.

use super::Endpoint;
use crate::markup;
use serde_json::Value;

/// Envelope fields carrying display text, in priority order
pub const REPLY_FIELDS: [&str; 4] = ["analysis", "quiz", "answer", "summary"];

/// A decoded backend reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Analysis(String),
    Quiz(String),
    Answer(String),
    Summary {
        text: String,
        /// Documents the backend grounded the summary on (`/docs` only)
        sources: Vec<Value>,
    },
    Empty,
}

/// Non-empty string value of `field`, if any
fn text_field<'a>(envelope: &'a Value, field: &str) -> Option<&'a str> {
    envelope
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl Reply {
    fn from_field(field: &str, text: &str, envelope: &Value) -> Self {
        let text = text.to_string();
        match field {
            "analysis" => Reply::Analysis(text),
            "quiz" => Reply::Quiz(text),
            "answer" => Reply::Answer(text),
            _ => Reply::Summary {
                text,
                sources: envelope
                    .get("sources")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            },
        }
    }

    /// Decode the field `endpoint` is known to produce, falling back to
    /// [`Reply::probe`] when the backend answered under another key.
    pub fn for_endpoint(endpoint: Endpoint, envelope: &Value) -> Self {
        let field = endpoint.reply_field();
        match text_field(envelope, field) {
            Some(text) => Self::from_field(field, text, envelope),
            None => Self::probe(envelope),
        }
    }

    /// First non-empty field in `analysis > quiz > answer > summary` order
    pub fn probe(envelope: &Value) -> Self {
        REPLY_FIELDS
            .iter()
            .find_map(|field| {
                text_field(envelope, field).map(|text| Self::from_field(field, text, envelope))
            })
            .unwrap_or(Reply::Empty)
    }

    /// The reply text, unchanged
    pub fn text(&self) -> &str {
        match self {
            Reply::Analysis(t) | Reply::Quiz(t) | Reply::Answer(t) => t,
            Reply::Summary { text, .. } => text,
            Reply::Empty => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }

    /// Display string for the sink: newlines turned into line breaks, plus a
    /// source count for documentation summaries
    pub fn to_display(&self) -> String {
        let mut display = markup::normalize_newlines(self.text());
        if let Reply::Summary { sources, .. } = self {
            if !sources.is_empty() {
                let noun = if sources.len() == 1 { "source" } else { "sources" };
                display.push_str(markup::LINE_BREAK);
                display.push_str(&markup::italic(&format!(
                    "Based on {} {}",
                    sources.len(),
                    noun
                )));
            }
        }
        display
    }
}

/// Pick the display text out of an envelope
///
/// Tests `analysis, quiz, answer, summary` in that order and returns the
/// first present, non-empty string. Total: anything else yields `""`.
#[allow(dead_code)] // the bridge decodes through Reply::for_endpoint
pub fn extract(envelope: &Value) -> String {
    Reply::probe(envelope).text().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_field_returned_unchanged() {
        for field in REPLY_FIELDS {
            let envelope = json!({ field: "  **Explanation:** line\nnext " });
            assert_eq!(extract(&envelope), "  **Explanation:** line\nnext ");
        }
    }

    #[test]
    fn test_priority_order() {
        let envelope = json!({
            "summary": "s",
            "answer": "a",
            "quiz": "q",
            "analysis": "an",
        });
        assert_eq!(extract(&envelope), "an");

        let envelope = json!({ "summary": "s", "answer": "a", "quiz": "q" });
        assert_eq!(extract(&envelope), "q");

        let envelope = json!({ "summary": "s", "answer": "a" });
        assert_eq!(extract(&envelope), "a");
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let envelope = json!({ "analysis": "", "answer": "fallback" });
        assert_eq!(extract(&envelope), "fallback");
    }

    #[test]
    fn test_no_known_field_yields_empty_string() {
        assert_eq!(extract(&json!({})), "");
        assert_eq!(extract(&json!({ "detail": "Not Found" })), "");
        assert_eq!(extract(&json!({ "analysis": null, "quiz": 3 })), "");
        assert_eq!(extract(&json!("just a string")), "");
        assert_eq!(extract(&Value::Null), "");
    }

    #[test]
    fn test_endpoint_field_wins_over_priority() {
        // analysis outranks answer in probing, but /followup expects answer
        let envelope = json!({ "analysis": "stale", "answer": "fresh" });
        assert_eq!(
            Reply::for_endpoint(Endpoint::Followup, &envelope),
            Reply::Answer("fresh".to_string())
        );
    }

    #[test]
    fn test_endpoint_falls_back_to_probe() {
        let envelope = json!({ "answer": "from another key" });
        assert_eq!(
            Reply::for_endpoint(Endpoint::Quiz, &envelope),
            Reply::Answer("from another key".to_string())
        );
        assert!(Reply::for_endpoint(Endpoint::Analyze, &json!({})).is_empty());
    }

    #[test]
    fn test_summary_carries_sources() {
        let envelope = json!({ "summary": "numpy is...", "sources": [{"title": "a"}, {"title": "b"}] });
        let reply = Reply::for_endpoint(Endpoint::Docs, &envelope);
        match &reply {
            Reply::Summary { text, sources } => {
                assert_eq!(text, "numpy is...");
                assert_eq!(sources.len(), 2);
            }
            other => panic!("expected summary, got {:?}", other),
        }
        assert_eq!(reply.to_display(), "numpy is...<br><i>Based on 2 sources</i>");
    }

    #[test]
    fn test_display_normalizes_newlines() {
        let display = Reply::Answer("a\nb".to_string()).to_display();
        assert!(!display.contains('\n'));
        assert_eq!(display.matches(markup::LINE_BREAK).count(), 1);
        assert_eq!(Reply::Empty.to_display(), "");
    }
}
