//! Tolerant decoding of model replies.

use serde_json::Value;

use crate::domain::{ParsedReply, UNPARSEABLE};

/// Maximum characters of raw text kept as summary on fallback.
pub const FALLBACK_SUMMARY_CHARS: usize = 512;

/// Extract `summary` and `category` from a model reply.
///
/// Never fails: text that does not hold a JSON object degrades into a reply
/// whose category is [`UNPARSEABLE`] and whose summary is the trimmed raw
/// text, cut to [`FALLBACK_SUMMARY_CHARS`] characters.
#[must_use]
pub fn parse_reply(raw: &str) -> ParsedReply {
    let trimmed = raw.trim();

    match serde_json::from_str::<Value>(json_span(trimmed)) {
        Ok(Value::Object(fields)) => ParsedReply {
            summary: field_text(fields.get("summary")),
            category: field_text(fields.get("category")),
        },
        _ => ParsedReply {
            summary: trimmed.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
            category: UNPARSEABLE.to_string(),
        },
    }
}

/// Slice from the first `{` to the last `}`, or the whole text.
fn json_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let parsed = parse_reply(r#"noise {"summary":"S","category":"Billing"} noise"#);
        assert_eq!(parsed, ParsedReply::new("S", "Billing"));
    }

    #[test]
    fn extracts_object_from_markdown_fence() {
        let raw = "```json\n{\"summary\": \"Printer down\", \"category\": \"Technical\"}\n```";
        assert_eq!(parse_reply(raw), ParsedReply::new("Printer down", "Technical"));
    }

    #[test]
    fn falls_back_on_plain_text() {
        let parsed = parse_reply("not json at all");
        assert_eq!(parsed, ParsedReply::new("not json at all", UNPARSEABLE));
        assert!(parsed.is_unparseable());
    }

    #[test]
    fn falls_back_on_empty_input() {
        assert_eq!(parse_reply(""), ParsedReply::new("", UNPARSEABLE));
        assert_eq!(parse_reply("   \n"), ParsedReply::new("", UNPARSEABLE));
    }

    #[test]
    fn falls_back_on_broken_json() {
        let parsed = parse_reply(r#"{"summary": "cut off"#);
        assert_eq!(parsed.category, UNPARSEABLE);
        assert_eq!(parsed.summary, r#"{"summary": "cut off"#);
    }

    #[test]
    fn falls_back_when_json_is_not_an_object() {
        assert_eq!(parse_reply("[1, 2, 3]").category, UNPARSEABLE);
        assert_eq!(parse_reply("42").category, UNPARSEABLE);
        assert_eq!(parse_reply(r#""just a string""#).category, UNPARSEABLE);
    }

    #[test]
    fn fallback_summary_is_truncated_by_characters() {
        let raw = "é".repeat(FALLBACK_SUMMARY_CHARS + 100);
        let parsed = parse_reply(&raw);
        assert_eq!(parsed.summary.chars().count(), FALLBACK_SUMMARY_CHARS);
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        assert_eq!(parse_reply(r#"{"summary": null}"#), ParsedReply::new("", ""));
        assert_eq!(parse_reply("{}"), ParsedReply::new("", ""));
    }

    #[test]
    fn fields_are_trimmed_and_coerced() {
        let parsed = parse_reply(r#"{"summary": "  padded  ", "category": 3}"#);
        assert_eq!(parsed, ParsedReply::new("padded", "3"));
    }

    #[test]
    fn braces_in_wrong_order_are_not_sliced() {
        let parsed = parse_reply("} nothing here {");
        assert_eq!(parsed, ParsedReply::new("} nothing here {", UNPARSEABLE));
    }
}
