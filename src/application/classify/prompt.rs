//! Prompt construction for ticket summarization and classification.

use crate::domain::{CategorySet, Ticket};

/// Header of the optional block listing channel and priority.
pub const CONTEXT_HEADER: &str = "CONTEXTUAL DATA:";

/// Fixed system instruction sent with every row.
pub const SYSTEM_PROMPT: &str = "You are an operational triage assistant. Summarize support \
tickets and classify each one into a SINGLE category from the list provided. Always answer \
with valid JSON only, without any extra prose.";

/// System and user instruction for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build both instructions for `ticket`.
#[must_use]
pub fn build_prompt(ticket: &Ticket, categories: &CategorySet, locale: &str) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(
            &ticket.text,
            locale,
            categories,
            ticket.channel.as_deref(),
            ticket.priority.as_deref(),
        ),
    }
}

/// Build the per-row user instruction.
#[must_use]
pub fn build_user_prompt(
    text: &str,
    locale: &str,
    categories: &CategorySet,
    channel: Option<&str>,
    priority: Option<&str>,
) -> String {
    let context = context_block(channel, priority);

    format!(
        r#"TICKET TEXT:
{text}

{context}REQUIREMENTS:
- Write an objective summary of at most 3 sentences, in the language {locale}.
- Classify the ticket into EXACTLY ONE category from this list: {categories}.
- If you are unsure, choose the most plausible category.

OUTPUT FORMAT (strict JSON):
{{"summary": "<short summary>",
"category": "<one category exactly as written in the list>"}}"#
    )
}

/// Channel/priority block, or an empty string when neither carries a value.
///
/// The block ends with a blank line so it slots between the ticket text and
/// the requirements.
fn context_block(channel: Option<&str>, priority: Option<&str>) -> String {
    let lines: Vec<String> = [("CHANNEL", channel), ("PRIORITY", priority)]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .map(str::trim)
                .filter(|v| has_value(v))
                .map(|v| format!("{label}: {v}"))
        })
        .collect();

    if lines.is_empty() {
        return String::new();
    }
    format!("{CONTEXT_HEADER}\n{}\n\n", lines.join("\n"))
}

fn has_value(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case("nan")
}
