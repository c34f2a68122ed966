//! Builders for tables and provider payloads used across tests.

use crate::domain::Table;

/// Build a table from string literals. Empty cells become missing values.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_text_rows(
        columns.iter().map(|c| (*c).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect::<Vec<_>>()),
    )
}

/// A ticket table with `id`, `text`, `channel` and `priority` columns and
/// `n` rows whose text is `ticket 0`, `ticket 1`, ...
pub fn ticket_table(n: usize) -> Table {
    let columns = ["id", "text", "channel", "priority"]
        .iter()
        .map(|c| (*c).to_string())
        .collect();
    let rows = (0..n).map(|i| {
        vec![
            format!("T-{i}"),
            format!("ticket {i}"),
            "email".to_string(),
            "high".to_string(),
        ]
    });
    Table::from_text_rows(columns, rows)
}

/// Chat completion response body whose first choice carries `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
    })
    .to_string()
}

/// Model reply text carrying `summary` and `category`.
pub fn reply_json(summary: &str, category: &str) -> String {
    serde_json::json!({ "summary": summary, "category": category }).to_string()
}
