//! Classification results.

use serde::{Deserialize, Serialize};

/// Category assigned when the model reply could not be decoded.
pub const UNPARSEABLE: &str = "UNPARSEABLE";

/// Category assigned to rows that failed under the `mark` failure policy.
pub const ERROR_CATEGORY: &str = "ERROR";

/// What a batch does when one row fails after the client gave up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole batch on the first row error. No partial results.
    #[default]
    Abort,
    /// Record the error on the row and keep going.
    Mark,
}

/// Summary and category extracted from one model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub summary: String,
    pub category: String,
}

impl ParsedReply {
    pub fn new(summary: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            category: category.into(),
        }
    }

    /// Whether the reply fell back to the `UNPARSEABLE` sentinel.
    #[must_use]
    pub fn is_unparseable(&self) -> bool {
        self.category == UNPARSEABLE
    }
}

/// Result for one input row, returned in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult {
    pub id: Option<String>,
    pub summary: String,
    pub category: String,
    /// Failure cause, only set for rows marked under the `mark` policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResult {
    #[must_use]
    pub fn classified(id: Option<String>, parsed: ParsedReply) -> Self {
        Self {
            id,
            summary: parsed.summary,
            category: parsed.category,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(id: Option<String>, cause: impl Into<String>) -> Self {
        Self {
            id,
            summary: String::new(),
            category: ERROR_CATEGORY.to_string(),
            error: Some(cause.into()),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_omitted_when_absent() {
        let item = ItemResult::classified(Some("7".into()), ParsedReply::new("s", "Billing"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["category"], "Billing");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failed_items_carry_marker_and_cause() {
        let item = ItemResult::failed(None, "HTTP 401");
        assert!(item.is_failed());
        assert_eq!(item.category, ERROR_CATEGORY);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["error"], "HTTP 401");
        assert!(json["id"].is_null());
    }
}
