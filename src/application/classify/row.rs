//! Classification of a single ticket.

use std::sync::Arc;

use tracing::{debug, warn};

use super::prompt::build_prompt;
use super::reply::parse_reply;
use crate::domain::{CategorySet, ItemResult, Ticket, TokenUsage};
use crate::error::Result;
use crate::port::outbound::llm::CompletionClient;

/// Result of one row plus the tokens it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub item: ItemResult,
    pub usage: TokenUsage,
}

/// Runs prompt building, completion, parsing and normalization for a row.
///
/// Cheap to clone; every row task of a batch holds a clone.
#[derive(Clone)]
pub struct RowProcessor {
    client: Arc<dyn CompletionClient>,
    categories: Arc<CategorySet>,
    locale: Arc<str>,
}

impl RowProcessor {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        categories: Arc<CategorySet>,
        locale: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            client,
            categories,
            locale: locale.into(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn CompletionClient> {
        &self.client
    }

    /// Classify one ticket.
    ///
    /// # Errors
    ///
    /// Propagates the completion client's error unchanged.
    pub async fn process(&self, ticket: &Ticket) -> Result<RowOutcome> {
        let prompt = build_prompt(ticket, &self.categories, &self.locale);
        let reply = self.client.complete(&prompt.system, &prompt.user).await?;

        let mut parsed = parse_reply(&reply.text);
        if parsed.is_unparseable() {
            warn!(
                id = ticket.id.as_deref().unwrap_or("-"),
                "Model reply was not valid JSON"
            );
        }
        parsed.category = self.categories.normalize(&parsed.category);

        debug!(
            id = ticket.id.as_deref().unwrap_or("-"),
            category = %parsed.category,
            "Row classified"
        );

        Ok(RowOutcome {
            item: ItemResult::classified(ticket.id.clone(), parsed),
            usage: reply.usage(),
        })
    }
}
