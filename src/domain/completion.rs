//! Values exchanged with a completion provider.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// One chat-completion request, built fresh for each row.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub system: String,
    pub user: String,
}

/// Raw provider answer for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReply {
    /// Message content of the first choice, trimmed.
    pub text: String,
    /// Prompt tokens billed, when the provider reports usage.
    pub input_tokens: Option<u64>,
    /// Completion tokens billed, when the provider reports usage.
    pub output_tokens: Option<u64>,
}

impl CompletionReply {
    /// Reply carrying only text, no usage block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn usage(&self) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens.unwrap_or(0),
            output_tokens: self.output_tokens.unwrap_or(0),
        }
    }
}

/// Token counts summed over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens += rhs.input_tokens;
        self.output_tokens += rhs.output_tokens;
    }
}
