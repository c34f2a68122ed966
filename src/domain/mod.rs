//! Provider-agnostic domain types for ticket classification.

pub mod category;
pub mod classification;
pub mod completion;
pub mod error;
pub mod table;
pub mod ticket;

pub use category::CategorySet;
pub use classification::{FailurePolicy, ItemResult, ParsedReply, ERROR_CATEGORY, UNPARSEABLE};
pub use completion::{CompletionReply, CompletionRequest, TokenUsage};
pub use error::DomainError;
pub use table::Table;
pub use ticket::{Ticket, TicketColumns};
