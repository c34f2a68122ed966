//! Ticket classification pipeline.
//!
//! Leaves first:
//!
//! - [`prompt`] - System and user instructions for one ticket
//! - [`reply`] - Tolerant decoding of the model reply
//! - [`row`] - Prompt, completion, parse and normalize for one ticket
//! - [`batch`] - Bounded-concurrency fan-out with ordered collection
//! - [`service`] - Dataset-level use case behind the CLI

pub mod batch;
pub mod prompt;
pub mod reply;
pub mod row;
pub mod service;

pub use batch::{BatchOutcome, BatchProgress, BatchRunner, ProgressSink, DEFAULT_MAX_CONCURRENCY};
pub use row::{RowOutcome, RowProcessor};
pub use service::ClassifyService;
