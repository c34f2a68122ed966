//! Triage - summarize and classify support tickets with a language model.
//!
//! Reads a CSV dataset of support tickets, asks an OpenAI-compatible chat
//! completion endpoint for a short summary and one category per ticket, and
//! returns the results in input order, optionally writing them back as two
//! extra CSV columns.
//!
//! # Architecture
//!
//! - [`domain`] - Tables, tickets, category sets and classification results
//! - [`port`] - Inbound use case and outbound provider/dataset traits
//! - [`application`] - Prompt building, reply parsing, retry and the
//!   bounded-concurrency batch runner
//! - [`adapter`] - CLI, CSV dataset and OpenAI-compatible HTTP client
//! - [`infrastructure`] - Configuration and service wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use triage::infrastructure::config::settings::Config;
//! use triage::infrastructure::factory::service::build_classify_service;
//! use triage::port::inbound::classify::{ClassifyRequest, ClassifyTickets};
//!
//! # async fn run() -> triage::error::Result<()> {
//! let config = Config::from_env()?;
//! let service = build_classify_service(&config);
//! let request = ClassifyRequest::new(
//!     "tickets.csv",
//!     "text",
//!     vec!["Billing".into(), "Technical".into()],
//! );
//! let response = service.classify(request).await?;
//! println!("{} rows", response.n_rows);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
