//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`llm`] - Fake [`CompletionClient`](crate::port::outbound::llm::CompletionClient)
//!   implementations: `StaticClient`, `FailingClient`, `LatencyClient`.
//! - [`transport`] - `ScriptedTransport`, a scripted
//!   [`HttpTransport`](crate::port::outbound::transport::HttpTransport).
//! - [`dataset`] - In-memory table source and sink.
//! - [`domain`] - Builders for tables, tickets and provider payloads.

pub mod dataset;
pub mod domain;
pub mod llm;
pub mod transport;
