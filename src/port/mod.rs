//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the completion provider, HTTP, dataset files).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!      CLI ─────────▶│      Application        │
//!                    │  Domain + Port          │
//!                    └─────────────────────────┘
//!                      │          │          │
//!                      ▼          ▼          ▼
//!               ┌──────────┐ ┌─────────┐ ┌─────────┐
//!               │Completion│ │  HTTP   │ │ Dataset │
//!               │  Client  │ │Transport│ │  (CSV)  │
//!               └──────────┘ └─────────┘ └─────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`inbound::classify::ClassifyTickets`] - classify a dataset end to end
//! - [`outbound::llm::CompletionClient`] - one system/user completion
//! - [`outbound::transport::HttpTransport`] - one JSON POST, no retries
//! - [`outbound::dataset::TableSource`], [`outbound::dataset::TableSink`] - table I/O

pub mod inbound;
pub mod outbound;
