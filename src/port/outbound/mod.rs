//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the completion provider, the HTTP transport
//! underneath it, and dataset storage.

pub mod dataset;
pub mod llm;
pub mod transport;
