//! Outbound adapters (driven side).

pub mod dataset;
pub mod llm;
