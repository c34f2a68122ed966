//! LLM adapter modules.
//!
//! Provides the OpenAI-compatible implementation of
//! [`CompletionClient`](crate::port::outbound::llm::CompletionClient) and the
//! `reqwest` transport it sends requests through.

pub mod openai;
pub mod transport;
