//! CLI module graph.

pub mod check;
pub mod classify;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
