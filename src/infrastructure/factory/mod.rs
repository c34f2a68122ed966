//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration.
//!
//! # Submodules
//!
//! - [`llm`] - Completion client construction
//! - [`service`] - Classification service construction

pub mod llm;
pub mod service;
