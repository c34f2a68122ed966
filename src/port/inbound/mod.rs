//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`classify`]: classify a ticket dataset, the use case behind the CLI

pub mod classify;
