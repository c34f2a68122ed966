//! Infrastructure configuration modules.

pub mod batch;
pub mod logging;
pub mod provider;
pub mod retry;
pub mod settings;
