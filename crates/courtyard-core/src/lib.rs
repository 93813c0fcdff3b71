//! Shared building blocks for the Courtyard community portal.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
