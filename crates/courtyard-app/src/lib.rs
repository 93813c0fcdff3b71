//! HTTP surface of the courtyard community portal.

pub mod app;
pub mod error;
pub mod state;
