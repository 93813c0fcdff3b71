//! Courtyard community portal - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `courtyard_test::` paths.

pub mod component {
    pub use courtyard_core::{config, constants, error, types};

    pub use courtyard_service::{calendar, catalog, clock, moderation, residents};

    pub mod recurrence {
        pub use courtyard_calendar::*;
    }
}

pub mod app {
    pub use courtyard_app::*;

    pub mod api {
        pub use courtyard_app::app::api::*;
    }
}
