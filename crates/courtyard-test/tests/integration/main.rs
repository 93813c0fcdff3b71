//! End-to-end tests against the full API router with a seeded catalog.

mod administration;
mod calendar_views;
