//! Business rules of the community portal: calendar views, publication
//! moderation and dependency-checked resident deletion.

pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod moderation;
pub mod residents;
