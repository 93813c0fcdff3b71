mod admin;
mod app_specific;
mod calendar;
mod events;
mod extract;
mod publications;

#[cfg(test)]
mod test_support;

use salvo::Router;

// Re-export route constants from core
pub use courtyard_core::constants::{
    ADMIN_ROUTE_COMPONENT, ADMIN_ROUTE_PREFIX, API_ROUTE_COMPONENT, API_ROUTE_PREFIX,
    CALENDAR_ROUTE_COMPONENT, CALENDAR_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
///
/// ## Errors
/// Returns an error if any child route handler fails to initialize.
pub fn routes() -> anyhow::Result<Router> {
    Ok(Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(calendar::routes())
        .push(events::routes())
        .push(publications::routes())
        .push(admin::routes()))
}
