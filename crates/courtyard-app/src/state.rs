//! Depot providers for the catalog store, calendar service and clock.

use std::sync::Arc;

use courtyard_core::error::CoreError;
use courtyard_service::calendar::CalendarService;
use courtyard_service::catalog::CatalogStore;
use courtyard_service::clock::Clock;
use salvo::async_trait;

use crate::error::AppResult;

pub struct CatalogProviderHandler {
    pub store: Arc<dyn CatalogStore>,
}

#[async_trait]
impl salvo::Handler for CatalogProviderHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// Injects the calendar service together with the clock it reads "now" from.
pub struct CalendarHandler {
    pub service: CalendarService,
    pub clock: Arc<dyn Clock>,
}

#[async_trait]
impl salvo::Handler for CalendarHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.service);
        depot.inject(Arc::clone(&self.clock));
    }
}

/// ## Summary
/// Retrieves the catalog store from the depot.
///
/// ## Errors
/// Returns an error if no store was injected.
pub fn get_catalog_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn CatalogStore>> {
    depot
        .obtain::<Arc<dyn CatalogStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Catalog store not found in depot").into())
}

/// ## Summary
/// Retrieves the calendar service from the depot.
///
/// ## Errors
/// Returns an error if no service was injected.
pub fn get_calendar_from_depot(depot: &salvo::Depot) -> AppResult<CalendarService> {
    depot
        .obtain::<CalendarService>()
        .copied()
        .map_err(|_err| CoreError::InvariantViolation("Calendar service not found in depot").into())
}

/// ## Summary
/// Retrieves the clock from the depot.
///
/// ## Errors
/// Returns an error if no clock was injected.
pub fn get_clock_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn Clock>> {
    depot
        .obtain::<Arc<dyn Clock>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Clock not found in depot").into())
}
