use salvo::http::StatusCode;
use salvo::{Depot, Response, Router, handler};

use crate::state::{get_calendar_from_depot, get_catalog_from_depot};

/// ## Summary
/// Liveness probe. Answers `OK` once the catalog and calendar are wired in,
/// `503` otherwise.
#[handler]
async fn healthcheck(depot: &Depot, res: &mut Response) {
    if get_catalog_from_depot(depot).is_ok() && get_calendar_from_depot(depot).is_ok() {
        res.render("OK");
    } else {
        tracing::warn!("Healthcheck failed, application state missing from depot");
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        res.render("UNAVAILABLE");
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("healthcheck").get(healthcheck)
}
