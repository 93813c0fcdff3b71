//! `/api/events/{id}/occurrences`

use chrono::NaiveDate;
use courtyard_service::calendar::EventOccurrences;
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use super::extract::uuid_param;
use crate::error::{AppError, AppResult};
use crate::state::{get_calendar_from_depot, get_catalog_from_depot};

fn date_query(req: &Request, name: &str) -> AppResult<NaiveDate> {
    let raw: String = req
        .query(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing query parameter {name}")))?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| AppError::BadRequest(format!("{name}: expected YYYY-MM-DD, {err}")))
}

/// ## Summary
/// GET /api/events/{id}/occurrences?from=YYYY-MM-DD&to=YYYY-MM-DD - every
/// occurrence date of a published event, both bounds inclusive.
///
/// ## Errors
/// Returns HTTP 400 for malformed or unrepresentable dates and a reversed
/// range, HTTP 404 if no published event has this id, HTTP 500 if the stored
/// recurrence rule cannot be expanded.
#[handler]
async fn occurrences(req: &mut Request, depot: &mut Depot) -> AppResult<Json<EventOccurrences>> {
    let event_id = uuid_param(req, "id")?;
    let from = date_query(req, "from")?;
    let to = date_query(req, "to")?;

    let calendar = get_calendar_from_depot(depot)?;
    let store = get_catalog_from_depot(depot)?;

    let event_occurrences = calendar
        .fetch_event_occurrences(store.as_ref(), event_id, from, to)
        .await?;
    tracing::debug!(%event_id, count = event_occurrences.dates.len(), "Occurrences listed");
    Ok(Json(event_occurrences))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("events/{id}/occurrences").get(occurrences)
}
