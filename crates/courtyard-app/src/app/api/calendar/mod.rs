//! `/api/calendar` views.

use courtyard_core::constants::CALENDAR_ROUTE_COMPONENT;
use courtyard_service::calendar::{AgendaSpan, CalendarEntry, MonthGrid};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use crate::error::{AppError, AppResult};
use crate::state::{get_calendar_from_depot, get_catalog_from_depot, get_clock_from_depot};

fn query<T>(req: &Request, name: &str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    req.query::<String>(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|err| AppError::BadRequest(format!("{name}: {err}")))
        })
        .transpose()
}

/// ## Summary
/// GET /api/calendar/agenda?days=7|14 - first occurrence of each event over
/// the next week or fortnight.
///
/// ## Errors
/// Returns HTTP 400 for a span other than 7 or 14 days.
#[handler]
async fn agenda(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<CalendarEntry>>> {
    let span = match query::<u32>(req, "days")? {
        Some(days) => AgendaSpan::try_from(days)?,
        None => AgendaSpan::default(),
    };

    let calendar = get_calendar_from_depot(depot)?;
    let store = get_catalog_from_depot(depot)?;
    let now = get_clock_from_depot(depot)?.now();

    let entries = calendar.fetch_agenda(store.as_ref(), now, span).await?;
    tracing::debug!(days = span.days(), count = entries.len(), "Agenda built");
    Ok(Json(entries))
}

/// ## Summary
/// GET /api/calendar/month?year=YYYY&month=M - month grid, defaulting to the
/// community's current month.
///
/// ## Errors
/// Returns HTTP 400 for a malformed or out-of-range month.
#[handler]
async fn month(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MonthGrid>> {
    let year = query::<i32>(req, "year")?;
    let month_param = query::<u32>(req, "month")?;

    let calendar = get_calendar_from_depot(depot)?;
    let store = get_catalog_from_depot(depot)?;
    let now = get_clock_from_depot(depot)?.now();

    let grid = calendar
        .fetch_month_grid(store.as_ref(), now, year, month_param)
        .await?;
    Ok(Json(grid))
}

/// ## Summary
/// GET /api/calendar/upcoming?limit=N - soonest occurrences from now.
///
/// ## Errors
/// Returns HTTP 400 for a malformed limit.
#[handler]
async fn upcoming(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<CalendarEntry>>> {
    let limit = query::<usize>(req, "limit")?;

    let calendar = get_calendar_from_depot(depot)?;
    let store = get_catalog_from_depot(depot)?;
    let now = get_clock_from_depot(depot)?.now();

    Ok(Json(calendar.fetch_upcoming(store.as_ref(), now, limit).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDAR_ROUTE_COMPONENT)
        .push(Router::with_path("agenda").get(agenda))
        .push(Router::with_path("month").get(month))
        .push(Router::with_path("upcoming").get(upcoming))
}
