//! Request extractors shared by the API handlers.

use courtyard_core::constants::RESIDENT_ID_HEADER;
use courtyard_service::error::ServiceError;
use courtyard_service::moderation::Actor;
use courtyard_service::residents::resolve_actor;
use salvo::{Depot, Request};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::get_catalog_from_depot;

/// ## Summary
/// Resident id set by the front proxy.
///
/// ## Errors
/// `NotAuthenticated` if the header is missing, `BadRequest` if it is not a UUID.
pub fn resident_id(req: &Request) -> AppResult<Uuid> {
    let value: String = req
        .header(RESIDENT_ID_HEADER)
        .ok_or(ServiceError::NotAuthenticated)?;
    Uuid::parse_str(value.trim())
        .map_err(|err| AppError::BadRequest(format!("{RESIDENT_ID_HEADER}: {err}")))
}

/// ## Summary
/// Resolves the acting resident against the catalog.
///
/// ## Errors
/// See [`resident_id`]; an unknown resident is `NotAuthenticated`.
pub async fn acting_resident(req: &Request, depot: &Depot) -> AppResult<Actor> {
    let id = resident_id(req)?;
    let store = get_catalog_from_depot(depot)?;
    Ok(resolve_actor(store.as_ref(), id).await?)
}

/// ## Summary
/// Path parameter parsed as a UUID.
///
/// ## Errors
/// `BadRequest` if the parameter is missing or malformed.
pub fn uuid_param(req: &Request, name: &str) -> AppResult<Uuid> {
    let raw: String = req
        .param(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter {name}")))?;
    Uuid::parse_str(&raw).map_err(|err| AppError::BadRequest(format!("{name}: {err}")))
}
