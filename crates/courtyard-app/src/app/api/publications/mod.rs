//! `/api/publications/{id}/moderation`

use courtyard_service::catalog::Publication;
use courtyard_service::moderation::{ModerationAction, moderate};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use super::extract::{acting_resident, uuid_param};
use crate::error::{AppError, AppResult};
use crate::state::get_catalog_from_depot;

/// ## Summary
/// Moderation request payload
#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    pub action: ModerationAction,
}

/// ## Summary
/// POST /api/publications/{id}/moderation - moves a publication through the
/// draft, pending, published and rejected states.
///
/// ## Errors
/// Returns HTTP 401 without a known acting resident, HTTP 403 if the actor
/// may not perform the action, HTTP 404 for an unknown publication and
/// HTTP 412 if the publication's status does not allow the action.
#[handler]
async fn moderation(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Publication>> {
    let publication_id = uuid_param(req, "id")?;
    let actor = acting_resident(req, depot).await?;

    let request: ModerationRequest = req.parse_json().await.map_err(|err| {
        tracing::debug!(error = %err, "Failed to parse moderation request");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let store = get_catalog_from_depot(depot)?;
    let publication = moderate(store.as_ref(), &actor, publication_id, request.action).await?;
    Ok(Json(publication))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("publications/{id}/moderation").post(moderation)
}
