//! Administrative resident deletion.

use courtyard_service::catalog::Resident;
use courtyard_service::residents::{delete_resident, delete_residents};
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::api::extract::{acting_resident, uuid_param};
use crate::error::{AppError, AppResult};
use crate::state::get_catalog_from_depot;

/// ## Summary
/// Bulk delete request payload
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: Vec<Resident>,
}

/// ## Summary
/// DELETE /api/admin/residents/{id}
///
/// ## Errors
/// Returns HTTP 403 unless the actor is another admin, HTTP 404 for an
/// unknown resident and HTTP 412 with the blocking counts if the resident
/// still authors publications, listings or news.
#[handler]
async fn delete_one(req: &mut Request, depot: &mut Depot) -> AppResult<Json<DeletedResponse>> {
    let resident_id = uuid_param(req, "id")?;
    let actor = acting_resident(req, depot).await?;
    let store = get_catalog_from_depot(depot)?;

    let removed = delete_resident(store.as_ref(), &actor, resident_id).await?;
    Ok(Json(DeletedResponse {
        deleted: vec![removed],
    }))
}

/// ## Summary
/// POST /api/admin/residents/bulk-delete - deletes all listed residents or,
/// if any of them is blocked or unknown, none.
///
/// ## Errors
/// As for single deletion; HTTP 400 for an empty or malformed body.
#[handler]
async fn bulk_delete(req: &mut Request, depot: &mut Depot) -> AppResult<Json<DeletedResponse>> {
    let actor = acting_resident(req, depot).await?;

    let request: BulkDeleteRequest = req.parse_json().await.map_err(|err| {
        tracing::debug!(error = %err, "Failed to parse bulk delete request");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let store = get_catalog_from_depot(depot)?;
    let deleted = delete_residents(store.as_ref(), &actor, &request.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("residents")
        .push(Router::with_path("bulk-delete").post(bulk_delete))
        .push(Router::with_path("{id}").delete(delete_one))
}
