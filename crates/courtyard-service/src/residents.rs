//! Administrative resident removal.
//!
//! A resident who still authors publications, listings or news cannot be
//! removed; the refusal carries the counts so the operator knows what to
//! reassign or delete first.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{CatalogStore, ContentCounts, Resident};
use crate::error::{ServiceError, ServiceResult};
use crate::moderation::Actor;

/// A resident whose content blocks deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedResident {
    pub resident_id: Uuid,
    pub counts: ContentCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeletionBlockers(pub Vec<BlockedResident>);

impl std::fmt::Display for DeletionBlockers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, blocked) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "resident {} has {}", blocked.resident_id, blocked.counts)?;
        }
        Ok(())
    }
}

/// ## Summary
/// Looks up the resident acting on a request.
///
/// ## Errors
/// Returns `ServiceError::NotAuthenticated` if no such resident exists.
pub async fn resolve_actor(store: &dyn CatalogStore, resident_id: Uuid) -> ServiceResult<Actor> {
    let resident = store.resident(resident_id).await?.ok_or_else(|| {
        tracing::debug!(%resident_id, "Unknown acting resident");
        ServiceError::NotAuthenticated
    })?;
    Ok(Actor {
        resident_id: resident.id,
        role: resident.role,
    })
}

/// ## Summary
/// Deletes one resident.
///
/// ## Errors
/// See [`delete_residents`].
pub async fn delete_resident(
    store: &dyn CatalogStore,
    actor: &Actor,
    resident_id: Uuid,
) -> ServiceResult<Resident> {
    let mut removed = delete_residents(store, actor, &[resident_id]).await?;
    removed
        .pop()
        .ok_or(ServiceError::InvariantViolation("deleted resident missing from result"))
}

/// ## Summary
/// Deletes every listed resident, or none of them.
///
/// ## Errors
/// - `AuthorizationError` unless the actor is an admin, or if the actor is
///   among the residents to delete.
/// - `ValidationError` for an empty list.
/// - `NotFound` if any resident is unknown.
/// - `DeletionBlocked` if any resident still authors content.
#[tracing::instrument(skip(store, ids), fields(actor = %actor.resident_id, count = ids.len()))]
pub async fn delete_residents(
    store: &dyn CatalogStore,
    actor: &Actor,
    ids: &[Uuid],
) -> ServiceResult<Vec<Resident>> {
    if actor.role != courtyard_core::types::ResidentRole::Admin {
        return Err(ServiceError::AuthorizationError(
            "only administrators may delete residents".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    if unique.is_empty() {
        return Err(ServiceError::ValidationError(
            "no residents to delete".to_string(),
        ));
    }
    if unique.contains(&actor.resident_id) {
        return Err(ServiceError::AuthorizationError(
            "administrators cannot delete themselves".to_string(),
        ));
    }

    match store.delete_residents(&unique).await {
        Ok(removed) => {
            tracing::info!(removed = removed.len(), "Residents deleted");
            Ok(removed)
        }
        Err(ServiceError::DeletionBlocked(blockers)) => {
            tracing::warn!(%blockers, "Resident deletion refused");
            Err(ServiceError::DeletionBlocked(blockers))
        }
        Err(err) => Err(err),
    }
}
