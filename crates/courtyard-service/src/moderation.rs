//! Publication moderation workflow.
//!
//! ```text
//! draft ──submit──▶ pending ──approve──▶ published
//!   ▲                 │  │
//!   └────withdraw─────┘  └──reject──▶ rejected ──submit──▶ pending
//! ```
//!
//! Published publications can also be withdrawn back to draft.

use courtyard_core::types::{PublicationStatus, ResidentRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{CatalogStore, Publication};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Submit,
    Approve,
    Reject,
    Withdraw,
}

impl ModerationAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Withdraw => "withdraw",
        }
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resident performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub resident_id: Uuid,
    pub role: ResidentRole,
}

impl Actor {
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// ## Summary
/// Status reached by applying `action` to a publication in `current`.
///
/// ## Errors
/// Returns `ServiceError::PreconditionFailed` if the action is not allowed
/// from `current`.
pub fn next_status(
    current: PublicationStatus,
    action: ModerationAction,
) -> ServiceResult<PublicationStatus> {
    use ModerationAction as A;
    use PublicationStatus as S;

    match (current, action) {
        (S::Draft | S::Rejected, A::Submit) => Ok(S::Pending),
        (S::Pending, A::Approve) => Ok(S::Published),
        (S::Pending, A::Reject) => Ok(S::Rejected),
        (S::Pending | S::Published, A::Withdraw) => Ok(S::Draft),
        _ => Err(ServiceError::PreconditionFailed(format!(
            "cannot {action} a {current} publication"
        ))),
    }
}

/// ## Summary
/// Checks that `actor` may apply `action` to `publication`.
///
/// Authors submit their own work, staff approve and reject, and either may
/// withdraw.
///
/// ## Errors
/// Returns `ServiceError::AuthorizationError` otherwise.
pub fn authorize(
    actor: &Actor,
    publication: &Publication,
    action: ModerationAction,
) -> ServiceResult<()> {
    let is_author = publication.author_id == actor.resident_id;
    let allowed = match action {
        ModerationAction::Submit => is_author,
        ModerationAction::Approve | ModerationAction::Reject => actor.is_staff(),
        ModerationAction::Withdraw => is_author || actor.is_staff(),
    };

    if allowed {
        Ok(())
    } else {
        Err(ServiceError::AuthorizationError(format!(
            "{} resident may not {action} publication {}",
            actor.role, publication.id
        )))
    }
}

/// ## Summary
/// Applies a moderation action and returns the updated publication.
///
/// ## Errors
/// - `NotFound` for an unknown publication.
/// - `AuthorizationError` if the actor may not perform the action.
/// - `PreconditionFailed` if the publication's status does not allow it,
///   including when a concurrent change got there first.
#[tracing::instrument(skip(store), fields(actor = %actor.resident_id))]
pub async fn moderate(
    store: &dyn CatalogStore,
    actor: &Actor,
    publication_id: Uuid,
    action: ModerationAction,
) -> ServiceResult<Publication> {
    let publication = store
        .publication(publication_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("publication {publication_id}")))?;

    authorize(actor, &publication, action)?;
    let target = next_status(publication.status, action)?;

    let updated = store
        .transition_publication(publication_id, publication.status, target)
        .await?;

    tracing::info!(
        from = %publication.status,
        to = %updated.status,
        "Publication moderated"
    );
    Ok(updated)
}
