//! Records the calendar and back-office rules read and write.

pub mod memory;

use courtyard_calendar::EventSchedule;
use courtyard_core::types::{ListingKind, PublicationKind, PublicationStatus, ResidentRole};
use salvo::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceResult;

pub use memory::MemoryCatalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: Uuid,
    pub display_name: String,
    pub role: ResidentRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: PublicationKind,
    pub title: String,
    pub status: PublicationStatus,
    /// Present on events only.
    #[serde(default)]
    pub schedule: Option<EventSchedule>,
}

impl Publication {
    /// ## Summary
    /// Schedule of an event publication; `None` for other kinds.
    #[must_use]
    pub fn event_schedule(&self) -> Option<&EventSchedule> {
        if self.kind == PublicationKind::Event {
            self.schedule.as_ref()
        } else {
            None
        }
    }

    /// Published event that can appear in calendar views.
    #[must_use]
    pub fn is_listed_event(&self) -> bool {
        self.status == PublicationStatus::Published && self.event_schedule().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: ListingKind,
    pub title: String,
}

/// Initial contents of a catalog, as stored in the seed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Content authored by one resident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentCounts {
    /// Events and announcements.
    pub publications: usize,
    pub listings: usize,
    pub news: usize,
}

impl ContentCounts {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.publications == 0 && self.listings == 0 && self.news == 0
    }
}

impl std::fmt::Display for ContentCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} publications, {} listings, {} news",
            self.publications, self.listings, self.news
        )
    }
}

/// Storage behind the portal's business rules.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn resident(&self, id: Uuid) -> ServiceResult<Option<Resident>>;

    async fn publication(&self, id: Uuid) -> ServiceResult<Option<Publication>>;

    /// Published publications of kind event carrying a schedule.
    async fn published_events(&self) -> ServiceResult<Vec<Publication>>;

    /// ## Summary
    /// Moves a publication from `from` to `to` if it is still in `from`.
    ///
    /// ## Errors
    /// `NotFound` for an unknown publication, `PreconditionFailed` if its
    /// status is no longer `from`.
    async fn transition_publication(
        &self,
        id: Uuid,
        from: PublicationStatus,
        to: PublicationStatus,
    ) -> ServiceResult<Publication>;

    /// ## Summary
    /// Deletes every listed resident that authors no content, or none at all.
    ///
    /// ## Errors
    /// `NotFound` if any resident is unknown, `DeletionBlocked` listing every
    /// resident that still authors content.
    async fn delete_residents(&self, ids: &[Uuid]) -> ServiceResult<Vec<Resident>>;
}
