//! In-memory catalog seeded from a JSON document.

use std::collections::HashSet;
use std::path::Path;

use courtyard_core::types::{PublicationKind, PublicationStatus};
use salvo::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogSeed, CatalogStore, ContentCounts, Publication, Resident};
use crate::error::{ServiceError, ServiceResult};
use crate::residents::{BlockedResident, DeletionBlockers};

pub struct MemoryCatalog {
    data: RwLock<CatalogSeed>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(seed: CatalogSeed) -> Self {
        for publication in &seed.publications {
            check_schedule(publication);
        }
        tracing::debug!(
            residents = seed.residents.len(),
            publications = seed.publications.len(),
            listings = seed.listings.len(),
            "Catalog initialised"
        );
        Self {
            data: RwLock::new(seed),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(CatalogSeed::default())
    }

    /// ## Summary
    /// Reads a JSON seed document.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read or is not a valid seed.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let seed: CatalogSeed = serde_json::from_str(&text)?;
        Ok(Self::new(seed))
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

/// Logs events whose stored schedule breaks the recurrence invariants.
fn check_schedule(publication: &Publication) {
    match (publication.kind, &publication.schedule) {
        (PublicationKind::Event, None) => {
            tracing::warn!(publication_id = %publication.id, "Event has no schedule");
        }
        (PublicationKind::Event, Some(schedule)) => {
            if schedule.start_at.is_none() {
                tracing::warn!(publication_id = %publication.id, "Event has no start");
            }
            if schedule.is_recurring() && schedule.recurrence_rule.is_none() {
                tracing::warn!(
                    publication_id = %publication.id,
                    kind = ?schedule.recurrence_kind,
                    "Recurring event has no recurrence rule"
                );
            }
            if let Err(err) = schedule.rule() {
                tracing::warn!(
                    publication_id = %publication.id,
                    error = %err,
                    "Event recurrence rule is unusable"
                );
            }
        }
        (_, Some(_)) => {
            tracing::debug!(
                publication_id = %publication.id,
                kind = %publication.kind,
                "Schedule on a non-event publication is ignored"
            );
        }
        (_, None) => {}
    }
}

fn count_content(data: &CatalogSeed, author_id: Uuid) -> ContentCounts {
    let mut counts = ContentCounts {
        listings: data
            .listings
            .iter()
            .filter(|listing| listing.author_id == author_id)
            .count(),
        ..ContentCounts::default()
    };
    for publication in data.publications.iter().filter(|p| p.author_id == author_id) {
        match publication.kind {
            PublicationKind::News => counts.news += 1,
            PublicationKind::Event | PublicationKind::Announcement => counts.publications += 1,
        }
    }
    counts
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn resident(&self, id: Uuid) -> ServiceResult<Option<Resident>> {
        let data = self.data.read().await;
        Ok(data.residents.iter().find(|r| r.id == id).cloned())
    }

    async fn publication(&self, id: Uuid) -> ServiceResult<Option<Publication>> {
        let data = self.data.read().await;
        Ok(data.publications.iter().find(|p| p.id == id).cloned())
    }

    async fn published_events(&self) -> ServiceResult<Vec<Publication>> {
        let data = self.data.read().await;
        Ok(data
            .publications
            .iter()
            .filter(|p| p.is_listed_event())
            .cloned()
            .collect())
    }

    async fn transition_publication(
        &self,
        id: Uuid,
        from: PublicationStatus,
        to: PublicationStatus,
    ) -> ServiceResult<Publication> {
        let mut data = self.data.write().await;
        let publication = data
            .publications
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("publication {id}")))?;

        if publication.status != from {
            return Err(ServiceError::PreconditionFailed(format!(
                "publication {id} is {}, expected {from}",
                publication.status
            )));
        }

        publication.status = to;
        Ok(publication.clone())
    }

    async fn delete_residents(&self, ids: &[Uuid]) -> ServiceResult<Vec<Resident>> {
        let mut data = self.data.write().await;

        let mut blocked = Vec::new();
        for id in ids {
            if !data.residents.iter().any(|r| r.id == *id) {
                return Err(ServiceError::NotFound(format!("resident {id}")));
            }
            let counts = count_content(&data, *id);
            if !counts.is_empty() {
                blocked.push(BlockedResident {
                    resident_id: *id,
                    counts,
                });
            }
        }
        if !blocked.is_empty() {
            return Err(ServiceError::DeletionBlocked(DeletionBlockers(blocked)));
        }

        let doomed: HashSet<Uuid> = ids.iter().copied().collect();
        let (removed, kept) = std::mem::take(&mut data.residents)
            .into_iter()
            .partition(|r| doomed.contains(&r.id));
        data.residents = kept;
        Ok(removed)
    }
}
