//! Seeded in-memory application for handler tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use courtyard_calendar::{EventSchedule, Expander, RecurrenceKind};
use courtyard_core::types::{ListingKind, PublicationKind, PublicationStatus, ResidentRole};
use courtyard_service::calendar::CalendarService;
use courtyard_service::catalog::{CatalogSeed, Listing, MemoryCatalog, Publication, Resident};
use courtyard_service::clock::FixedClock;
use salvo::{Router, Service};
use uuid::Uuid;

use super::routes;
use crate::state::{CalendarHandler, CatalogProviderHandler};

pub fn api_url(path: &str) -> String {
    format!("http://127.0.0.1:5800/api{path}")
}

pub fn instant(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
}

/// A small community at `+03:00`, observed on Monday 2024-06-10 09:00 local.
pub struct TestCatalog {
    pub store: Arc<MemoryCatalog>,
    pub now: DateTime<Utc>,
    pub admin: Uuid,
    pub moderator: Uuid,
    pub author: Uuid,
    pub idle: Uuid,
    /// Tuesdays and Thursdays at 19:00 from 2024-06-04.
    pub yoga: Uuid,
    /// All-day, 2024-03-30 to 2024-04-02.
    pub fair: Uuid,
    pub draft: Uuid,
    pub news: Uuid,
}

impl Default for TestCatalog {
    fn default() -> Self {
        let resident = |name: &str, role| Resident {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            role,
        };
        let admin = resident("Admin", ResidentRole::Admin);
        let moderator = resident("Moderator", ResidentRole::Moderator);
        let author = resident("Author", ResidentRole::Resident);
        let idle = resident("Idle", ResidentRole::Resident);

        let publication = |author_id, kind, title: &str, status, schedule| Publication {
            id: Uuid::new_v4(),
            author_id,
            kind,
            title: title.to_string(),
            status,
            schedule,
        };
        let yoga = publication(
            author.id,
            PublicationKind::Event,
            "Yoga in the yard",
            PublicationStatus::Published,
            Some(EventSchedule {
                start_at: Some(instant("2024-06-04T16:00:00Z")),
                end_at: Some(instant("2024-06-04T17:00:00Z")),
                recurrence_kind: RecurrenceKind::Weekly,
                recurrence_rule: Some("FREQ=WEEKLY;BYDAY=TU,TH".to_string()),
                ..EventSchedule::default()
            }),
        );
        let fair = publication(
            author.id,
            PublicationKind::Event,
            "Spring fair",
            PublicationStatus::Published,
            Some(EventSchedule {
                start_at: Some(instant("2024-03-29T21:00:00Z")),
                end_at: Some(instant("2024-04-01T21:00:00Z")),
                all_day: true,
                ..EventSchedule::default()
            }),
        );
        let draft = publication(
            author.id,
            PublicationKind::Event,
            "Board meeting",
            PublicationStatus::Draft,
            Some(EventSchedule {
                start_at: Some(instant("2024-06-12T15:00:00Z")),
                ..EventSchedule::default()
            }),
        );
        let news = publication(
            moderator.id,
            PublicationKind::News,
            "New bike racks",
            PublicationStatus::Published,
            None,
        );

        let seed = CatalogSeed {
            residents: vec![admin.clone(), moderator.clone(), author.clone(), idle.clone()],
            publications: vec![yoga.clone(), fair.clone(), draft.clone(), news.clone()],
            listings: vec![Listing {
                id: Uuid::new_v4(),
                author_id: author.id,
                kind: ListingKind::Parking,
                title: "Spot near entrance 2".to_string(),
            }],
        };

        Self {
            store: Arc::new(MemoryCatalog::new(seed)),
            now: instant("2024-06-10T06:00:00Z"),
            admin: admin.id,
            moderator: moderator.id,
            author: author.id,
            idle: idle.id,
            yoga: yoga.id,
            fair: fair.id,
            draft: draft.id,
            news: news.id,
        }
    }
}

impl TestCatalog {
    #[must_use]
    pub fn at(mut self, now: &str) -> Self {
        self.now = instant(now);
        self
    }

    pub fn service(&self) -> Service {
        let calendar = CalendarService::new(Expander::new("+03:00".parse().unwrap()));
        let router = Router::new()
            .hoop(CatalogProviderHandler {
                store: self.store.clone(),
            })
            .hoop(CalendarHandler {
                service: calendar,
                clock: Arc::new(FixedClock(self.now)),
            })
            .push(routes().unwrap());
        Service::new(router)
    }
}
