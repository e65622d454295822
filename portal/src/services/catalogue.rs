//! # Catalogue Reads
//!
//! Read-only scans over the document store for the browse pages: the club
//! catalogue, the event calendar, and the club post feed. Clubs are
//! created and edited by the officer tooling; nothing here writes.

use std::sync::Arc;

use lib_store::{Direction, StoreClient, StoreError, CLUBS, CLUB_POSTS, EVENTS};
use shared::{Club, ClubEvent, ClubPost};

#[derive(Clone)]
pub struct Catalogue {
    store: Arc<StoreClient>,
}

impl Catalogue {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    /// All clubs, ordered by name for the Explore page.
    pub async fn clubs(&self, bearer: Option<&str>) -> Result<Vec<Club>, StoreError> {
        self.store
            .run_query(&CLUBS, "name", Direction::Ascending, None, bearer)
            .await
    }

    /// One club's profile, `None` when the id is unknown.
    pub async fn club(&self, club_id: &str, bearer: Option<&str>) -> Result<Option<Club>, StoreError> {
        self.store.get_document(&CLUBS, club_id, bearer).await
    }

    /// Events ordered by start time for the calendar view.
    pub async fn upcoming_events(
        &self,
        limit: Option<u32>,
        bearer: Option<&str>,
    ) -> Result<Vec<ClubEvent>, StoreError> {
        self.store
            .run_query(&EVENTS, "startTime", Direction::Ascending, limit, bearer)
            .await
    }

    /// Newest club posts first for the dashboard feed.
    pub async fn recent_posts(
        &self,
        limit: Option<u32>,
        bearer: Option<&str>,
    ) -> Result<Vec<ClubPost>, StoreError> {
        self.store
            .run_query(&CLUB_POSTS, "createdAt", Direction::Descending, limit, bearer)
            .await
    }
}
