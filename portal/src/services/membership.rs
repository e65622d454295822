//! # Membership Sync Client
//!
//! Join/leave a club on behalf of the current session, keeping the local
//! joined-list view consistent with the server.
//!
//! The list state is a client-side cache of the server's membership edges:
//! callers apply the change optimistically, keep the snapshot the mutation
//! returns, and restore it exactly when the call fails. After success the
//! optimistic state is authoritative until the next full load. Calls are
//! never retried automatically, and no idempotency key is sent.

use std::sync::Arc;

use shared::{Club, MembershipActionResponse};

use crate::core::error::{AuthError, Result};
use crate::core::service::{ClubsApi, IdentityService};
use crate::session::SessionObserver;

/// Pre-mutation state captured by an optimistic update, for exact
/// restoration on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubListSnapshot(Vec<String>);

/// The joined-club ids backing a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubList {
    joined: Vec<String>,
}

impl ClubList {
    /// Build from a server response, dropping duplicate ids while keeping
    /// first-seen order.
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::default();
        for id in ids {
            if !list.contains(&id) {
                list.joined.push(id);
            }
        }
        list
    }

    pub fn ids(&self) -> &[String] {
        &self.joined
    }

    pub fn contains(&self, club_id: &str) -> bool {
        self.joined.iter().any(|id| id == club_id)
    }

    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }

    /// Add the id ahead of the server call; the id never appears twice.
    pub fn optimistic_add(&mut self, club_id: &str) -> ClubListSnapshot {
        let snapshot = ClubListSnapshot(self.joined.clone());
        if !self.contains(club_id) {
            self.joined.push(club_id.to_string());
        }
        snapshot
    }

    /// Remove the id ahead of the server call.
    pub fn optimistic_remove(&mut self, club_id: &str) -> ClubListSnapshot {
        let snapshot = ClubListSnapshot(self.joined.clone());
        self.joined.retain(|id| id != club_id);
        snapshot
    }

    /// Restore the exact pre-call state after a failed call.
    pub fn restore(&mut self, snapshot: ClubListSnapshot) {
        self.joined = snapshot.0;
    }
}

/// Performs the join/leave REST calls for the active session.
///
/// A fresh bearer token is obtained from the session observer for every
/// call; tokens are never cached across calls since they may expire.
#[derive(Clone)]
pub struct MembershipSync {
    api: Arc<dyn ClubsApi>,
    identity: Arc<dyn IdentityService>,
    observer: SessionObserver,
}

impl MembershipSync {
    pub fn new(
        api: Arc<dyn ClubsApi>,
        identity: Arc<dyn IdentityService>,
        observer: SessionObserver,
    ) -> Self {
        Self {
            api,
            identity,
            observer,
        }
    }

    async fn bearer(&self) -> Result<String> {
        match self.observer.fresh_bearer_token(self.identity.as_ref()).await? {
            Some(token) => Ok(token),
            None => Err(AuthError::MembershipActionFailed(
                "you are signed out".to_string(),
            )),
        }
    }

    /// Join a club. Requires an active session.
    pub async fn join_club(&self, club_id: &str) -> Result<MembershipActionResponse> {
        let token = self.bearer().await?;
        self.api
            .join_club(&token, club_id)
            .await
            .map_err(AuthError::MembershipActionFailed)
    }

    /// Leave a club. Requires an active session.
    pub async fn leave_club(&self, club_id: &str) -> Result<MembershipActionResponse> {
        let token = self.bearer().await?;
        self.api
            .leave_club(&token, club_id)
            .await
            .map_err(AuthError::MembershipActionFailed)
    }

    /// Full details of the joined clubs, for the My Clubs view.
    pub async fn joined_clubs(&self) -> Result<Vec<Club>> {
        let token = self.bearer().await?;
        self.api
            .joined_clubs(&token)
            .await
            .map_err(AuthError::MembershipActionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::{tokens_for, MockClubsApi, MockIdentity};
    use crate::session::Session;

    fn signed_in_observer() -> SessionObserver {
        let observer = SessionObserver::new();
        observer
            .publish(Session::from_tokens(&tokens_for("slug@ucsc.edu")))
            .unwrap();
        observer
    }

    fn sync_with(api: Arc<MockClubsApi>, observer: SessionObserver) -> MembershipSync {
        MembershipSync::new(
            api as Arc<dyn ClubsApi>,
            Arc::new(MockIdentity::new()),
            observer,
        )
    }

    #[test]
    fn test_optimistic_add_is_exactly_once() {
        let mut list = ClubList::from_ids(["club1".to_string()]);

        list.optimistic_add("club2");
        list.optimistic_add("club2");

        assert_eq!(list.ids(), ["club1".to_string(), "club2".to_string()]);
    }

    #[test]
    fn test_failed_leave_restores_exact_state() {
        let mut list =
            ClubList::from_ids(["club1".to_string(), "club2".to_string(), "club3".to_string()]);
        let before = list.clone();

        let snapshot = list.optimistic_remove("club2");
        assert!(!list.contains("club2"));

        list.restore(snapshot);
        assert_eq!(list, before);
    }

    #[test]
    fn test_from_ids_drops_duplicates() {
        let list = ClubList::from_ids([
            "club1".to_string(),
            "club2".to_string(),
            "club1".to_string(),
        ]);
        assert_eq!(list.ids(), ["club1".to_string(), "club2".to_string()]);
    }

    #[tokio::test]
    async fn test_join_requires_active_session() {
        let api = Arc::new(MockClubsApi::new());
        let sync = sync_with(Arc::clone(&api), SessionObserver::new());

        let result = sync.join_club("club123").await;

        assert!(matches!(result, Err(AuthError::MembershipActionFailed(_))));
        assert!(api.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_join_sends_fresh_bearer_per_call() {
        let api = Arc::new(MockClubsApi::new());
        let sync = sync_with(Arc::clone(&api), signed_in_observer());

        sync.join_club("club123").await.unwrap();
        sync.leave_club("club123").await.unwrap();

        let calls = api.calls.lock();
        assert_eq!(calls.len(), 2);
        // The stored mock token is not a decodable JWT, so each call minted
        // a new one through the refresh exchange
        assert_eq!(calls[0].1, "minted-token-1");
        assert_eq!(calls[1].1, "minted-token-2");
        assert_eq!(calls[1].0, "left");
    }

    #[tokio::test]
    async fn test_failed_join_surfaces_server_detail() {
        let api = Arc::new(MockClubsApi::new().with_failure("server error"));
        let sync = sync_with(api, signed_in_observer());

        let result = sync.join_club("club123").await;

        assert_eq!(
            result,
            Err(AuthError::MembershipActionFailed("server error".to_string()))
        );
    }
}
