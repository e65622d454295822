//! # Membership Handlers
//!
//! Join/leave handlers with the optimistic-update contract: the local list
//! changes immediately, the snapshot is parked with the in-flight record,
//! and a failure event restores it exactly.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use crate::app::events::AppEvent;
use crate::app::state::{AppState, InflightMembership};
use crate::app::Services;

/// Handle a join button click on a club card.
pub(crate) fn handle_join_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    club_id: String,
) {
    {
        let mut state = state.write();
        if state.membership_busy() {
            return;
        }
        if state.session.is_none() {
            state.last_error = Some("Sign in to join clubs".to_string());
            return;
        }
        let snapshot = state.my_clubs.optimistic_add(&club_id);
        state.membership_inflight = Some(InflightMembership {
            club_id: club_id.clone(),
            snapshot,
        });
    }

    tokio::spawn(async move {
        let result = services.membership.join_club(&club_id).await;
        let _ = event_tx.send(AppEvent::JoinResult { club_id, result }).await;
    });
}

/// Handle a leave button click on a club card.
pub(crate) fn handle_leave_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    club_id: String,
) {
    {
        let mut state = state.write();
        if state.membership_busy() {
            return;
        }
        if state.session.is_none() {
            state.last_error = Some("Sign in to manage your clubs".to_string());
            return;
        }
        let snapshot = state.my_clubs.optimistic_remove(&club_id);
        state.membership_inflight = Some(InflightMembership {
            club_id: club_id.clone(),
            snapshot,
        });
    }

    tokio::spawn(async move {
        let result = services.membership.leave_club(&club_id).await;
        let _ = event_tx.send(AppEvent::LeaveResult { club_id, result }).await;
    });
}

/// Refresh the My Clubs view from the server.
pub(crate) fn load_joined_clubs(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
) {
    if state.read().session.is_none() {
        return;
    }

    tokio::spawn(async move {
        let result = services.membership.joined_clubs().await;
        let _ = event_tx.send(AppEvent::JoinedClubsLoaded(result)).await;
    });
}
