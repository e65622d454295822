//! # Event Handler
//!
//! Applies async results to the application state. Runs on the single
//! event consumer, so every state transition here is serialized; the write
//! lock is taken per event for minimal duration.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::services::membership::ClubList;

/// Apply one event to the state.
pub fn apply_event(state: &Arc<RwLock<AppState>>, event: AppEvent) {
    let mut state = state.write();

    match event {
        AppEvent::ClassifyResult(result) => {
            state.auth_busy = false;
            match result {
                Ok(outcome) => {
                    state.auth.apply_outcome(outcome);
                }
                Err(err) => {
                    state.last_error = Some(err.to_string());
                }
            }
        }
        AppEvent::SignInResult(result) | AppEvent::GoogleSignInResult(result) => {
            state.auth_busy = false;
            if let Err(err) = result {
                state.last_error = Some(err.to_string());
            }
            // The session itself arrives through SessionChanged
        }
        AppEvent::SignUpResult(result) => {
            state.auth_busy = false;
            match result {
                Ok(_) => {
                    state.notice = Some("Account created!".to_string());
                }
                Err(err) => {
                    state.last_error = Some(err.to_string());
                }
            }
        }
        AppEvent::PasswordResetResult(result) => {
            state.auth_busy = false;
            match result {
                Ok(()) => {
                    state.notice = Some("Password reset email sent".to_string());
                }
                Err(err) => {
                    state.last_error = Some(err.to_string());
                }
            }
        }
        AppEvent::JoinResult { club_id, result } | AppEvent::LeaveResult { club_id, result } => {
            // A result racing a sign-out has nothing to update: the view it
            // belongs to is gone
            if state.session.is_none() {
                state.membership_inflight = None;
                return;
            }

            let inflight = state.membership_inflight.take();
            match result {
                Ok(response) => {
                    state.notice = Some(response.message);
                }
                Err(err) => {
                    if let Some(inflight) = inflight.filter(|i| i.club_id == club_id) {
                        state.my_clubs.restore(inflight.snapshot);
                    }
                    state.last_error = Some(err.to_string());
                }
            }
        }
        AppEvent::JoinedClubsLoaded(result) => match result {
            Ok(clubs) => {
                state.my_clubs = ClubList::from_ids(clubs.iter().map(|c| c.club_id.clone()));
                state.joined_club_details = clubs;
            }
            Err(err) => {
                state.last_error = Some(err.to_string());
            }
        },
        AppEvent::SessionChanged(session) => {
            let signed_out = session.is_none();
            state.session = session;
            if signed_out {
                state.my_clubs = ClubList::default();
                state.joined_club_details.clear();
                state.membership_inflight = None;
            }
        }
    }
}
