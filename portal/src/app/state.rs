//! # Application State Types
//!
//! Page-level state for the entry screen and the club list views. One
//! writer at a time: handlers mutate under the lock before spawning work,
//! and [`crate::app::event_handler`] applies results on the event consumer.

use shared::Club;

use crate::auth::AuthFlow;
use crate::services::membership::{ClubList, ClubListSnapshot};
use crate::session::Session;

/// An outstanding join/leave call and the state to restore if it fails.
#[derive(Debug)]
pub struct InflightMembership {
    pub club_id: String,
    pub snapshot: ClubListSnapshot,
}

/// Shared application state.
#[derive(Default)]
pub struct AppState {
    /// Entry-screen form
    pub auth: AuthFlow,
    /// Set while an auth operation is outstanding; the triggering control
    /// stays disabled until the result event clears it
    pub auth_busy: bool,
    /// Snapshot of the active session, kept in sync by session-change events
    pub session: Option<Session>,
    /// Joined-club ids backing the My Clubs view
    pub my_clubs: ClubList,
    /// Full club records for the My Clubs view
    pub joined_club_details: Vec<Club>,
    /// At most one join/leave call in flight per view
    pub membership_inflight: Option<InflightMembership>,
    /// One-shot success notification
    pub notice: Option<String>,
    /// One-shot failure notification
    pub last_error: Option<String>,
}

impl AppState {
    pub fn membership_busy(&self) -> bool {
        self.membership_inflight.is_some()
    }

    /// Take the pending success notification, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Take the pending failure notification, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}
