//! # Application Events
//!
//! Results of async work sent back to the event consumer. Membership events
//! carry the club id so a failure can revert exactly the optimistic change
//! that started it.

use shared::{Club, MembershipActionResponse};

use crate::auth::ClassifyOutcome;
use crate::core::error::AuthError;
use crate::session::Session;

/// Async task results sent to the event consumer
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Sign-in-method lookup completed
    ClassifyResult(Result<ClassifyOutcome, AuthError>),
    /// Password sign-in completed
    SignInResult(Result<Session, AuthError>),
    /// Account creation completed
    SignUpResult(Result<Session, AuthError>),
    /// Browser sign-in completed
    GoogleSignInResult(Result<Session, AuthError>),
    /// Password-reset mail request completed
    PasswordResetResult(Result<(), AuthError>),
    /// Join call completed
    JoinResult {
        club_id: String,
        result: Result<MembershipActionResponse, AuthError>,
    },
    /// Leave call completed
    LeaveResult {
        club_id: String,
        result: Result<MembershipActionResponse, AuthError>,
    },
    /// Joined-club details fetched
    JoinedClubsLoaded(Result<Vec<Club>, AuthError>),
    /// The session observer reported a sign-in, sign-out, or token refresh
    SessionChanged(Option<Session>),
}
