//! # Portal Error Types
//!
//! The closed error set surfaced to the user. Every failure of the auth and
//! membership flows maps to exactly one of these variants; the `Display`
//! strings are the user-facing one-shot notifications. Nothing here is
//! retried automatically.

use lib_identity::{GoogleFlowError, IdentityError};
use lib_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email outside the institutional domain, caught locally before any
    /// network call
    #[error("Please use your UCSC email address (@ucsc.edu)")]
    InvalidDomain,

    /// Provider-reported malformed email address
    #[error("That email address is not valid")]
    InvalidEmail,

    /// Wrong password, unknown account, or stale credential
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Sign-up attempted for an already registered address
    #[error("An account already exists for this email. Sign in instead")]
    AccountExists,

    /// Password policy violation, local or provider-reported
    #[error("Password must be at least 6 characters")]
    WeakPassword,

    /// Local confirm-password check failed
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Third-party sign-in aborted by the user
    #[error("Sign-in was cancelled before it finished")]
    PopupCancelled,

    /// The browser for the third-party sign-in could not be opened
    #[error("The sign-in window could not be opened")]
    PopupBlocked,

    /// Provider-side rate limiting
    #[error("Too many attempts. Wait a moment or reset your password")]
    TooManyRequests,

    /// Authentication succeeded but the email is outside the institutional
    /// domain; always accompanied by a forced sign-out
    #[error("That account is outside the UCSC domain and has been signed out")]
    DomainRejected,

    /// The sign-in-method lookup could not produce a verdict; the caller
    /// must not default to any state
    #[error("Could not check that email address, try again: {0}")]
    ClassifierUnavailable(String),

    /// Join/leave call failed; the optimistic list change is reverted
    #[error("Membership update failed: {0}")]
    MembershipActionFailed(String),

    /// Authentication succeeded but the profile record was not written;
    /// profile setup is retryable without re-authenticating
    #[error("Your account was created, but profile setup failed: {0}")]
    ProfileWriteFailed(String),

    /// Unexpected provider or transport failure, surfaced once
    #[error("Authentication service error: {0}")]
    Provider(String),
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => AuthError::InvalidCredentials,
            IdentityError::InvalidEmail => AuthError::InvalidEmail,
            IdentityError::EmailExists => AuthError::AccountExists,
            IdentityError::WeakPassword => AuthError::WeakPassword,
            IdentityError::TooManyRequests => AuthError::TooManyRequests,
            IdentityError::Provider(code) => AuthError::Provider(code),
            IdentityError::Network(msg) | IdentityError::Decode(msg) => AuthError::Provider(msg),
        }
    }
}

impl From<GoogleFlowError> for AuthError {
    fn from(err: GoogleFlowError) -> Self {
        match err {
            GoogleFlowError::Cancelled | GoogleFlowError::Timeout => AuthError::PopupCancelled,
            GoogleFlowError::BrowserLaunch(_) => AuthError::PopupBlocked,
            other => AuthError::Provider(other.to_string()),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::ProfileWriteFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_errors_map_to_taxonomy() {
        assert_eq!(
            AuthError::from(IdentityError::EmailExists),
            AuthError::AccountExists
        );
        assert_eq!(
            AuthError::from(IdentityError::InvalidCredentials),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            AuthError::from(IdentityError::TooManyRequests),
            AuthError::TooManyRequests
        );
    }

    #[test]
    fn test_google_flow_errors_map_to_popup_variants() {
        assert_eq!(
            AuthError::from(GoogleFlowError::Cancelled),
            AuthError::PopupCancelled
        );
        assert_eq!(
            AuthError::from(GoogleFlowError::Timeout),
            AuthError::PopupCancelled
        );
        assert_eq!(
            AuthError::from(GoogleFlowError::BrowserLaunch("no browser".to_string())),
            AuthError::PopupBlocked
        );
    }
}
