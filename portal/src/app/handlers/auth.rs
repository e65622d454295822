//! # Authentication Handlers
//!
//! Handlers for the entry-screen actions: email classification, sign-in,
//! sign-up, browser sign-in, password reset, and back navigation.
//!
//! Repeated clicks are de-duplicated here, not in the submitter: the busy
//! flag stays set for the whole round trip and every handler bails out
//! while it is.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::app::Services;
use crate::auth::classifier;

/// Handle the continue button on the email step.
pub(crate) fn handle_continue_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    email: String,
) {
    {
        let mut state = state.write();
        if state.auth_busy {
            return;
        }
        if email.trim().is_empty() {
            state.auth.notice = Some("Email is required".to_string());
            return;
        }
        state.auth_busy = true;
        state.auth.email = email.trim().to_string();
    }

    tokio::spawn(async move {
        let result = classifier::classify_email(services.identity.as_ref(), &email).await;
        let _ = event_tx.send(AppEvent::ClassifyResult(result)).await;
    });
}

/// Handle the sign-in button click.
pub(crate) fn handle_sign_in_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    email: String,
    password: String,
) {
    {
        let mut state = state.write();
        if state.auth_busy {
            return;
        }
        if email.is_empty() || password.is_empty() {
            state.last_error = Some("Email and password required".to_string());
            return;
        }
        state.auth_busy = true;
    }

    tokio::spawn(async move {
        let result = services.submitter.sign_in(&email, &password).await;
        let _ = event_tx.send(AppEvent::SignInResult(result)).await;
    });
}

/// Handle the sign-up button click.
///
/// All form fields travel together; the submitter re-checks the local
/// preconditions before any network call.
#[allow(clippy::too_many_arguments)]
pub(crate) fn handle_sign_up_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    email: String,
    password: String,
    confirm_password: String,
    display_name: Option<String>,
    notify_on_new_post: bool,
) {
    {
        let mut state = state.write();
        if state.auth_busy {
            return;
        }
        if email.is_empty() || password.is_empty() {
            state.last_error = Some("Email and password required".to_string());
            return;
        }
        state.auth_busy = true;
    }

    tokio::spawn(async move {
        let result = services
            .submitter
            .sign_up(
                &email,
                &password,
                &confirm_password,
                display_name,
                notify_on_new_post,
            )
            .await;
        let _ = event_tx.send(AppEvent::SignUpResult(result)).await;
    });
}

/// Handle the "Continue with Google" button click.
pub(crate) fn handle_google_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
) {
    let google = {
        let mut state = state.write();
        if state.auth_busy {
            return;
        }
        match services.google.as_ref() {
            Some(google) => {
                state.auth_busy = true;
                Arc::clone(google)
            }
            None => {
                state.last_error = Some("Google sign-in is not configured".to_string());
                return;
            }
        }
    };

    tokio::spawn(async move {
        let result = services.submitter.sign_in_with_google(google.as_ref()).await;
        let _ = event_tx.send(AppEvent::GoogleSignInResult(result)).await;
    });
}

/// Handle the forgot-password action.
pub(crate) fn handle_reset_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    services: Arc<Services>,
    email: String,
) {
    {
        let mut state = state.write();
        if state.auth_busy {
            return;
        }
        state.auth_busy = true;
    }

    tokio::spawn(async move {
        let result = services.submitter.request_password_reset(&email).await;
        let _ = event_tx.send(AppEvent::PasswordResetResult(result)).await;
    });
}

/// Return to the email step, clearing password fields.
pub(crate) fn handle_back_click(state: Arc<RwLock<AppState>>) {
    state.write().auth.handle_back();
}

/// Handle the sign-out action. State cleanup follows from the observer's
/// session-change notification.
pub(crate) fn handle_sign_out_click(services: Arc<Services>) {
    services.observer.sign_out();
}
