//! # Session Observer
//!
//! Owns the process-wide current-session value for the page lifetime.
//! Consumers read it through [`SessionObserver::subscribe`] and treat every
//! delivered value as a snapshot; the only writers are the auth flow's
//! publish/sign-out calls, so no other code ever mutates session state.
//!
//! A session whose email fails the institutional-domain check is never
//! published: the observer forces a sign-out instead and the caller surfaces
//! [`AuthError::DomainRejected`]. That condition is fatal, not retried.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use lib_identity::rest::{AuthTokens, IdpTokens};
use lib_identity::token;
use parking_lot::{Mutex, RwLock};

use crate::core::error::{AuthError, Result};
use crate::core::service::IdentityService;
use crate::utils::validation;

/// Snapshot of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn from_tokens(tokens: &AuthTokens) -> Self {
        Self {
            user_id: tokens.local_id.clone(),
            email: tokens.email.clone(),
            display_name: tokens.display_name.clone(),
            id_token: tokens.id_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: token::expires_at(&tokens.id_token),
        }
    }

    pub(crate) fn from_idp_tokens(tokens: &IdpTokens) -> Self {
        Self {
            user_id: tokens.local_id.clone(),
            email: tokens.email.clone(),
            display_name: tokens.display_name.clone(),
            id_token: tokens.id_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: token::expires_at(&tokens.id_token),
        }
    }
}

type Callback = Box<dyn Fn(Option<Session>) + Send + Sync>;

struct Inner {
    current: RwLock<Option<Session>>,
    /// Insertion order doubles as delivery order (FIFO per event)
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
}

/// Handle returned by [`SessionObserver::subscribe`].
///
/// `unsubscribe` is idempotent; dropping the handle unsubscribes too, so an
/// unmounted view can never receive a late callback.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Process-wide session owner. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SessionObserver {
    inner: Arc<Inner>,
}

impl Default for SessionObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(None),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Current session snapshot, if any.
    pub fn current(&self) -> Option<Session> {
        self.inner.current.read().clone()
    }

    /// Register for session-change events.
    ///
    /// Fires once immediately with the current state (possibly `None`) and
    /// thereafter on every sign-in, sign-out, and token refresh. Delivery is
    /// serialized under one lock, so callbacks never run concurrently.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Box::new(callback);

        let mut subscribers = self.inner.subscribers.lock();
        // Snapshot under the subscribers lock so the immediate fire cannot
        // interleave with a concurrent publish
        let current = self.inner.current.read().clone();
        callback(current);
        subscribers.push((id, callback));

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn notify(&self, session: Option<&Session>) {
        let subscribers = self.inner.subscribers.lock();
        for (_, callback) in subscribers.iter() {
            callback(session.cloned());
        }
    }

    /// Publish a new session, enforcing the institutional-domain gate.
    ///
    /// A non-conforming email never becomes the active session: the observer
    /// clears any previous session and reports [`AuthError::DomainRejected`].
    pub(crate) fn publish(&self, session: Session) -> Result<Session> {
        if !validation::is_institutional_email(&session.email) {
            tracing::warn!(email = %session.email, "Session rejected by domain gate, forcing sign-out");
            self.sign_out();
            return Err(AuthError::DomainRejected);
        }

        *self.inner.current.write() = Some(session.clone());
        self.notify(Some(&session));
        Ok(session)
    }

    /// Clear the session and notify subscribers. A no-op when already
    /// signed out.
    pub fn sign_out(&self) {
        let cleared = self.inner.current.write().take().is_some();
        if cleared {
            tracing::info!("Signed out");
            self.notify(None);
        }
    }

    /// A bearer token valid for an outbound call right now.
    ///
    /// Returns `Ok(None)` when signed out. A token within a minute of expiry
    /// is replaced through the refresh-token exchange, and the refreshed
    /// session is republished as a token-refresh transition.
    pub async fn fresh_bearer_token(
        &self,
        identity: &dyn IdentityService,
    ) -> Result<Option<String>> {
        let session = match self.current() {
            Some(session) => session,
            None => return Ok(None),
        };

        if token::is_fresh(&session.id_token, Utc::now()) {
            return Ok(Some(session.id_token));
        }

        tracing::debug!("Id token stale, refreshing");
        let refreshed = identity
            .refresh_id_token(&session.refresh_token)
            .await
            .map_err(AuthError::from)?;

        let renewed = Session {
            id_token: refreshed.id_token.clone(),
            refresh_token: refreshed.refresh_token.clone(),
            expires_at: token::expires_at(&refreshed.id_token),
            ..session
        };
        let published = self.publish(renewed)?;
        Ok(Some(published.id_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn session(email: &str) -> Session {
        Session {
            user_id: "uid-1".to_string(),
            email: email.to_string(),
            display_name: None,
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: None,
        }
    }

    #[test]
    fn test_subscribe_fires_immediately_with_no_session() {
        let observer = SessionObserver::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = Arc::clone(&fired);
        let _sub = observer.subscribe(move |current| {
            assert!(current.is_none());
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_publish_notifies_in_subscription_order() {
        let observer = SessionObserver::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_a = Arc::clone(&order);
        let _sub_a = observer.subscribe(move |current| {
            if current.is_some() {
                order_a.lock().push("a");
            }
        });
        let order_b = Arc::clone(&order);
        let _sub_b = observer.subscribe(move |current| {
            if current.is_some() {
                order_b.lock().push("b");
            }
        });

        observer.publish(session("slug@ucsc.edu")).unwrap();

        assert_eq!(*order.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_domain_gate_rejects_and_forces_sign_out() {
        let observer = SessionObserver::new();
        observer.publish(session("slug@ucsc.edu")).unwrap();

        let result = observer.publish(session("intruder@gmail.com"));

        assert_eq!(result, Err(AuthError::DomainRejected));
        assert!(observer.current().is_none());
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_stops_delivery() {
        let observer = SessionObserver::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = Arc::clone(&fired);
        let sub = observer.subscribe(move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        observer.publish(session("slug@ucsc.edu")).unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observer = SessionObserver::new();
        let fired = Arc::new(AtomicUsize::new(0));

        {
            let fired_clone = Arc::clone(&fired);
            let _sub = observer.subscribe(move |_| {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            });
        }
        observer.publish(session("slug@ucsc.edu")).unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sign_out_notifies_once() {
        let observer = SessionObserver::new();
        observer.publish(session("slug@ucsc.edu")).unwrap();

        let sign_outs = Arc::new(AtomicUsize::new(0));
        let sign_outs_clone = Arc::clone(&sign_outs);
        let _sub = observer.subscribe(move |current| {
            if current.is_none() {
                sign_outs_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        observer.sign_out();
        observer.sign_out();

        // One initial fire was Some; only the first sign_out transitions
        assert_eq!(sign_outs.load(Ordering::SeqCst), 1);
    }
}
