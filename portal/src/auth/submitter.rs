//! # Credential Submitter
//!
//! Performs the authentication mutations once the classifier has chosen a
//! path. Every operation surfaces its failure once and never retries; the
//! caller gates repeated clicks with a busy flag while a call is
//! outstanding.

use std::sync::Arc;

use lib_identity::GoogleSignIn;

use crate::auth::profile::ProfileWriter;
use crate::core::error::{AuthError, Result};
use crate::core::service::IdentityService;
use crate::session::{Session, SessionObserver};
use crate::utils::validation;

#[derive(Clone)]
pub struct CredentialSubmitter {
    identity: Arc<dyn IdentityService>,
    profiles: ProfileWriter,
    observer: SessionObserver,
}

impl CredentialSubmitter {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        profiles: ProfileWriter,
        observer: SessionObserver,
    ) -> Self {
        Self {
            identity,
            profiles,
            observer,
        }
    }

    /// Sign in with email and password.
    ///
    /// The returned session has already passed the institutional-domain
    /// gate; a provider account outside the domain is forcibly signed out
    /// and reported as [`AuthError::DomainRejected`].
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if !validation::validate_institutional_email(email).is_valid {
            return Err(AuthError::InvalidDomain);
        }

        let tokens = self
            .identity
            .sign_in_with_password(email, password)
            .await
            .map_err(AuthError::from)?;

        self.observer.publish(Session::from_tokens(&tokens))
    }

    /// Create an account, establish the session, and write the initial
    /// profile record.
    ///
    /// Both password checks run locally before any network call. A profile
    /// write failure keeps the session so [`Self::retry_profile_setup`] can
    /// finish the job without re-authenticating.
    #[tracing::instrument(skip(self, password, confirm_password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        display_name: Option<String>,
        notify_on_new_post: bool,
    ) -> Result<Session> {
        if !validation::validate_institutional_email(email).is_valid {
            return Err(AuthError::InvalidDomain);
        }
        if !validation::validate_password(password).is_valid {
            return Err(AuthError::WeakPassword);
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let tokens = self
            .identity
            .sign_up(email, password)
            .await
            .map_err(AuthError::from)?;
        let session = self.observer.publish(Session::from_tokens(&tokens))?;

        self.profiles
            .create_profile(
                &session.user_id,
                &session.email,
                display_name,
                notify_on_new_post,
                &session.id_token,
            )
            .await?;

        Ok(session)
    }

    /// Re-run profile creation for the active session after a partial
    /// failure at sign-up. The conditional create makes this safe to call
    /// even when the first write did land.
    pub async fn retry_profile_setup(
        &self,
        display_name: Option<String>,
        notify_on_new_post: bool,
    ) -> Result<()> {
        let session = self
            .observer
            .current()
            .ok_or_else(|| AuthError::ProfileWriteFailed("you are signed out".to_string()))?;

        self.profiles
            .create_profile(
                &session.user_id,
                &session.email,
                display_name,
                notify_on_new_post,
                &session.id_token,
            )
            .await
    }

    /// Sign in through the external identity provider's browser flow.
    ///
    /// The returned account is re-validated against the institutional
    /// domain exactly like password sign-in; the profile record is written
    /// only when this was the identifier's first-ever authentication.
    #[tracing::instrument(skip(self, google))]
    pub async fn sign_in_with_google(&self, google: &GoogleSignIn) -> Result<Session> {
        let provider_token = google.sign_in().await.map_err(AuthError::from)?;

        let idp = self
            .identity
            .sign_in_with_idp(crate::auth::classifier::GOOGLE_METHOD, &provider_token)
            .await
            .map_err(AuthError::from)?;
        let is_new_user = idp.is_new_user;
        let display_name = idp.display_name.clone();

        let session = self.observer.publish(Session::from_idp_tokens(&idp))?;

        if is_new_user {
            self.profiles
                .create_profile(
                    &session.user_id,
                    &session.email,
                    display_name,
                    true,
                    &session.id_token,
                )
                .await?;
        }

        Ok(session)
    }

    /// Send a password-reset message.
    #[tracing::instrument(skip(self), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        if !validation::validate_institutional_email(email.trim()).is_valid {
            return Err(AuthError::InvalidDomain);
        }

        self.identity
            .send_password_reset(email.trim())
            .await
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::{MockIdentity, MockProfileStore};
    use crate::core::service::ProfileStore;
    use lib_identity::IdentityError;

    fn submitter_with(
        identity: MockIdentity,
        store: Arc<MockProfileStore>,
    ) -> (CredentialSubmitter, SessionObserver) {
        let observer = SessionObserver::new();
        let submitter = CredentialSubmitter::new(
            Arc::new(identity),
            ProfileWriter::new(store as Arc<dyn ProfileStore>),
            observer.clone(),
        );
        (submitter, observer)
    }

    #[tokio::test]
    async fn test_sign_in_establishes_session() {
        let store = Arc::new(MockProfileStore::new());
        let (submitter, observer) = submitter_with(MockIdentity::new(), Arc::clone(&store));

        let session = submitter.sign_in("slug@ucsc.edu", "abcdef").await.unwrap();

        assert_eq!(session.email, "slug@ucsc.edu");
        assert_eq!(observer.current(), Some(session));
    }

    #[tokio::test]
    async fn test_sign_in_outside_domain_is_local_failure() {
        let identity = Arc::new(MockIdentity::new());
        let store = Arc::new(MockProfileStore::new());
        let observer = SessionObserver::new();
        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>),
            observer.clone(),
        );

        let result = submitter.sign_in("nouser@gmail.com", "abcdef").await;

        assert_eq!(result, Err(AuthError::InvalidDomain));
        assert!(observer.current().is_none());
        assert_eq!(identity.sign_in_calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_account_outside_domain_is_rejected_and_signed_out() {
        // The provider hands back a session for a non-institutional account
        let identity = MockIdentity::new().with_session_email("intruder@gmail.com");
        let store = Arc::new(MockProfileStore::new());
        let (submitter, observer) = submitter_with(identity, store);

        let result = submitter.sign_in("slug@ucsc.edu", "abcdef").await;

        assert_eq!(result, Err(AuthError::DomainRejected));
        assert!(observer.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_maps_provider_errors_once() {
        let identity = MockIdentity::new().with_sign_in_error(IdentityError::InvalidCredentials);
        let store = Arc::new(MockProfileStore::new());
        let (submitter, observer) = submitter_with(identity, store);

        let result = submitter.sign_in("slug@ucsc.edu", "wrong").await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert!(observer.current().is_none());
    }

    #[tokio::test]
    async fn test_short_password_fails_locally() {
        let identity = Arc::new(MockIdentity::new());
        let store = Arc::new(MockProfileStore::new());
        let observer = SessionObserver::new();
        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>),
            observer,
        );

        let result = submitter
            .sign_up("student@ucsc.edu", "abc", "abc", None, true)
            .await;

        assert_eq!(result, Err(AuthError::WeakPassword));
        assert_eq!(identity.sign_up_calls(), 0);
    }

    #[tokio::test]
    async fn test_password_mismatch_fails_locally() {
        let identity = Arc::new(MockIdentity::new());
        let store = Arc::new(MockProfileStore::new());
        let observer = SessionObserver::new();
        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>),
            observer,
        );

        let result = submitter
            .sign_up("student@ucsc.edu", "abcdef", "abcdeg", None, true)
            .await;

        assert_eq!(result, Err(AuthError::PasswordMismatch));
        assert_eq!(identity.sign_up_calls(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_writes_profile_exactly_once() {
        let store = Arc::new(MockProfileStore::new());
        let (submitter, observer) = submitter_with(MockIdentity::new(), Arc::clone(&store));

        let session = submitter
            .sign_up("student@ucsc.edu", "abcdef", "abcdef", None, true)
            .await
            .unwrap();

        assert_eq!(observer.current(), Some(session.clone()));
        assert_eq!(store.create_calls(), 1);
        let created = store.created.lock();
        assert_eq!(created[0].user_id, session.user_id);
        assert!(created[0].joined_clubs.is_empty());
    }

    #[tokio::test]
    async fn test_profile_write_failure_keeps_session_and_is_retryable() {
        let store = Arc::new(MockProfileStore::new().with_create_error(
            lib_store::StoreError::Network("connection reset".to_string()),
        ));
        let (submitter, observer) = submitter_with(MockIdentity::new(), store);

        let result = submitter
            .sign_up("student@ucsc.edu", "abcdef", "abcdef", None, true)
            .await;

        assert!(matches!(result, Err(AuthError::ProfileWriteFailed(_))));
        // Auth succeeded: the session survives so profile setup can retry
        assert!(observer.current().is_some());

        let retry = submitter.retry_profile_setup(None, true).await;
        assert!(matches!(retry, Err(AuthError::ProfileWriteFailed(_))));
    }

    #[tokio::test]
    async fn test_idp_session_for_existing_user_passes_domain_gate() {
        // The browser round trip has its own tests in lib-identity; this
        // exercises the idp-result half of the flow
        let identity = MockIdentity::new().with_idp_new_user(false);
        let observer = SessionObserver::new();

        let idp = identity.sign_in_with_idp("google.com", "tok").await.unwrap();
        let session = observer.publish(Session::from_idp_tokens(&idp)).unwrap();

        assert_eq!(session.email, "slug@ucsc.edu");
        assert!(!idp.is_new_user);
        assert_eq!(observer.current(), Some(session));
    }

    #[tokio::test]
    async fn test_password_reset_requires_institutional_email() {
        let identity = Arc::new(MockIdentity::new());
        let store = Arc::new(MockProfileStore::new());
        let observer = SessionObserver::new();
        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            ProfileWriter::new(store as Arc<dyn ProfileStore>),
            observer,
        );

        assert_eq!(
            submitter.request_password_reset("").await,
            Err(AuthError::InvalidDomain)
        );
        assert_eq!(
            submitter.request_password_reset("nouser@gmail.com").await,
            Err(AuthError::InvalidDomain)
        );
        assert_eq!(identity.reset_calls(), 0);

        submitter
            .request_password_reset("slug@ucsc.edu")
            .await
            .unwrap();
        assert_eq!(identity.reset_calls(), 1);
    }
}
