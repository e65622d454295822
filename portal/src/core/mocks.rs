//! Hand-written service mocks for the flow tests.
//!
//! Each mock records call counts so tests can assert which operations ran
//! (and, for the local-precondition paths, that none did).

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lib_identity::{AuthTokens, IdentityError, IdpTokens};
use lib_store::StoreError;
use parking_lot::Mutex;
use shared::{Club, MembershipActionResponse, UserProfile};

use crate::core::service::{ClubsApi, IdentityService, ProfileStore};

pub fn tokens_for(email: &str) -> AuthTokens {
    AuthTokens {
        local_id: format!("uid-{}", email.split('@').next().unwrap_or("user")),
        email: email.to_string(),
        display_name: None,
        id_token: "id-token-1".to_string(),
        refresh_token: "refresh-token-1".to_string(),
        expires_in: "3600".to_string(),
    }
}

/// Identity provider mock with configurable verdicts.
#[derive(Default)]
pub struct MockIdentity {
    methods: Vec<String>,
    lookup_error: bool,
    sign_in_error: Option<IdentityError>,
    sign_up_error: Option<IdentityError>,
    /// Overrides the email echoed back in minted sessions
    session_email: Option<String>,
    idp_is_new_user: bool,
    lookups: AtomicUsize,
    sign_ins: AtomicUsize,
    sign_ups: AtomicUsize,
    resets: AtomicUsize,
    refreshes: AtomicUsize,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_lookup_error(mut self) -> Self {
        self.lookup_error = true;
        self
    }

    pub fn with_sign_in_error(mut self, error: IdentityError) -> Self {
        self.sign_in_error = Some(error);
        self
    }

    pub fn with_sign_up_error(mut self, error: IdentityError) -> Self {
        self.sign_up_error = Some(error);
        self
    }

    pub fn with_session_email(mut self, email: &str) -> Self {
        self.session_email = Some(email.to_string());
        self
    }

    pub fn with_idp_new_user(mut self, is_new_user: bool) -> Self {
        self.idp_is_new_user = is_new_user;
        self
    }

    pub fn method_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_ins.load(Ordering::SeqCst)
    }

    pub fn sign_up_calls(&self) -> usize {
        self.sign_ups.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn minted_email(&self, requested: &str) -> String {
        self.session_email
            .clone()
            .unwrap_or_else(|| requested.to_string())
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthTokens, IdentityError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        match &self.sign_in_error {
            Some(error) => Err(error.clone()),
            None => Ok(tokens_for(&self.minted_email(email))),
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthTokens, IdentityError> {
        self.sign_ups.fetch_add(1, Ordering::SeqCst);
        match &self.sign_up_error {
            Some(error) => Err(error.clone()),
            None => Ok(tokens_for(&self.minted_email(email))),
        }
    }

    async fn fetch_sign_in_methods(&self, _email: &str) -> Result<Vec<String>, IdentityError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.lookup_error {
            Err(IdentityError::Network("connection refused".to_string()))
        } else {
            Ok(self.methods.clone())
        }
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), IdentityError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sign_in_with_idp(
        &self,
        _provider_id: &str,
        _provider_token: &str,
    ) -> Result<IdpTokens, IdentityError> {
        let tokens = tokens_for(&self.minted_email("slug@ucsc.edu"));
        Ok(IdpTokens {
            local_id: tokens.local_id,
            email: tokens.email,
            display_name: Some("Sammy Slug".to_string()),
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            is_new_user: self.idp_is_new_user,
        })
    }

    async fn refresh_id_token(&self, _refresh_token: &str) -> Result<AuthTokens, IdentityError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AuthTokens {
            local_id: String::new(),
            email: String::new(),
            display_name: None,
            id_token: format!("minted-token-{}", n),
            refresh_token: format!("refresh-token-{}", n),
            expires_in: "3600".to_string(),
        })
    }
}

/// Profile store mock recording every created profile.
#[derive(Default)]
pub struct MockProfileStore {
    pub created: Mutex<Vec<UserProfile>>,
    fail_create: Option<StoreError>,
    creates: AtomicUsize,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_error(mut self, error: StoreError) -> Self {
        self.fail_create = Some(error);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn create_user_profile(
        &self,
        profile: &UserProfile,
        _bearer: &str,
    ) -> Result<(), StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.fail_create {
            return Err(error.clone());
        }
        self.created.lock().push(profile.clone());
        Ok(())
    }

    async fn fetch_user_profile(
        &self,
        _user_id: &str,
        _bearer: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.created.lock().last().cloned())
    }
}

/// Club API mock recording the bearer token and club id of every call.
#[derive(Default)]
pub struct MockClubsApi {
    pub calls: Mutex<Vec<(String, String, String)>>,
    fail_with: Option<String>,
}

impl MockClubsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    fn record(&self, op: &str, token: &str, club_id: &str) -> Result<MembershipActionResponse, String> {
        self.calls
            .lock()
            .push((op.to_string(), token.to_string(), club_id.to_string()));
        match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(MembershipActionResponse {
                message: format!("Successfully {} club: {}", op, club_id),
            }),
        }
    }
}

#[async_trait]
impl ClubsApi for MockClubsApi {
    async fn join_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String> {
        self.record("joined", token, club_id)
    }

    async fn leave_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String> {
        self.record("left", token, club_id)
    }

    async fn joined_clubs(&self, _token: &str) -> Result<Vec<Club>, String> {
        Ok(Vec::new())
    }
}
