//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and
//! modularity. The flow logic only ever sees these seams; the concrete
//! implementations live in `lib-identity`, `lib-store`, and
//! `services::api`.

use async_trait::async_trait;
use lib_identity::{AuthTokens, IdentityClient, IdentityError, IdpTokens};
use lib_store::{StoreClient, StoreError, USERS};
use shared::{Club, MembershipActionResponse, UserProfile};

/// Identity provider operations used by the auth flow.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Sign in with email and password
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, IdentityError>;

    /// Create a new email/password account
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError>;

    /// Look up registered sign-in methods for an address
    async fn fetch_sign_in_methods(&self, email: &str) -> Result<Vec<String>, IdentityError>;

    /// Send a password-reset message
    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Exchange a federated credential for provider tokens
    async fn sign_in_with_idp(
        &self,
        provider_id: &str,
        provider_token: &str,
    ) -> Result<IdpTokens, IdentityError>;

    /// Exchange a refresh token for a fresh id token
    async fn refresh_id_token(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError>;
}

#[async_trait]
impl IdentityService for IdentityClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, IdentityError> {
        IdentityClient::sign_in_with_password(self, email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError> {
        IdentityClient::sign_up(self, email, password).await
    }

    async fn fetch_sign_in_methods(&self, email: &str) -> Result<Vec<String>, IdentityError> {
        IdentityClient::fetch_sign_in_methods(self, email).await
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        IdentityClient::send_password_reset(self, email).await
    }

    async fn sign_in_with_idp(
        &self,
        provider_id: &str,
        provider_token: &str,
    ) -> Result<IdpTokens, IdentityError> {
        IdentityClient::sign_in_with_idp(self, provider_id, provider_token).await
    }

    async fn refresh_id_token(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError> {
        IdentityClient::refresh_id_token(self, refresh_token).await
    }
}

/// Keyed access to the `users/{uid}` profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile record; a duplicate id must fail with
    /// [`StoreError::AlreadyExists`] rather than overwrite
    async fn create_user_profile(
        &self,
        profile: &UserProfile,
        bearer: &str,
    ) -> Result<(), StoreError>;

    /// Fetch a profile record, `None` when absent
    async fn fetch_user_profile(
        &self,
        user_id: &str,
        bearer: &str,
    ) -> Result<Option<UserProfile>, StoreError>;
}

#[async_trait]
impl ProfileStore for StoreClient {
    async fn create_user_profile(
        &self,
        profile: &UserProfile,
        bearer: &str,
    ) -> Result<(), StoreError> {
        self.create_document(&USERS, &profile.user_id, profile, Some(bearer))
            .await
    }

    async fn fetch_user_profile(
        &self,
        user_id: &str,
        bearer: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        self.get_document(&USERS, user_id, Some(bearer)).await
    }
}

/// The external club API endpoints used by the membership flow.
///
/// Errors at this seam are plain messages; the membership client wraps them
/// into the portal taxonomy.
#[async_trait]
pub trait ClubsApi: Send + Sync {
    /// Join a club on behalf of the bearer
    async fn join_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String>;

    /// Leave a club on behalf of the bearer
    async fn leave_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String>;

    /// Full details of the clubs the bearer has joined
    async fn joined_clubs(&self, token: &str) -> Result<Vec<Club>, String>;
}
