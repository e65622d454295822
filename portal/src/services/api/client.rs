//! # API Client
//!
//! Main HTTP client for the external club API.

use async_trait::async_trait;
use shared::{Club, MembershipActionResponse};

use crate::core::service::ClubsApi;

/// Fallback base URL for local development when no environment override is
/// present
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for communicating with the club API server.
///
/// Maintains a connection pool; all endpoint calls go through the helper
/// functions in [`super::membership`].
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with default configuration.
    ///
    /// The client is configured with a 10 second timeout to prevent hanging
    /// the caller on an unresponsive server.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL for API requests.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

// Implement ClubsApi trait for ApiClient
#[async_trait]
impl ClubsApi for ApiClient {
    async fn join_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String> {
        crate::services::api::membership::join_club(self, token, club_id).await
    }

    async fn leave_club(
        &self,
        token: &str,
        club_id: &str,
    ) -> Result<MembershipActionResponse, String> {
        crate::services::api::membership::leave_club(self, token, club_id).await
    }

    async fn joined_clubs(&self, token: &str) -> Result<Vec<Club>, String> {
        crate::services::api::membership::joined_clubs(self, token).await
    }
}
