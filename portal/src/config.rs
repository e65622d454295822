//! # Environment Configuration
//!
//! All collaborator endpoints and credentials come from the environment.
//! Only the identity API key and the store project id are required; the
//! club API base URL falls back to the documented local-development
//! default, and browser sign-in simply stays unavailable without OAuth
//! client credentials.

use std::env;

use lib_identity::{GoogleSignIn, IdentityConfig};
use lib_store::StoreConfig;

use crate::services::api::client::DEFAULT_API_BASE_URL;
use crate::utils::validation::INSTITUTIONAL_EMAIL_SUFFIX;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the external club REST API
    pub api_url: String,
    pub identity: IdentityConfig,
    pub store: StoreConfig,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_url =
            env::var("SLUGSCENE_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let api_key = env::var("IDENTITY_API_KEY")
            .map_err(|_| "IDENTITY_API_KEY must be set in environment")?;
        let mut identity = IdentityConfig::new(api_key);
        if let Ok(base) = env::var("IDENTITY_API_URL") {
            identity.api_base = base;
        }
        if let Ok(base) = env::var("IDENTITY_TOKEN_URL") {
            identity.token_base = base;
        }

        let project_id = env::var("STORE_PROJECT_ID")
            .map_err(|_| "STORE_PROJECT_ID must be set in environment")?;
        let mut store = StoreConfig::new(project_id);
        if let Ok(base) = env::var("STORE_API_URL") {
            store.api_base = base;
        }

        Ok(Self {
            api_url,
            identity,
            store,
            google_client_id: env::var("GOOGLE_OAUTH_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_OAUTH_CLIENT_SECRET").ok(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.identity.api_key.is_empty() {
            return Err("IDENTITY_API_KEY must not be empty".to_string());
        }

        if self.store.project_id.is_empty() {
            return Err("STORE_PROJECT_ID must not be empty".to_string());
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("SLUGSCENE_API_URL must be an http(s) URL".to_string());
        }

        Ok(())
    }

    /// Browser sign-in flow, when OAuth client credentials are configured.
    ///
    /// The account chooser is hinted to the institutional domain; the
    /// result still passes the portal's own domain gate.
    pub fn google_sign_in(&self) -> Option<GoogleSignIn> {
        let client_id = self.google_client_id.as_ref()?;
        let client_secret = self.google_client_secret.as_ref()?;
        let hosted_domain = INSTITUTIONAL_EMAIL_SUFFIX.trim_start_matches('@').to_string();

        Some(GoogleSignIn::new(
            client_id.clone(),
            client_secret.clone(),
            Some(hosted_domain),
        ))
    }
}
