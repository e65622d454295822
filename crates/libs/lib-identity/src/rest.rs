//! # Identity Provider REST Client
//!
//! Thin typed client over the provider's account endpoints. Every call is a
//! single POST; failures carry a coded message in the body which is mapped
//! through [`IdentityError::from_code`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// Default base URL for the account endpoints
const DEFAULT_API_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Default base URL for the refresh-token exchange
const DEFAULT_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// Connection settings for the identity provider.
///
/// The base URLs are overridable so tests and local emulators can point the
/// client elsewhere.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub api_base: String,
    pub token_base: String,
}

impl IdentityConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            token_base: DEFAULT_TOKEN_BASE.to_string(),
        }
    }
}

/// Tokens and identity returned by a successful credential operation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Lifetime of the id token in seconds, stringified on the wire
    pub expires_in: String,
}

/// Result of a federated-credential exchange.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdpTokens {
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    /// Whether this exchange created the account
    #[serde(default)]
    pub is_new_user: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthUriRequest<'a> {
    identifier: &'a str,
    continue_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUriResponse {
    #[serde(rename = "signinMethods", default)]
    signin_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct OobCodeResponse {
    #[allow(dead_code)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    request_uri: &'a str,
    post_body: String,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
}

/// The refresh endpoint answers in snake_case, unlike the account endpoints.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// HTTP client for the identity provider.
pub struct IdentityClient {
    client: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    /// Create a client with a 10 second timeout to prevent hanging the caller.
    pub fn new(config: IdentityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    fn account_url(&self, action: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.api_base, action, self.config.api_key
        )
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| IdentityError::Decode(e.to_string()))
        } else {
            let body = response
                .json::<ProviderErrorBody>()
                .await
                .unwrap_or_default();
            match body.error {
                Some(detail) => Err(IdentityError::from_code(&detail.message)),
                None => Err(IdentityError::Provider(format!("HTTP {}", status.as_u16()))),
            }
        }
    }

    /// Sign in with email and password.
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthTokens> {
        tracing::info!("Signing in with password");
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post_json(&self.account_url("signInWithPassword"), &request)
            .await
    }

    /// Create a new email/password account.
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens> {
        tracing::info!("Creating account");
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post_json(&self.account_url("signUp"), &request).await
    }

    /// Look up which sign-in methods are registered for an address.
    ///
    /// An unregistered address yields an empty list, not an error.
    #[tracing::instrument(skip(self), fields(email = %email))]
    pub async fn fetch_sign_in_methods(&self, email: &str) -> Result<Vec<String>> {
        let request = AuthUriRequest {
            identifier: email,
            continue_uri: "http://localhost",
        };
        let response: AuthUriResponse = self
            .post_json(&self.account_url("createAuthUri"), &request)
            .await?;
        Ok(response.signin_methods)
    }

    /// Send a password-reset message to the address.
    #[tracing::instrument(skip(self), fields(email = %email))]
    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        let request = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        let _: OobCodeResponse = self
            .post_json(&self.account_url("sendOobCode"), &request)
            .await?;
        Ok(())
    }

    /// Exchange a federated credential (an OIDC id token from the external
    /// identity provider) for provider tokens.
    #[tracing::instrument(skip(self, provider_token))]
    pub async fn sign_in_with_idp(
        &self,
        provider_id: &str,
        provider_token: &str,
    ) -> Result<IdpTokens> {
        let request = IdpRequest {
            request_uri: "http://localhost",
            post_body: format!("id_token={}&providerId={}", provider_token, provider_id),
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.post_json(&self.account_url("signInWithIdp"), &request)
            .await
    }

    /// Exchange a refresh token for a fresh id token.
    #[tracing::instrument(skip(self, refresh_token))]
    pub async fn refresh_id_token(&self, refresh_token: &str) -> Result<AuthTokens> {
        let url = format!("{}/token?key={}", self.config.token_base, self.config.api_key);
        let request = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token,
        };
        let response: RefreshResponse = self.post_json(&url, &request).await?;
        Ok(AuthTokens {
            local_id: response.user_id,
            // The refresh exchange does not echo identity fields; the caller
            // keeps the email from the session being refreshed.
            email: String::new(),
            display_name: None,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_url_shape() {
        let client = IdentityClient::new(IdentityConfig::new("test-key"));
        assert_eq!(
            client.account_url("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=test-key"
        );
    }

    #[test]
    fn test_auth_tokens_deserialize() {
        let json = r#"{
            "localId": "uid-1",
            "email": "slug@ucsc.edu",
            "displayName": "Sammy",
            "idToken": "id.tok.en",
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        }"#;
        let tokens: AuthTokens = serde_json::from_str(json).unwrap();

        assert_eq!(tokens.local_id, "uid-1");
        assert_eq!(tokens.display_name.as_deref(), Some("Sammy"));
        assert_eq!(tokens.expires_in, "3600");
    }

    #[test]
    fn test_sign_in_methods_default_empty() {
        // Unregistered addresses come back without a signinMethods field
        let response: AuthUriResponse = serde_json::from_str(r#"{"registered": false}"#).unwrap();
        assert!(response.signin_methods.is_empty());

        let response: AuthUriResponse =
            serde_json::from_str(r#"{"registered": true, "signinMethods": ["password", "google.com"]}"#)
                .unwrap();
        assert_eq!(response.signin_methods, vec!["password", "google.com"]);
    }

    #[test]
    fn test_idp_tokens_is_new_user_defaults_false() {
        let json = r#"{
            "localId": "uid-2",
            "email": "slug@ucsc.edu",
            "idToken": "id.tok.en",
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        }"#;
        let tokens: IdpTokens = serde_json::from_str(json).unwrap();
        assert!(!tokens.is_new_user);
    }
}
