//! # Browser-Based Google Sign-In
//!
//! Native equivalent of the web popup flow: the authorization request runs
//! in the system browser and comes back to a one-shot loopback listener,
//! then the authorization code is exchanged (PKCE) for an OIDC id token
//! suitable for [`crate::IdentityClient::sign_in_with_idp`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::{distr::Alphanumeric, Rng};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// Authorization endpoint of the external identity provider
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Code-exchange endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed to mint an id token carrying email and display name
const SCOPES: &str = "openid email profile";

/// How long the loopback listener waits for the user to finish in the browser
const REDIRECT_WAIT_SECS: u64 = 180;

pub type Result<T> = std::result::Result<T, GoogleFlowError>;

/// Failures of the browser interaction, distinct from provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GoogleFlowError {
    /// The user denied consent or closed the browser interaction
    #[error("sign-in was cancelled in the browser")]
    Cancelled,

    /// The system browser could not be launched
    #[error("could not open the browser: {0}")]
    BrowserLaunch(String),

    /// Nobody came back to the loopback listener in time
    #[error("timed out waiting for the browser sign-in to finish")]
    Timeout,

    /// Loopback listener failure
    #[error("redirect listener error: {0}")]
    Listener(String),

    /// The redirect carried no usable authorization code
    #[error("redirect did not carry an authorization code")]
    MissingCode,

    /// The code-for-token exchange failed
    #[error("token exchange failed: {0}")]
    Exchange(String),
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    id_token: String,
}

struct PkcePair {
    verifier: String,
    challenge: String,
}

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_pkce() -> PkcePair {
    let verifier = random_token(64);
    let digest = Sha256::digest(verifier.as_bytes());
    let challenge = URL_SAFE_NO_PAD.encode(digest);
    PkcePair {
        verifier,
        challenge,
    }
}

/// Extract the authorization code from the redirect's request line,
/// checking the anti-forgery state.
fn parse_redirect(request_line: &str, expected_state: &str) -> Result<String> {
    // Request line looks like: GET /?state=..&code=.. HTTP/1.1
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| GoogleFlowError::Listener("malformed redirect request".to_string()))?;
    let url = Url::parse(&format!("http://127.0.0.1{}", path))
        .map_err(|e| GoogleFlowError::Listener(e.to_string()))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(reason) = error {
        return match reason.as_str() {
            "access_denied" => Err(GoogleFlowError::Cancelled),
            other => Err(GoogleFlowError::Exchange(other.to_string())),
        };
    }
    if state.as_deref() != Some(expected_state) {
        return Err(GoogleFlowError::Listener("state mismatch".to_string()));
    }
    code.ok_or(GoogleFlowError::MissingCode)
}

/// Browser sign-in flow against the external identity provider.
pub struct GoogleSignIn {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    hosted_domain: Option<String>,
    auth_endpoint: String,
    token_endpoint: String,
}

impl GoogleSignIn {
    /// `hosted_domain` is the institutional domain hint; the provider
    /// pre-filters the account chooser with it, but the result still has to
    /// pass the portal's own domain gate.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        hosted_domain: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            hosted_domain,
            auth_endpoint: AUTH_ENDPOINT.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }

    fn authorization_url(&self, redirect_uri: &str, challenge: &str, state: &str) -> String {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("code_challenge", challenge),
            ("code_challenge_method", "S256"),
            ("state", state),
        ];
        if let Some(domain) = &self.hosted_domain {
            params.push(("hd", domain.as_str()));
        }

        // The endpoint constant is well-formed, so parse cannot fail on it
        Url::parse_with_params(&self.auth_endpoint, &params)
            .map(String::from)
            .unwrap_or_else(|_| self.auth_endpoint.clone())
    }

    /// Run the full browser round trip and return the provider's OIDC id
    /// token. Blocks (asynchronously) until the user finishes or the
    /// listener times out.
    #[tracing::instrument(skip(self))]
    pub async fn sign_in(&self) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| GoogleFlowError::Listener(e.to_string()))?;
        let port = listener
            .local_addr()
            .map_err(|e| GoogleFlowError::Listener(e.to_string()))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}", port);

        let pkce = generate_pkce();
        let state = random_token(32);
        let auth_url = self.authorization_url(&redirect_uri, &pkce.challenge, &state);

        tracing::info!(port = port, "Opening browser for sign-in");
        open::that(&auth_url).map_err(|e| GoogleFlowError::BrowserLaunch(e.to_string()))?;

        let code = self.wait_for_redirect(&listener, &state).await?;
        self.exchange_code(&code, &redirect_uri, &pkce.verifier).await
    }

    async fn wait_for_redirect(&self, listener: &TcpListener, state: &str) -> Result<String> {
        let accept = tokio::time::timeout(
            std::time::Duration::from_secs(REDIRECT_WAIT_SECS),
            listener.accept(),
        );
        let (mut stream, _) = accept
            .await
            .map_err(|_| GoogleFlowError::Timeout)?
            .map_err(|e| GoogleFlowError::Listener(e.to_string()))?;

        let mut buf = vec![0u8; 4096];
        let read = stream
            .read(&mut buf)
            .await
            .map_err(|e| GoogleFlowError::Listener(e.to_string()))?;
        let request = String::from_utf8_lossy(&buf[..read]);
        let request_line = request.lines().next().unwrap_or_default();
        let result = parse_redirect(request_line, state);

        let page = match &result {
            Ok(_) => "Signed in. You can close this tab and return to SlugScene.",
            Err(_) => "Sign-in did not complete. You can close this tab.",
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            page.len(),
            page
        );
        // Best effort; the outcome is already decided
        let _ = stream.write_all(response.as_bytes()).await;

        result
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        verifier: &str,
    ) -> Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
            ("code_verifier", verifier),
        ];

        let response = self
            .client
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleFlowError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleFlowError::Exchange(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<TokenExchangeResponse>()
            .await
            .map(|t| t.id_token)
            .map_err(|e| GoogleFlowError::Exchange(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkce_challenge_is_s256_of_verifier() {
        let pkce = generate_pkce();
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pkce.verifier.as_bytes()));

        assert_eq!(pkce.challenge, expected);
        assert_eq!(pkce.verifier.len(), 64);
    }

    #[test]
    fn test_authorization_url_carries_domain_hint_and_challenge() {
        let flow = GoogleSignIn::new("client-1", "secret", Some("ucsc.edu".to_string()));
        let url = flow.authorization_url("http://127.0.0.1:9999", "chal123", "state456");

        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("hd=ucsc.edu"));
        assert!(url.contains("code_challenge=chal123"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A9999"));
    }

    #[test]
    fn test_authorization_url_without_domain_hint() {
        let flow = GoogleSignIn::new("client-1", "secret", None);
        let url = flow.authorization_url("http://127.0.0.1:9999", "chal", "state");
        assert!(!url.contains("hd="));
    }

    #[test]
    fn test_parse_redirect_extracts_code() {
        let code = parse_redirect("GET /?state=st&code=abc123 HTTP/1.1", "st").unwrap();
        assert_eq!(code, "abc123");
    }

    #[test]
    fn test_parse_redirect_denied_is_cancelled() {
        let result = parse_redirect("GET /?error=access_denied&state=st HTTP/1.1", "st");
        assert_eq!(result, Err(GoogleFlowError::Cancelled));
    }

    #[test]
    fn test_parse_redirect_state_mismatch() {
        let result = parse_redirect("GET /?state=other&code=abc HTTP/1.1", "st");
        assert!(matches!(result, Err(GoogleFlowError::Listener(_))));
    }

    #[test]
    fn test_parse_redirect_missing_code() {
        let result = parse_redirect("GET /?state=st HTTP/1.1", "st");
        assert_eq!(result, Err(GoogleFlowError::MissingCode));
    }
}
