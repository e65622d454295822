//! # Id Token Inspection
//!
//! The provider issues id tokens as JWTs. The client never verifies the
//! signature (the provider signed it and the backing services re-verify);
//! it only needs the `exp` claim to decide when a token must be refreshed
//! before use as a bearer credential.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};

/// Margin applied before the real expiry so a token is never handed out
/// moments before it lapses mid-request.
const FRESHNESS_MARGIN_SECS: i64 = 60;

/// Read the expiry instant from an id token's payload.
///
/// Returns `None` for anything that does not look like a JWT with a numeric
/// `exp` claim.
pub fn expires_at(id_token: &str) -> Option<DateTime<Utc>> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// Whether the token is still usable as a bearer credential at `now`,
/// leaving a 60 second margin. Undecodable tokens count as stale.
pub fn is_fresh(id_token: &str, now: DateTime<Utc>) -> bool {
    match expires_at(id_token) {
        Some(exp) => exp > now + Duration::seconds(FRESHNESS_MARGIN_SECS),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned JWT with the given exp claim.
    fn token_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"uid-1","exp":{}}}"#, exp));
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_expires_at_reads_exp_claim() {
        let token = token_with_exp(1_750_000_000);
        assert_eq!(
            expires_at(&token),
            DateTime::from_timestamp(1_750_000_000, 0)
        );
    }

    #[test]
    fn test_fresh_token() {
        let now = Utc::now();
        let token = token_with_exp((now + Duration::hours(1)).timestamp());
        assert!(is_fresh(&token, now));
    }

    #[test]
    fn test_token_inside_margin_is_stale() {
        let now = Utc::now();
        let token = token_with_exp((now + Duration::seconds(30)).timestamp());
        assert!(!is_fresh(&token, now));
    }

    #[test]
    fn test_garbage_is_stale() {
        assert!(!is_fresh("not-a-jwt", Utc::now()));
        assert!(expires_at("only.one").is_none());
    }
}
