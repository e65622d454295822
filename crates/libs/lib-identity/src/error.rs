use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Errors returned by the identity provider API.
///
/// Provider rejections arrive as coded messages in the failure body; the
/// closed set the portal cares about is mapped to dedicated variants, and
/// anything else is carried through as [`IdentityError::Provider`] with the
/// raw code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Wrong password, unknown account, or a revoked/stale credential
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Provider-reported malformed email address
    #[error("malformed email address")]
    InvalidEmail,

    /// Sign-up attempted for an already registered address
    #[error("email already registered")]
    EmailExists,

    /// Password rejected by the provider's policy
    #[error("password does not meet the password policy")]
    WeakPassword,

    /// Provider-side rate limiting
    #[error("too many attempts, try again later")]
    TooManyRequests,

    /// Provider rejection outside the mapped set; carries the raw code
    #[error("identity provider error: {0}")]
    Provider(String),

    /// Transport-level failure before any provider verdict
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response whose body did not match the expected shape
    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl IdentityError {
    /// Map a provider error code to the closed error set.
    ///
    /// Codes may arrive bare (`EMAIL_EXISTS`) or with a detail suffix
    /// (`WEAK_PASSWORD : Password should be at least 6 characters`); only
    /// the leading code is significant.
    pub fn from_code(message: &str) -> Self {
        let code = message
            .split([' ', ':'])
            .next()
            .unwrap_or(message)
            .trim();

        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" | "INVALID_REFRESH_TOKEN" | "TOKEN_EXPIRED" => {
                IdentityError::InvalidCredentials
            }
            "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityError::InvalidEmail,
            "EMAIL_EXISTS" => IdentityError::EmailExists,
            "WEAK_PASSWORD" => IdentityError::WeakPassword,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TooManyRequests,
            other => IdentityError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_codes_map_to_variants() {
        assert_eq!(
            IdentityError::from_code("EMAIL_NOT_FOUND"),
            IdentityError::InvalidCredentials
        );
        assert_eq!(
            IdentityError::from_code("INVALID_PASSWORD"),
            IdentityError::InvalidCredentials
        );
        assert_eq!(
            IdentityError::from_code("EMAIL_EXISTS"),
            IdentityError::EmailExists
        );
        assert_eq!(
            IdentityError::from_code("INVALID_EMAIL"),
            IdentityError::InvalidEmail
        );
        assert_eq!(
            IdentityError::from_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            IdentityError::TooManyRequests
        );
    }

    #[test]
    fn test_code_with_detail_suffix() {
        assert_eq!(
            IdentityError::from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            IdentityError::WeakPassword
        );
    }

    #[test]
    fn test_unknown_code_is_carried_through() {
        assert_eq!(
            IdentityError::from_code("OPERATION_NOT_ALLOWED"),
            IdentityError::Provider("OPERATION_NOT_ALLOWED".to_string())
        );
    }
}
