/// Validation utilities for user input

/// Email suffix every account must carry; anything else is rejected before
/// a single network call is made.
pub const INSTITUTIONAL_EMAIL_SUFFIX: &str = "@ucsc.edu";

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Whether the address carries the institutional suffix with a non-empty
/// local part.
pub fn is_institutional_email(email: &str) -> bool {
    email.len() > INSTITUTIONAL_EMAIL_SUFFIX.len() && email.ends_with(INSTITUTIONAL_EMAIL_SUFFIX)
}

/// Validate an email address for the institutional domain.
pub fn validate_institutional_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::err("Email is required");
    }

    if !email.contains('@') || email.starts_with('@') {
        return ValidationResult::err("Invalid email format");
    }

    if !is_institutional_email(email) {
        return ValidationResult::err(format!(
            "Please use your UCSC email address ({})",
            INSTITUTIONAL_EMAIL_SUFFIX
        ));
    }

    ValidationResult::ok()
}

/// Validate password strength
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return ValidationResult::err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }

    ValidationResult::ok()
}
