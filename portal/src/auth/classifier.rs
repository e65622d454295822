//! # Email Classifier
//!
//! Before prompting for a password, decide what the entry screen shows for
//! a typed address: the sign-in form, the sign-up form, or a notice that the
//! address signs in through a dedicated provider action.
//!
//! The provider lookup never silently defaults: when it cannot produce a
//! verdict the user is told to retry and the form stays on the email step.

use crate::core::error::{AuthError, Result};
use crate::core::service::IdentityService;
use crate::utils::validation;
use lib_identity::IdentityError;

/// Sign-in method identifier for email/password accounts
pub const PASSWORD_METHOD: &str = "password";

/// Sign-in method identifier for Google-federated accounts
pub const GOOGLE_METHOD: &str = "google.com";

/// Steps of the entry-screen flow. The transient lookup is not a separate
/// observable state; the caller's busy flag covers it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifierState {
    /// Typing the address; the only state with no password fields
    #[default]
    EnterEmail,
    /// Address has a password registered; show the password prompt
    SignIn,
    /// Address is unregistered; show the account-creation form
    SignUp,
}

/// Verdict of the sign-in-method lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyOutcome {
    /// No methods registered: offer account creation
    SignUp,
    /// A password is registered (possibly alongside other methods):
    /// password sign-in is never blocked by a linked second method
    SignIn,
    /// Only a dedicated federated method is registered
    UseProvider(String),
    /// Registered methods the portal does not support
    Unsupported(Vec<String>),
}

/// Classify an address by its registered sign-in methods.
///
/// The institutional-domain check runs first and fails without any provider
/// call.
pub async fn classify_email(
    identity: &dyn IdentityService,
    email: &str,
) -> Result<ClassifyOutcome> {
    let email = email.trim();
    if !validation::validate_institutional_email(email).is_valid {
        return Err(AuthError::InvalidDomain);
    }

    let methods = match identity.fetch_sign_in_methods(email).await {
        Ok(methods) => methods,
        Err(IdentityError::InvalidEmail) => return Err(AuthError::InvalidEmail),
        Err(err) => return Err(AuthError::ClassifierUnavailable(err.to_string())),
    };

    if methods.is_empty() {
        return Ok(ClassifyOutcome::SignUp);
    }
    if methods.iter().any(|m| m == PASSWORD_METHOD) {
        return Ok(ClassifyOutcome::SignIn);
    }
    if methods.len() == 1 && methods[0] == GOOGLE_METHOD {
        return Ok(ClassifyOutcome::UseProvider(GOOGLE_METHOD.to_string()));
    }
    Ok(ClassifyOutcome::Unsupported(methods))
}

/// Form state of the entry screen.
#[derive(Debug, Default)]
pub struct AuthFlow {
    pub state: ClassifierState,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Inline guidance shown under the email field
    pub notice: Option<String>,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the form according to a lookup verdict.
    pub fn apply_outcome(&mut self, outcome: ClassifyOutcome) -> ClassifierState {
        self.notice = None;
        match outcome {
            ClassifyOutcome::SignUp => self.state = ClassifierState::SignUp,
            ClassifyOutcome::SignIn => self.state = ClassifierState::SignIn,
            ClassifyOutcome::UseProvider(method) => {
                self.state = ClassifierState::EnterEmail;
                self.notice = Some(match method.as_str() {
                    GOOGLE_METHOD => {
                        "This address signs in with Google. Use \"Continue with Google\" instead."
                            .to_string()
                    }
                    other => format!("This address signs in through {}.", other),
                });
            }
            ClassifyOutcome::Unsupported(methods) => {
                self.state = ClassifierState::EnterEmail;
                self.notice = Some(format!(
                    "This address uses an unsupported sign-in method ({}). Contact support.",
                    methods.join(", ")
                ));
            }
        }
        self.state
    }

    /// Run the lookup and route the form in one step.
    pub async fn classify(
        &mut self,
        email: &str,
        identity: &dyn IdentityService,
    ) -> Result<ClassifierState> {
        let outcome = classify_email(identity, email).await?;
        self.email = email.trim().to_string();
        Ok(self.apply_outcome(outcome))
    }

    /// Return to the email step, clearing both password fields but keeping
    /// the typed address.
    pub fn handle_back(&mut self) {
        self.state = ClassifierState::EnterEmail;
        self.password.clear();
        self.confirm_password.clear();
        self.notice = None;
    }
}
