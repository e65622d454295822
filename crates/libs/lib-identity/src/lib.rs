//! # Identity Provider Library
//!
//! REST client for the hosted identity provider: email/password sign-in and
//! sign-up, sign-in-method lookup, password reset mail, federated token
//! exchange, and refresh-token exchange.

pub mod error;
pub mod google;
pub mod rest;
pub mod token;

// Re-export commonly used types
pub use error::IdentityError;
pub use google::{GoogleFlowError, GoogleSignIn};
pub use rest::{AuthTokens, IdentityClient, IdentityConfig, IdpTokens};
