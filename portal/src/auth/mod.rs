//! # Authentication Flow
//!
//! The entry-screen flow: classify the typed email into a sign-in or
//! sign-up path, submit credentials, and create the profile record on first
//! sign-up.

pub mod classifier;
pub mod profile;
pub mod submitter;

pub use classifier::{AuthFlow, ClassifierState, ClassifyOutcome};
pub use profile::ProfileWriter;
pub use submitter::CredentialSubmitter;
