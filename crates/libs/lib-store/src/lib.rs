//! # Document Store Library
//!
//! REST client for the hosted document database: keyed record read/write on
//! `users/{uid}` and ordered collection scans over `clubs`, `events`, and
//! `clubPosts`.
//!
//! The store speaks a typed value encoding on the wire (`stringValue`,
//! `arrayValue`, ...); the [`value`] module converts between that encoding
//! and plain JSON so records stay ordinary serde types everywhere else.

pub mod client;
pub mod error;
pub mod value;

// Re-export commonly used types
pub use client::{Collection, Direction, StoreClient, StoreConfig, CLUBS, CLUB_POSTS, EVENTS, USERS};
pub use error::StoreError;
