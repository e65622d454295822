//! # Shared Data Transfer Objects Library
//!
//! This library defines the record shapes shared between the portal client,
//! the document store, and the external club API.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::user`]**: User profile records
//!   - **[`dto::club`]**: Club, event, and post records
//!   - **[`dto::membership`]**: Join/leave response and error bodies
//! - **[`utils`]**: Shared utility functions
//!
//! ## Wire Format
//!
//! Stored records and API bodies use **camelCase** field names
//! (`joinedClubs`, `memberCount`, ...), matching what the backing services
//! persist. Every struct carries `#[serde(rename_all = "camelCase")]` so the
//! Rust side stays snake_case.

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
