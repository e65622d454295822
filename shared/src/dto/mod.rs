//! # Data Transfer Objects (DTOs)
//!
//! Record shapes for the three external collaborators:
//!
//! - [`user`] - the `users/{uid}` profile document
//! - [`club`] - `clubs`, `events`, and `clubPosts` collection documents
//! - [`membership`] - bodies of the join/leave REST endpoints

pub mod club;
pub mod membership;
pub mod user;

pub use club::*;
pub use membership::*;
pub use user::*;
