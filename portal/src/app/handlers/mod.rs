//! # Action Handlers
//!
//! Entry points for user actions. Each handler checks-and-sets the relevant
//! busy flag under the state lock, then spawns the network call; the lock
//! is never held across an await.

pub mod auth;
pub mod membership;
