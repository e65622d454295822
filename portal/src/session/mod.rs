//! # Session State
//!
//! The single source of truth for "who is logged in right now".

pub mod observer;

pub use observer::{Session, SessionObserver, Subscription};
