//! # SlugScene Portal - Library Root
//!
//! The club-discovery client flow for UCSC SlugScene: session gating,
//! email classification, credential submission, first-sign-up profile
//! creation, and club-membership reconciliation. This library crate
//! contains all flow logic; rendering is left to whatever shell embeds it.
//!
//! ## Architecture
//!
//! ### Technology Stack
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              portal (this crate)                       │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio         - Async runtime                         │
//! │  Reqwest       - HTTP client                           │
//! │  parking_lot   - State locks                           │
//! │  async-channel - Event delivery from spawned tasks     │
//! │  lib-identity  - Identity provider REST client         │
//! │  lib-store     - Document store REST client            │
//! └────────────────────────────────────────────────────────┘
//!          │                   │                  │
//!          │ HTTPS             │ HTTPS            │ HTTP
//!          ▼                   ▼                  ▼
//! ┌───────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │   Identity    │   │  Document store │   │  Club API    │
//! │   provider    │   │  (clubs, users) │   │  (join/leave)│
//! └───────────────┘   └─────────────────┘   └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **session**: The process-wide current-session owner
//!   - Subscribe/unsubscribe observer interface
//!   - Institutional-domain gate with forced sign-out
//!   - Fresh bearer tokens for outbound calls
//!
//! - **auth**: The entry-screen flow
//!   - `classifier`: routes a typed email into sign-in or sign-up
//!   - `submitter`: performs the credential mutations
//!   - `profile`: creates the `users/{uid}` record on first sign-up
//!
//! - **services**: External integrations
//!   - `api`: club REST API client (join, leave, joined clubs)
//!   - `membership`: optimistic list state with exact rollback
//!   - `catalogue`: read-only store scans for the browse pages
//!
//! - **app**: Application shell
//!   - `state`: shared form and list state behind `Arc<RwLock>`
//!   - `handlers`: busy-flag gated entry points for user actions
//!   - `event_handler`: applies async results on the event consumer
//!
//! ## Core Concepts
//!
//! ### Event-Driven Architecture
//!
//! Handlers spawn network calls on Tokio and send results back over an
//! async channel; the single event consumer applies them to state. Locks
//! are taken briefly and never held across an await.
//!
//! ### Session Snapshots
//!
//! Only the session observer writes session state. Every other component
//! receives immutable snapshots through the subscription interface and
//! treats them as such.
//!
//! ### Optimistic Membership
//!
//! Join/leave updates the local list before the server call and keeps a
//! snapshot of the pre-call state; a failed call restores it exactly.
//!
//! ## Testing
//!
//! Run all tests:
//! ```bash
//! cargo test --package portal --lib
//! ```
//!
//! Run specific module tests:
//! ```bash
//! cargo test --package portal --lib session::observer::tests
//! cargo test --package portal --lib auth::classifier::tests
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod core;
pub mod services;
pub mod session;
pub mod utils;

// Re-export the top-level entry points
pub use crate::app::{App, AppEvent, AppState, Services};
pub use crate::config::AppConfig;
pub use crate::core::error::{AuthError, Result};
pub use crate::session::{Session, SessionObserver, Subscription};
