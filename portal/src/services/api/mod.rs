//! # Club API Client
//!
//! HTTP client modules for the external club REST API.

pub mod client;
pub mod membership;

pub use client::ApiClient;
