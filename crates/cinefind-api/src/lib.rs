//! API client library for cinefind.
//!
//! Provides clients for the TMDB catalog API and the hosted
//! search counter service.

/// Search counter service client.
pub mod counter;
/// Error types shared by both clients.
pub mod error;
/// TMDB catalog API client.
pub mod tmdb;

pub use error::{ApiError, Result};
