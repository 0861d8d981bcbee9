//! TMDB catalog API client module.
//!
//! Handles HTTP requests to the TMDB API v3 `discover/movie` and
//! `search/movie` endpoints and decodes the paged JSON envelope.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{Movie, MovieListResponse, TmdbErrorResponse};
