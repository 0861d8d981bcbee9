//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::Result;

use super::types::MovieListResponse;

/// TMDB catalog API trait.
///
/// Abstracts the two catalog operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the first page of the popularity-sorted listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn discover_popular(&self) -> Result<MovieListResponse>;

    /// Searches the catalog for entries matching `query` (first page).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_movies(&self, query: &str) -> Result<MovieListResponse>;
}
