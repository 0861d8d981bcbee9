//! `SearchCounterApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::Result;
use crate::tmdb::Movie;

use super::types::CounterRecord;

/// Counter service API trait.
///
/// Abstracts the two counter operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(SearchCounterApi: Send)]
pub trait LocalSearchCounterApi {
    /// Increments the counter for `term`, creating the record with the
    /// given top result when no counter exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying HTTP requests fail.
    async fn record_search(&self, term: &str, top_result: &Movie) -> Result<()>;

    /// Fetches the top `limit` counters sorted by count descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn top_searches(&self, limit: u32) -> Result<Vec<CounterRecord>>;
}
