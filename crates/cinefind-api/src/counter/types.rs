//! Counter service response types.

use serde::Deserialize;

/// A popularity counter record, owned by the counter service.
///
/// Identity is the externally assigned `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRecord {
    /// Record ID assigned by the service.
    pub id: String,
    /// The search term this counter tracks.
    pub search_term: String,
    /// Number of times the term has been searched.
    pub count: u64,
    /// TMDB ID of the top result at last update.
    pub movie_id: u64,
    /// Poster URL of the top result (nullable).
    pub poster_url: Option<String>,
}

/// List envelope returned by the counter service.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterListResponse {
    /// Total number of matching records.
    pub total: u64,
    /// Records for the requested page.
    pub counters: Vec<CounterRecord>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_top_counters_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/counter/top_counters.json");

        // Act
        let response: CounterListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.total, 3);
        assert_eq!(response.counters.len(), 3);
        assert_eq!(response.counters[0].search_term, "inception");
        assert!(response.counters[0].count >= response.counters[1].count);
        assert!(response.counters[1].count >= response.counters[2].count);
    }

    #[test]
    fn test_parse_record_without_poster() {
        // Arrange
        let json = r#"{"id":"ctr_0099","search_term":"obscure","count":1,"movie_id":99,"poster_url":null}"#;

        // Act
        let record: CounterRecord = serde_json::from_str(json).unwrap();

        // Assert
        assert!(record.poster_url.is_none());
        assert_eq!(record.count, 1);
    }
}
