//! TMDB API response types.

use serde::Deserialize;

/// Base URL for TMDB poster images (`w500` rendition).
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Paged envelope returned by `discover/movie` and `search/movie`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    pub page: u32,
    /// Results in server payload order.
    pub results: Vec<Movie>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single movie entry, taken verbatim from the API response.
///
/// Identity is `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Vote average (0.0 - 10.0).
    pub vote_average: f64,
    /// Poster image path (nullable).
    pub poster_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, possibly empty).
    #[serde(default)]
    pub release_date: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
}

impl Movie {
    /// Resolves `poster_path` against the TMDB image base.
    ///
    /// Returns `None` when the movie has no poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE_URL}{path}"))
    }
}

/// Error body returned by TMDB for non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB-internal status code.
    pub status_code: u32,
    /// Human-readable message.
    pub status_message: String,
    /// Always `false` for errors.
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_poster_url_joins_image_base() {
        // Arrange
        let movie = Movie {
            id: 27205,
            title: String::from("Inception"),
            vote_average: 8.4,
            poster_path: Some(String::from("/ljsZTbVsrQSqZgWeep2B1QiDKuh.jpg")),
            release_date: String::from("2010-07-15"),
            original_language: String::from("en"),
        };

        // Act
        let url = movie.poster_url();

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/ljsZTbVsrQSqZgWeep2B1QiDKuh.jpg")
        );
    }

    #[test]
    fn test_poster_url_none_without_path() {
        // Arrange
        let movie = Movie {
            id: 1,
            title: String::from("Untitled"),
            vote_average: 0.0,
            poster_path: None,
            release_date: String::new(),
            original_language: String::from("en"),
        };

        // Assert
        assert!(movie.poster_url().is_none());
    }

    #[test]
    fn test_movie_tolerates_missing_release_date() {
        // Arrange
        let json = r#"{"id":7,"title":"Unreleased","vote_average":0.0,"poster_path":null,"original_language":"en"}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.release_date, "");
        assert!(movie.poster_path.is_none());
    }
}
