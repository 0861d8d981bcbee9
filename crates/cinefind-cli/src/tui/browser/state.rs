//! Browser state management: the search pipeline state machine.

use ratatui::widgets::TableState;

use cinefind_api::ApiError;
use cinefind_api::counter::CounterRecord;
use cinefind_api::tmdb::{Movie, MovieListResponse};

/// User-facing message for any settled fetch failure.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Informational message for a successful fetch with zero matches.
pub const NO_RESULTS_MESSAGE: &str = "No movies found";

/// User-facing message for a failed trending load.
pub const TRENDING_ERROR_MESSAGE: &str = "Error loading trending searches.";

/// Result state of the movie list.
///
/// A tagged variant rather than a `(list, error, loading)` field triple,
/// so an empty-but-successful fetch can never be conflated with a failed
/// one. `Loading` and `Failed` retain the previously displayed results.
#[derive(Debug, Clone)]
pub enum MovieListState {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is outstanding.
    Loading {
        /// Results displayed before the fetch was issued.
        prior: Vec<Movie>,
    },
    /// A fetch settled with at least one result.
    Loaded(Vec<Movie>),
    /// A fetch settled successfully with zero matches.
    Empty,
    /// A fetch settled with a transport or parse failure.
    Failed {
        /// Sanitized user-facing message.
        message: String,
        /// Results displayed before the failure.
        prior: Vec<Movie>,
    },
}

impl MovieListState {
    /// Returns the most recently known results.
    ///
    /// For `Loading` and `Failed` this is the list from before the
    /// trigger; for `Idle` and `Empty` it is empty.
    #[must_use]
    pub fn results(&self) -> &[Movie] {
        match self {
            Self::Loaded(results) => results,
            Self::Loading { prior } | Self::Failed { prior, .. } => prior,
            Self::Idle | Self::Empty => &[],
        }
    }

    /// Returns `true` until a fetch has settled (the startup state counts
    /// as loading, since the initial fetch is issued immediately).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading { .. })
    }

    /// Returns the message to render in the error slot, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Empty => Some(NO_RESULTS_MESSAGE),
            Self::Failed { message, .. } => Some(message),
            Self::Idle | Self::Loading { .. } | Self::Loaded(_) => None,
        }
    }
}

/// Result state of the trending section. Independent of the movie list.
#[derive(Debug, Clone)]
pub enum TrendingState {
    /// The startup load is outstanding.
    Loading,
    /// Top counters, in count-descending order.
    Loaded(Vec<CounterRecord>),
    /// The startup load failed.
    Failed(String),
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Raw search input as typed.
    pub search_input: String,
    /// Movie list state.
    pub movies: MovieListState,
    /// Trending section state.
    pub trending: TrendingState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Table state for the movie list (handles selection and scroll).
    pub movie_table_state: TableState,
    /// Set when the user asked to quit.
    pub should_quit: bool,
    /// Last debounced term a fetch was issued for.
    committed_term: Option<String>,
    /// Generation token of the most recently issued fetch.
    generation: u64,
}

impl BrowserState {
    /// Creates the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            search_input: String::new(),
            movies: MovieListState::Idle,
            trending: TrendingState::Loading,
            input_mode: InputMode::Normal,
            movie_table_state: TableState::default(),
            should_quit: false,
            committed_term: None,
            generation: 0,
        }
    }

    /// Returns the last committed (debounced) term, if any.
    #[must_use]
    pub fn committed_term(&self) -> Option<&str> {
        self.committed_term.as_deref()
    }

    /// Returns `true` when `term` differs from the last committed term.
    #[must_use]
    pub fn is_new_term(&self, term: &str) -> bool {
        self.committed_term.as_deref() != Some(term)
    }

    /// Commits a debounced term: enters `Loading` (retaining the current
    /// results for the failure path) and issues a new generation token.
    pub fn begin_fetch(&mut self, term: &str) -> u64 {
        let prior = self.take_results();
        self.movies = MovieListState::Loading { prior };
        self.committed_term = Some(String::from(term));
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Applies a settled fetch outcome.
    ///
    /// Outcomes carrying a generation token other than the latest issued
    /// one are discarded outright, so a stale response can never
    /// overwrite fresher state. Returns the top result when the fetch was
    /// query-driven and produced at least one match, so the caller can
    /// record the search count.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        term: &str,
        outcome: Result<MovieListResponse, ApiError>,
    ) -> Option<Movie> {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale fetch result"
            );
            return None;
        }

        match outcome {
            Ok(response) if response.results.is_empty() => {
                self.movies = MovieListState::Empty;
                self.movie_table_state.select(None);
                None
            }
            Ok(response) => {
                let top = if term.is_empty() {
                    None
                } else {
                    response.results.first().cloned()
                };
                self.movie_table_state.select(Some(0));
                self.movies = MovieListState::Loaded(response.results);
                top
            }
            Err(error) => {
                tracing::warn!(%error, term, "movie fetch failed");
                let prior = self.take_results();
                self.movies = MovieListState::Failed {
                    message: String::from(FETCH_ERROR_MESSAGE),
                    prior,
                };
                None
            }
        }
    }

    /// Applies the trending load outcome. Never touches the movie list.
    pub fn apply_trending(&mut self, outcome: Result<Vec<CounterRecord>, ApiError>) {
        match outcome {
            Ok(counters) => self.trending = TrendingState::Loaded(counters),
            Err(error) => {
                tracing::warn!(%error, "trending load failed");
                self.trending = TrendingState::Failed(String::from(TRENDING_ERROR_MESSAGE));
            }
        }
    }

    /// Returns the movie cursor position.
    #[must_use]
    pub fn movie_cursor(&self) -> usize {
        self.movie_table_state.selected().unwrap_or(0)
    }

    /// Returns the currently selected movie, if the list is loaded.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        let MovieListState::Loaded(results) = &self.movies else {
            return None;
        };
        results.get(self.movie_cursor())
    }

    /// Moves the movie cursor up.
    pub fn move_up(&mut self) {
        let current = self.movie_cursor();
        if current > 0 {
            self.movie_table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves the movie cursor down.
    pub fn move_down(&mut self) {
        let count = match &self.movies {
            MovieListState::Loaded(results) => results.len(),
            _ => 0,
        };
        let next = self.movie_cursor().saturating_add(1);
        if next < count {
            self.movie_table_state.select(Some(next));
        }
    }

    /// Takes the current results out of the list state.
    fn take_results(&mut self) -> Vec<Movie> {
        match std::mem::replace(&mut self.movies, MovieListState::Idle) {
            MovieListState::Loaded(results) => results,
            MovieListState::Loading { prior } | MovieListState::Failed { prior, .. } => prior,
            MovieListState::Idle | MovieListState::Empty => Vec::new(),
        }
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}
