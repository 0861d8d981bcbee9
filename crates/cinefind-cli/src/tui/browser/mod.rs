//! Movie browser TUI main loop.
//!
//! Keystrokes feed the debouncer; a quiet input commits a term and
//! issues a generation-tagged fetch task; settled fetches come back over
//! an mpsc channel and are reconciled into [`state::BrowserState`].

mod debounce;
/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use cinefind_api::counter::{CounterClient, CounterRecord, LocalSearchCounterApi};
use cinefind_api::tmdb::{LocalTmdbApi, Movie, MovieListResponse, TmdbClient};

use self::debounce::SearchDebouncer;
use self::state::{BrowserState, InputMode};
use crate::config::AppConfig;

/// Interval between debouncer polls while no messages arrive.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Base URL for movie pages opened with `o`.
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

/// Messages consumed by the update loop.
#[derive(Debug)]
pub enum BrowserEvent {
    /// A key press from the terminal.
    Key(KeyEvent),
    /// A movie fetch settled.
    MoviesFetched {
        /// Generation token the fetch was issued with.
        generation: u64,
        /// Term the fetch was issued for (empty = discover).
        term: String,
        /// Settled outcome.
        outcome: cinefind_api::Result<MovieListResponse>,
    },
    /// The trending load settled.
    TrendingFetched(cinefind_api::Result<Vec<CounterRecord>>),
}

/// Side effects requested by the update function.
#[derive(Debug)]
pub enum Action {
    /// Issue a catalog fetch for the committed term.
    Fetch {
        /// Generation token to tag the result with.
        generation: u64,
        /// Committed term (empty = discover).
        term: String,
    },
    /// Record a successful query-driven search.
    RecordSearch {
        /// The committed term.
        term: String,
        /// Top result of the search.
        movie: Movie,
    },
    /// Open a movie's catalog page in the system browser.
    OpenMovie {
        /// TMDB movie ID.
        id: u64,
    },
}

/// Shared handles for spawned fetch tasks.
struct FetchContext {
    tmdb: Arc<TmdbClient>,
    counter: Arc<CounterClient>,
    tx: mpsc::UnboundedSender<BrowserEvent>,
}

/// Runs the movie browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser(
    config: &AppConfig,
    tmdb: TmdbClient,
    counter: CounterClient,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserState::new();
    let mut debouncer = SearchDebouncer::new(Duration::from_millis(config.search.debounce_ms));

    let result = run_event_loop(
        &mut terminal,
        &mut state,
        &mut debouncer,
        tmdb,
        counter,
        config.counter.trending_limit,
    )
    .await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    debouncer: &mut SearchDebouncer,
    tmdb: TmdbClient,
    counter: CounterClient,
    trending_limit: u32,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ctx = FetchContext {
        tmdb: Arc::new(tmdb),
        counter: Arc::new(counter),
        tx,
    };

    // Startup: discover-popular for the empty term, plus the one-shot
    // trending load.
    let generation = state.begin_fetch("");
    execute_action(
        &ctx,
        Action::Fetch {
            generation,
            term: String::new(),
        },
    );
    spawn_trending_load(&ctx, trending_limit);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        // Drain pending terminal events without blocking the runtime.
        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                for action in update(state, debouncer, BrowserEvent::Key(key)) {
                    execute_action(&ctx, action);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }

        // Commit a debounced term once the input has been quiet.
        if let Some(action) = poll_debounce(state, debouncer) {
            execute_action(&ctx, action);
        }

        // Wait for a settled fetch or the next tick.
        tokio::select! {
            Some(message) = rx.recv() => {
                for action in update(state, debouncer, message) {
                    execute_action(&ctx, action);
                }
            }
            () = tokio::time::sleep(TICK_INTERVAL) => {}
        }
    }
}

/// Applies one event to the state, returning the side effects to run.
fn update(
    state: &mut BrowserState,
    debouncer: &mut SearchDebouncer,
    event: BrowserEvent,
) -> Vec<Action> {
    match event {
        BrowserEvent::Key(key) => match state.input_mode {
            InputMode::Search => handle_search_input(state, debouncer, key.code),
            InputMode::Normal => handle_normal_input(state, key.code, key.modifiers),
        },
        BrowserEvent::MoviesFetched {
            generation,
            term,
            outcome,
        } => state
            .apply_fetch(generation, &term, outcome)
            .map(|movie| Action::RecordSearch { term, movie })
            .into_iter()
            .collect(),
        BrowserEvent::TrendingFetched(outcome) => {
            state.apply_trending(outcome);
            Vec::new()
        }
    }
}

/// Commits a quiet term that differs from the last committed one.
fn poll_debounce(state: &mut BrowserState, debouncer: &mut SearchDebouncer) -> Option<Action> {
    let term = debouncer.poll_ready()?;
    if !state.is_new_term(&term) {
        return None;
    }
    let generation = state.begin_fetch(&term);
    Some(Action::Fetch { generation, term })
}

/// Handles key input in search mode.
fn handle_search_input(
    state: &mut BrowserState,
    debouncer: &mut SearchDebouncer,
    key: KeyCode,
) -> Vec<Action> {
    match key {
        KeyCode::Esc => {
            state.search_input.clear();
            debouncer.note_input("");
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.search_input.pop();
            debouncer.note_input(&state.search_input);
        }
        KeyCode::Char(c) => {
            state.search_input.push(c);
            debouncer.note_input(&state.search_input);
        }
        _ => {}
    }
    Vec::new()
}

/// Handles key input in normal mode.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Vec<Action> {
    match key {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true;
        }
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char('o') => {
            if let Some(movie) = state.selected_movie() {
                return vec![Action::OpenMovie { id: movie.id }];
            }
        }
        _ => {}
    }
    Vec::new()
}

/// Executes one side effect. Fetches and counter updates run as spawned
/// tasks reporting back over the channel; counter failures are logged and
/// dropped at their own boundary.
fn execute_action(ctx: &FetchContext, action: Action) {
    match action {
        Action::Fetch { generation, term } => {
            let tmdb = Arc::clone(&ctx.tmdb);
            let tx = ctx.tx.clone();
            tokio::spawn(async move {
                let outcome = if term.is_empty() {
                    tmdb.discover_popular().await
                } else {
                    tmdb.search_movies(&term).await
                };
                let _ = tx.send(BrowserEvent::MoviesFetched {
                    generation,
                    term,
                    outcome,
                });
            });
        }
        Action::RecordSearch { term, movie } => {
            let counter = Arc::clone(&ctx.counter);
            tokio::spawn(async move {
                if let Err(error) = counter.record_search(&term, &movie).await {
                    tracing::warn!(%error, term, "failed to record search count");
                }
            });
        }
        Action::OpenMovie { id } => {
            let url = format!("{MOVIE_PAGE_BASE_URL}/{id}");
            if let Err(error) = open::that(&url) {
                tracing::warn!(%error, url, "failed to open movie page");
            }
        }
    }
}

/// Spawns the one-shot trending load.
fn spawn_trending_load(ctx: &FetchContext, limit: u32) {
    let counter = Arc::clone(&ctx.counter);
    let tx = ctx.tx.clone();
    tokio::spawn(async move {
        let outcome = counter.top_searches(limit).await;
        let _ = tx.send(BrowserEvent::TrendingFetched(outcome));
    });
}
