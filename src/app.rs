//! Application state management for skygaze
//!
//! This module contains the main application state: the search/outlook view
//! machine, keyboard handling, debounced place search, and the wiring that
//! remembers the last selected place across runs.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{ForecastCache, FsStore, MemoryStore, Store};
use crate::cli::StartupConfig;
use crate::data::{ForecastClient, Place, PlaceClient};
use crate::refresh::RefreshMessage;
use crate::service::{NightOutlook, WeatherService};

/// Store key remembering the last selected place
const SELECTED_PLACE_KEY: &str = "selected_location";

/// Idle time after the last keystroke before the place search fires
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Place search screen with live results
    Search,
    /// Transient state while the forecast loads
    Loading,
    /// Night outlook for the selected place
    Outlook,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Search query as typed so far
    pub query: String,
    /// Places returned for the last fired query
    pub results: Vec<Place>,
    /// Index of the highlighted result
    pub selected_index: usize,
    /// The place the outlook is shown for
    pub place: Option<Place>,
    /// Last successfully loaded outlook
    pub outlook: Option<NightOutlook>,
    /// Error or status line shown in the active view
    pub status: Option<String>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a forecast reload has been requested
    pub refresh_requested: bool,
    /// Timestamp of the last completed reload
    pub last_refresh: Option<DateTime<Local>>,
    /// Scroll offset into the hourly table
    pub hourly_scroll: u16,
    /// Deadline at which the pending search fires
    pending_search: Option<Instant>,
    /// Forecast service (client + cache)
    service: WeatherService,
    /// Geocoding client
    place_client: PlaceClient,
    /// Persistence for the selected place
    store: Arc<dyn Store>,
}

impl App {
    /// Creates a new App instance with default state
    ///
    /// Falls back to an in-memory store when no platform cache directory can
    /// be determined; the app then simply forgets everything on exit.
    pub fn new() -> Self {
        let store: Arc<dyn Store> = match FsStore::new() {
            Some(fs_store) => Arc::new(fs_store),
            None => Arc::new(MemoryStore::default()),
        };
        Self::with_store(store)
    }

    /// Creates a new App instance over the given store
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let cache = ForecastCache::new(store.clone());
        let service = WeatherService::new(ForecastClient::new(), cache);

        Self {
            state: AppState::Search,
            query: String::new(),
            results: Vec::new(),
            selected_index: 0,
            place: None,
            outlook: None,
            status: None,
            should_quit: false,
            refresh_requested: false,
            last_refresh: None,
            hourly_scroll: 0,
            pending_search: None,
            service,
            place_client: PlaceClient::new(),
            store,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// A CLI query pre-fills the search and fires it immediately; otherwise a
    /// previously selected place is restored and its outlook loads right away.
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let mut app = Self::new();
        app.apply_startup(config);
        app
    }

    /// Applies startup configuration to a freshly built app
    fn apply_startup(&mut self, config: StartupConfig) {
        if let Some(query) = config.initial_query {
            self.query = query;
            self.pending_search = Some(Instant::now());
        } else if let Some(place) = self.load_selected_place() {
            debug!(name = %place.name, "restoring last selected place");
            self.place = Some(place);
            self.state = AppState::Loading;
            self.refresh_requested = true;
        }
    }

    /// Handles a keyboard event according to the current state
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C quits from anywhere, even mid-typing
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Search => match key.code {
                KeyCode::Esc => {
                    if self.query.is_empty() {
                        self.should_quit = true;
                    } else {
                        self.query.clear();
                        self.results.clear();
                        self.selected_index = 0;
                        self.pending_search = None;
                    }
                }
                KeyCode::Enter => {
                    if !self.results.is_empty() {
                        self.select_highlighted_place();
                    } else if !self.query.trim().is_empty() {
                        // No results yet: fire the search without waiting out
                        // the debounce
                        self.pending_search = Some(Instant::now());
                    }
                }
                KeyCode::Up => self.move_selection_up(),
                KeyCode::Down => self.move_selection_down(),
                KeyCode::Backspace => {
                    self.query.pop();
                    self.schedule_search();
                }
                KeyCode::Char(c) => {
                    self.query.push(c);
                    self.schedule_search();
                }
                _ => {}
            },
            AppState::Loading => {}
            AppState::Outlook => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') | KeyCode::Char('/') | KeyCode::Esc => {
                    self.state = AppState::Search;
                    self.status = None;
                }
                KeyCode::Char('r') => self.refresh_requested = true,
                KeyCode::Char('R') => {
                    // Force refresh: drop the cached payload first
                    self.service.invalidate_cache();
                    self.refresh_requested = true;
                }
                KeyCode::Up => self.hourly_scroll = self.hourly_scroll.saturating_sub(1),
                KeyCode::Down => self.hourly_scroll = self.hourly_scroll.saturating_add(1),
                _ => {}
            },
        }
    }

    /// Returns the query to search for, once its debounce deadline passed
    ///
    /// An empty query never fires; it just clears any stale results, matching
    /// the search box behavior of clearing the list when emptied.
    pub fn take_due_search(&mut self, now: Instant) -> Option<String> {
        let due = matches!(self.pending_search, Some(deadline) if now >= deadline);
        if !due {
            return None;
        }
        self.pending_search = None;

        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.results.clear();
            self.selected_index = 0;
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Runs the place search and stores its results
    pub async fn run_search(&mut self, query: &str) {
        match self.place_client.search(query).await {
            Ok(places) => {
                debug!(count = places.len(), "place search returned");
                self.results = places;
                self.selected_index = 0;
                self.status = None;
            }
            Err(err) => {
                debug!(error = %err, "place search failed");
                self.status = Some(format!("Search failed: {}", err));
            }
        }
    }

    /// Consumes the pending refresh request, if any
    pub fn take_refresh_request(&mut self) -> bool {
        let requested = self.refresh_requested;
        self.refresh_requested = false;
        requested
    }

    /// Reacts to a background refresh message
    ///
    /// Only the outlook view reloads on a tick; the search screen has nothing
    /// to refresh.
    pub fn handle_refresh_message(&mut self, message: RefreshMessage) {
        if message == RefreshMessage::RefreshDue
            && self.state == AppState::Outlook
            && self.place.is_some()
        {
            self.refresh_requested = true;
        }
    }

    /// Loads (or reloads) the outlook for the selected place
    pub async fn reload(&mut self) {
        let Some(place) = self.place.clone() else {
            return;
        };

        self.status = None;
        let now = Local::now().fixed_offset();
        match self.service.night_outlook(&place, now).await {
            Ok(outlook) => {
                self.outlook = Some(outlook);
                self.last_refresh = Some(Local::now());
            }
            Err(err) => {
                debug!(error = %err, "failed to load night outlook");
                self.status = Some(format!("Error loading weather data: {}", err));
            }
        }
        self.state = AppState::Outlook;
    }

    /// Moves the result highlight up, wrapping at the top
    fn move_selection_up(&mut self) {
        if self.results.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.results.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the result highlight down, wrapping at the bottom
    fn move_selection_down(&mut self) {
        if self.results.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.results.len();
    }

    /// Commits the highlighted result as the selected place
    fn select_highlighted_place(&mut self) {
        let Some(place) = self.results.get(self.selected_index).cloned() else {
            return;
        };

        self.persist_selected_place(&place);
        self.place = Some(place);
        self.outlook = None;
        self.hourly_scroll = 0;
        self.state = AppState::Loading;
        self.refresh_requested = true;
    }

    /// Schedules the search to fire after the debounce idle period
    fn schedule_search(&mut self) {
        self.pending_search = Some(Instant::now() + SEARCH_DEBOUNCE);
    }

    /// Reads the persisted selected place, if one parses
    fn load_selected_place(&self) -> Option<Place> {
        let raw = self.store.get(SELECTED_PLACE_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Persists the selected place; failures are logged, not fatal
    fn persist_selected_place(&self, place: &Place) {
        match serde_json::to_string(place) {
            Ok(json) => {
                if let Err(err) = self.store.set(SELECTED_PLACE_KEY, &json) {
                    debug!(error = %err, "failed to persist selected place");
                }
            }
            Err(err) => debug!(error = %err, "failed to serialize selected place"),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
