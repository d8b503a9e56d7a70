use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::link::resolve_detail_path;

/// Minimum query length before a remote search is worth issuing.
pub const MIN_QUERY_LEN: usize = 2;

pub const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    LoadingDetail,
    PlayerDetail,
}

/// One ranked autocomplete candidate. The whole list is replaced on every
/// search response; entries are never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub display_name: String,
    /// Original response key, including any `|duplicate` suffix.
    pub raw_name: String,
    pub market_value: f64,
    pub value_display: String,
    pub detail_link: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub date: String,
    pub origin: String,
    pub destination: String,
    pub fee: String,
}

/// Player data as returned by the player API, value and fees already
/// formatted for display. Transfer order is the API's order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetail {
    pub market_value: String,
    pub nationality: String,
    pub position: String,
    pub age: String,
    pub image_url: String,
    pub transfers: Vec<TransferRecord>,
}

/// Everything the detail screen renders: identity from the suggestion the
/// user picked, the rest from the player API.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub name: String,
    pub team: String,
    pub detail: PlayerDetail,
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    SearchPlayers {
        query: String,
        token: u64,
    },
    FetchPlayer {
        path: String,
        name: String,
        team: String,
        token: u64,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetSuggestions { token: u64, items: Vec<Suggestion> },
    SearchFailed { token: u64, message: String },
    SetPlayer { token: u64, player: PlayerView },
    PlayerFailed { token: u64, message: String },
}

/// Collapses a burst of keystrokes into one query: the quiet window
/// restarts on every keystroke and only the latest text survives.
#[derive(Debug)]
pub struct SearchDebounce {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn keystroke(&mut self, text: String, now: Instant) {
        self.pending = Some((text, now));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The query to fire, once the quiet window has elapsed.
    pub fn due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, since)) if now.duration_since(*since) >= self.quiet => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub suggestion_selected: usize,
    pub search_loading: bool,
    pub search_notice: Option<String>,
    /// Token the most recent search request was issued under. Responses
    /// carrying any other token are stale and get dropped.
    pub search_token: u64,
    /// Same guard for the detail fetch.
    pub detail_token: u64,
    /// Name shown next to the spinner while the detail fetch runs.
    pub loading_player: Option<String>,
    pub player: Option<PlayerView>,
    pub spinner_frame: usize,
    pub logs: VecDeque<String>,
    next_token: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Search,
            query: String::new(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            search_loading: false,
            search_notice: None,
            search_token: 0,
            detail_token: 0,
            loading_player: None,
            player: None,
            spinner_frame: 0,
            logs: VecDeque::with_capacity(200),
            next_token: 0,
        }
    }

    fn mint_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Replace the query text. Every keystroke outdates whatever search
    /// is still in flight, so a slow response for older text can never
    /// land while newer text is being debounced. Returns true when the
    /// text is long enough to search for; otherwise the suggestion list
    /// is cleared too.
    pub fn set_query(&mut self, text: String) -> bool {
        self.query = text;
        self.search_notice = None;
        self.search_token = self.mint_token();
        if self.query.chars().count() < MIN_QUERY_LEN {
            self.suggestions.clear();
            self.suggestion_selected = 0;
            self.search_loading = false;
            false
        } else {
            true
        }
    }

    /// Start a remote search for `query` under a fresh token.
    pub fn begin_search(&mut self, query: &str) -> ProviderCommand {
        self.search_loading = true;
        self.search_token = self.mint_token();
        ProviderCommand::SearchPlayers {
            query: query.to_string(),
            token: self.search_token,
        }
    }

    /// Act on the highlighted suggestion: resolve its link and move to the
    /// loading screen. Outside the search screen this is a no-op, so
    /// out-of-order UI events are tolerated instead of crashing anything.
    /// A link that fails to resolve is a remote-contract defect; it is
    /// logged and the search screen stays fully usable.
    pub fn select_suggestion(&mut self) -> Option<ProviderCommand> {
        if self.screen != Screen::Search {
            return None;
        }
        let suggestion = self.suggestions.get(self.suggestion_selected)?.clone();
        let path = match resolve_detail_path(&suggestion.detail_link) {
            Ok(path) => path,
            Err(err) => {
                self.search_notice = Some("Player profile unavailable".to_string());
                self.push_log(format!("[WARN] {err}"));
                return None;
            }
        };

        self.detail_token = self.mint_token();
        // Entering a new view also outdates any search still in flight.
        self.search_token = self.detail_token;
        self.screen = Screen::LoadingDetail;
        self.search_loading = false;
        self.loading_player = Some(suggestion.display_name.clone());
        Some(ProviderCommand::FetchPlayer {
            path,
            name: suggestion.display_name,
            team: suggestion.team,
            token: self.detail_token,
        })
    }

    /// Leave the detail view and re-arm the search box. No-op on any other
    /// screen.
    pub fn back(&mut self) {
        if self.screen != Screen::PlayerDetail {
            return;
        }
        self.screen = Screen::Search;
        self.player = None;
        self.query.clear();
        self.suggestions.clear();
        self.suggestion_selected = 0;
        self.search_notice = None;
    }

    pub fn select_next_suggestion(&mut self) {
        let total = self.suggestions.len();
        if total == 0 {
            self.suggestion_selected = 0;
            return;
        }
        self.suggestion_selected = (self.suggestion_selected + 1) % total;
    }

    pub fn select_prev_suggestion(&mut self) {
        let total = self.suggestions.len();
        if total == 0 {
            self.suggestion_selected = 0;
            return;
        }
        if self.suggestion_selected == 0 {
            self.suggestion_selected = total - 1;
        } else {
            self.suggestion_selected -= 1;
        }
    }

    pub fn busy(&self) -> bool {
        self.search_loading || self.screen == Screen::LoadingDetail
    }

    pub fn tick(&mut self) {
        if self.busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetSuggestions { token, items } => {
            if token != state.search_token {
                // Stale response from a superseded query, discard.
                return;
            }
            state.search_loading = false;
            state.suggestions = items;
            state.suggestion_selected = 0;
        }
        Delta::SearchFailed { token, message } => {
            if token != state.search_token {
                return;
            }
            state.search_loading = false;
            state.suggestions.clear();
            state.suggestion_selected = 0;
            state.search_notice = Some("Search unavailable".to_string());
            state.push_log(format!("[WARN] Search failed: {message}"));
        }
        Delta::SetPlayer { token, player } => {
            if token != state.detail_token || state.screen != Screen::LoadingDetail {
                return;
            }
            state.screen = Screen::PlayerDetail;
            state.loading_player = None;
            state.player = Some(player);
        }
        Delta::PlayerFailed { token, message } => {
            if token != state.detail_token || state.screen != Screen::LoadingDetail {
                return;
            }
            // Back to a usable search screen rather than a blank detail view.
            state.screen = Screen::Search;
            state.loading_player = None;
            state.search_notice = Some("Player data unavailable".to_string());
            state.push_log(format!("[WARN] Player fetch failed: {message}"));
        }
    }
}
