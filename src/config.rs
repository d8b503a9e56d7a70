use std::env;
use std::time::Duration;

const DEFAULT_SEARCH_BASE: &str = "http://127.0.0.1:5000/api/search/";
const DEFAULT_PLAYER_BASE: &str = "http://127.0.0.1:5000/api/player";
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Base URL the search query gets appended to. Keeps its trailing slash.
pub fn search_api_base() -> String {
    opt_env("SEARCH_API_BASE").unwrap_or_else(|| DEFAULT_SEARCH_BASE.to_string())
}

/// Base URL the resolved detail path gets appended to.
pub fn player_api_base() -> String {
    opt_env("PLAYER_API_BASE").unwrap_or_else(|| DEFAULT_PLAYER_BASE.to_string())
}

/// Quiet period after the last keystroke before a search request fires.
pub fn search_debounce() -> Duration {
    let ms = env::var("SEARCH_DEBOUNCE_MS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_DEBOUNCE_MS)
        .max(10);
    Duration::from_millis(ms)
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}
