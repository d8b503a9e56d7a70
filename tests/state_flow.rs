use std::time::{Duration, Instant};

use transferval::state::{
    apply_delta, AppState, Delta, PlayerDetail, PlayerView, ProviderCommand, Screen,
    SearchDebounce, Suggestion,
};

fn suggestion(name: &str, value: f64, link: &str, team: &str) -> Suggestion {
    Suggestion {
        display_name: name.to_string(),
        raw_name: name.to_string(),
        market_value: value,
        value_display: format!("€{value} M"),
        detail_link: link.to_string(),
        team: team.to_string(),
    }
}

fn sample_detail() -> PlayerDetail {
    PlayerDetail {
        market_value: "€90 M".to_string(),
        nationality: "Brazil".to_string(),
        position: "Left Winger".to_string(),
        age: "25".to_string(),
        image_url: "https://img.example.com/vinicius.png".to_string(),
        transfers: Vec::new(),
    }
}

fn state_with_results() -> AppState {
    let mut state = AppState::new();
    assert!(state.set_query("vini".to_string()));
    let cmd = state.begin_search("vini");
    let token = match cmd {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };
    apply_delta(
        &mut state,
        Delta::SetSuggestions {
            token,
            items: vec![
                suggestion("Vinicius Junior", 200.0, "/players/1001/profile", "Real Madrid"),
                suggestion("Vinicius Souza", 10.0, "/players/1003/profile", "Sheffield United"),
            ],
        },
    );
    state
}

#[test]
fn selecting_a_suggestion_starts_the_detail_fetch() {
    let mut state = state_with_results();
    let cmd = state.select_suggestion().expect("selection should fire");

    assert_eq!(state.screen, Screen::LoadingDetail);
    assert!(state.busy());
    assert_eq!(state.loading_player.as_deref(), Some("Vinicius Junior"));
    match cmd {
        ProviderCommand::FetchPlayer { path, name, team, token } => {
            assert_eq!(path, "/1001|profile");
            assert_eq!(name, "Vinicius Junior");
            assert_eq!(team, "Real Madrid");
            assert_eq!(token, state.detail_token);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn selection_is_a_noop_while_loading() {
    let mut state = state_with_results();
    state.select_suggestion().expect("first selection should fire");
    assert!(state.select_suggestion().is_none());
    assert_eq!(state.screen, Screen::LoadingDetail);
}

#[test]
fn back_is_a_noop_on_the_search_screen() {
    let mut state = state_with_results();
    state.back();
    assert_eq!(state.screen, Screen::Search);
    assert_eq!(state.suggestions.len(), 2);
}

#[test]
fn stale_search_responses_are_dropped() {
    let mut state = AppState::new();
    assert!(state.set_query("ro".to_string()));
    let old_token = match state.begin_search("ro") {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };

    // A newer search supersedes the first before it answers.
    assert!(state.set_query("ron".to_string()));
    let new_token = match state.begin_search("ron") {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };

    apply_delta(
        &mut state,
        Delta::SetSuggestions {
            token: old_token,
            items: vec![suggestion("Wrong Player", 1.0, "/players/9/profile", "Nowhere FC")],
        },
    );
    assert!(state.suggestions.is_empty());
    assert!(state.search_loading);

    apply_delta(
        &mut state,
        Delta::SetSuggestions {
            token: new_token,
            items: vec![suggestion("Ronaldo", 15.0, "/players/8/profile", "Al Nassr")],
        },
    );
    assert_eq!(state.suggestions.len(), 1);
    assert!(!state.search_loading);
}

#[test]
fn every_keystroke_invalidates_the_inflight_search() {
    let mut state = AppState::new();
    assert!(state.set_query("ro".to_string()));
    let token = match state.begin_search("ro") {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };

    // Typing a third character puts us inside a fresh debounce window;
    // the answer for "ro" arriving now must not fill the list.
    assert!(state.set_query("ron".to_string()));
    apply_delta(
        &mut state,
        Delta::SetSuggestions {
            token,
            items: vec![suggestion("Ronaldo Stale", 15.0, "/players/8/profile", "Al Nassr")],
        },
    );
    assert!(state.suggestions.is_empty());
}

#[test]
fn shortening_the_query_invalidates_the_inflight_search() {
    let mut state = AppState::new();
    assert!(state.set_query("ro".to_string()));
    let token = match state.begin_search("ro") {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };

    // Backspacing below the minimum clears the list and must keep it
    // clear even when the old response finally lands.
    assert!(!state.set_query("r".to_string()));
    assert!(!state.search_loading);

    apply_delta(
        &mut state,
        Delta::SetSuggestions {
            token,
            items: vec![suggestion("Ronaldo", 15.0, "/players/8/profile", "Al Nassr")],
        },
    );
    assert!(state.suggestions.is_empty());
}

#[test]
fn detail_success_moves_to_the_player_screen() {
    let mut state = state_with_results();
    state.select_suggestion().expect("selection should fire");
    let token = state.detail_token;

    apply_delta(
        &mut state,
        Delta::SetPlayer {
            token,
            player: PlayerView {
                name: "Vinicius Junior".to_string(),
                team: "Real Madrid".to_string(),
                detail: sample_detail(),
            },
        },
    );
    assert_eq!(state.screen, Screen::PlayerDetail);
    assert!(state.loading_player.is_none());
    let player = state.player.as_ref().expect("player should be set");
    assert_eq!(player.name, "Vinicius Junior");
    assert_eq!(player.team, "Real Madrid");
}

#[test]
fn stale_detail_responses_are_dropped() {
    let mut state = state_with_results();
    state.select_suggestion().expect("selection should fire");
    let stale_token = state.detail_token.wrapping_sub(1);

    apply_delta(
        &mut state,
        Delta::SetPlayer {
            token: stale_token,
            player: PlayerView {
                name: "Wrong Player".to_string(),
                team: "Nowhere FC".to_string(),
                detail: sample_detail(),
            },
        },
    );
    assert_eq!(state.screen, Screen::LoadingDetail);
    assert!(state.player.is_none());
}

#[test]
fn detail_failure_returns_to_search_with_a_notice() {
    let mut state = state_with_results();
    state.select_suggestion().expect("selection should fire");
    let token = state.detail_token;

    apply_delta(
        &mut state,
        Delta::PlayerFailed {
            token,
            message: "http 500".to_string(),
        },
    );
    assert_eq!(state.screen, Screen::Search);
    assert!(state.player.is_none());
    assert_eq!(state.search_notice.as_deref(), Some("Player data unavailable"));
    assert!(state.logs.iter().any(|line| line.starts_with("[WARN]")));
}

#[test]
fn search_failure_shows_a_notice_and_clears_results() {
    let mut state = state_with_results();
    let token = match state.begin_search("vini") {
        ProviderCommand::SearchPlayers { token, .. } => token,
        other => panic!("unexpected command: {other:?}"),
    };
    apply_delta(
        &mut state,
        Delta::SearchFailed {
            token,
            message: "connection refused".to_string(),
        },
    );
    assert!(state.suggestions.is_empty());
    assert_eq!(state.search_notice.as_deref(), Some("Search unavailable"));
    assert!(!state.search_loading);
}

#[test]
fn back_from_the_player_screen_resets_the_search() {
    let mut state = state_with_results();
    state.select_suggestion().expect("selection should fire");
    let token = state.detail_token;
    apply_delta(
        &mut state,
        Delta::SetPlayer {
            token,
            player: PlayerView {
                name: "Vinicius Junior".to_string(),
                team: "Real Madrid".to_string(),
                detail: sample_detail(),
            },
        },
    );

    state.back();
    assert_eq!(state.screen, Screen::Search);
    assert!(state.player.is_none());
    assert!(state.query.is_empty());
    assert!(state.suggestions.is_empty());
}

#[test]
fn malformed_links_keep_the_search_screen_usable() {
    let mut state = state_with_results();
    state.suggestions[0].detail_link = "/broken".to_string();

    assert!(state.select_suggestion().is_none());
    assert_eq!(state.screen, Screen::Search);
    assert_eq!(state.search_notice.as_deref(), Some("Player profile unavailable"));
    assert!(state.logs.iter().any(|line| line.starts_with("[WARN]")));
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut state = state_with_results();
    assert_eq!(state.suggestion_selected, 0);
    state.select_prev_suggestion();
    assert_eq!(state.suggestion_selected, 1);
    state.select_next_suggestion();
    assert_eq!(state.suggestion_selected, 0);
}

#[test]
fn debounce_fires_only_after_the_quiet_window() {
    let mut debounce = SearchDebounce::new(Duration::from_millis(100));
    let start = Instant::now();

    debounce.keystroke("vi".to_string(), start);
    assert!(debounce.due(start + Duration::from_millis(50)).is_none());

    // Another keystroke inside the window restarts it.
    debounce.keystroke("vin".to_string(), start + Duration::from_millis(60));
    assert!(debounce.due(start + Duration::from_millis(120)).is_none());

    let fired = debounce.due(start + Duration::from_millis(160));
    assert_eq!(fired.as_deref(), Some("vin"));
    // One shot per burst.
    assert!(debounce.due(start + Duration::from_millis(500)).is_none());
}

#[test]
fn debounce_cancel_discards_the_pending_query() {
    let mut debounce = SearchDebounce::new(Duration::from_millis(100));
    let start = Instant::now();
    debounce.keystroke("vi".to_string(), start);
    debounce.cancel();
    assert!(debounce.due(start + Duration::from_millis(500)).is_none());
}
