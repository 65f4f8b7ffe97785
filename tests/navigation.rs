use teams_terminal::router::{Route, RouteQueue, Router};
use teams_terminal::state::{
    AppState, Delta, LeagueId, LeagueSource, TeamDetail, TeamId, TeamRecord, apply_delta,
};

fn loaded_state(teams: &[(u32, &str)]) -> AppState {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.league_to_fetch();
    let details = teams
        .iter()
        .map(|(id, name)| TeamDetail {
            team: TeamRecord {
                id: TeamId(*id),
                name: name.to_string(),
                logo_url: String::new(),
            },
            code: None,
            country: None,
            founded: None,
            national: false,
            venue: None,
        })
        .collect();
    apply_delta(
        &mut state,
        Delta::TeamsLoaded {
            league: LeagueId(39),
            result: Ok(details),
        },
    );
    state
}

#[test]
fn route_paths_round_trip() {
    assert_eq!(Route::Teams.path(), "/teams");
    assert_eq!(Route::Team(TeamId(42)).path(), "/teams/42");
    assert_eq!(Route::parse("/teams/42"), Some(Route::Team(TeamId(42))));
    assert_eq!(Route::parse("/teams/"), Some(Route::Teams));
    assert_eq!(Route::parse(""), Some(Route::Teams));
    assert_eq!(Route::parse("/teams/arsenal"), None);
    assert_eq!(Route::parse("/players/42"), None);
}

#[test]
fn selecting_card_navigates_exactly_once() {
    let state = loaded_state(&[(42, "Arsenal"), (49, "Chelsea")]);
    let mut queue = RouteQueue::default();
    let opened = state.browser.open_selected(state.current_teams(), &mut queue);
    assert_eq!(opened, Some(TeamId(42)));
    assert_eq!(queue.paths(), ["/teams/42"]);
}

#[test]
fn selection_follows_filtered_list() {
    let mut state = loaded_state(&[(42, "Arsenal"), (49, "Chelsea"), (541, "Real Madrid")]);
    state.browser.set_query("che");
    let mut queue = RouteQueue::default();
    state.browser.open_selected(state.current_teams(), &mut queue);
    assert_eq!(queue.paths(), ["/teams/49"]);
}

#[test]
fn nothing_to_open_while_loading_or_unmatched() {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.league_to_fetch();
    let mut queue = RouteQueue::default();
    assert_eq!(state.browser.open_selected(state.current_teams(), &mut queue), None);

    let mut state = loaded_state(&[(42, "Arsenal")]);
    state.browser.set_query("zz");
    assert_eq!(state.browser.open_selected(state.current_teams(), &mut queue), None);
    assert!(queue.paths().is_empty());
}

#[test]
fn routes_from_queue_drive_state() {
    let mut state = loaded_state(&[(42, "Arsenal")]);
    let mut queue = RouteQueue::default();
    queue.navigate_to("/teams/42");
    for path in queue.drain() {
        if let Some(route) = Route::parse(&path) {
            state.open_route(route);
        }
    }
    assert_eq!(
        state.screen,
        teams_terminal::state::Screen::Team { id: TeamId(42) }
    );
}
