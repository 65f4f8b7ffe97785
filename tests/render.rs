use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use teams_terminal::browser::InputMode;
use teams_terminal::router::Route;
use teams_terminal::state::{
    AppState, Delta, LeagueId, LeagueMode, LeagueSelection, LeagueSource, TeamDetail, TeamId,
    TeamRecord, Venue, apply_delta,
};
use teams_terminal::ui::{self, LOADING_TEXT, TEAMS_ERROR_TEXT, TEAM_ERROR_TEXT};

fn detail(id: u32, name: &str) -> TeamDetail {
    TeamDetail {
        team: TeamRecord {
            id: TeamId(id),
            name: name.to_string(),
            logo_url: String::new(),
        },
        code: None,
        country: Some("England".to_string()),
        founded: Some(1886),
        national: false,
        venue: Some(Venue {
            name: Some("Emirates Stadium".to_string()),
            city: Some("London".to_string()),
            capacity: Some(60383),
            surface: None,
        }),
    }
}

fn screen_text(state: &AppState) -> String {
    screen_text_sized(state, 80, 30)
}

fn screen_text_sized(state: &AppState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|f| ui::draw(f, state))
        .expect("draw should succeed");
    buffer_text(terminal.backend().buffer())
}

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

fn loaded(teams: &[(u32, &str)]) -> AppState {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.league_to_fetch();
    apply_delta(
        &mut state,
        Delta::TeamsLoaded {
            league: LeagueId(39),
            result: Ok(teams.iter().map(|(id, name)| detail(*id, name)).collect()),
        },
    );
    state
}

#[test]
fn loading_shows_indicator_and_no_cards() {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.league_to_fetch();
    let text = screen_text(&state);
    assert!(text.contains(LOADING_TEXT));
    assert!(text.contains("EXPLORE TEAMS"));
    assert!(text.contains("Search teams..."));
}

#[test]
fn reload_hides_cards_whatever_the_query() {
    let mut state = loaded(&[(42, "Arsenal"), (49, "Chelsea")]);
    state.browser.set_query("ars");
    assert!(screen_text(&state).contains("ARSENAL"));

    state.begin_refetch();
    let text = screen_text(&state);
    assert!(text.contains(LOADING_TEXT));
    assert!(!text.contains("ARSENAL"));
    assert!(!text.contains("CHELSEA"));
}

#[test]
fn error_shows_fixed_message_only() {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.league_to_fetch();
    apply_delta(
        &mut state,
        Delta::TeamsLoaded {
            league: LeagueId(39),
            result: Err("dns failure".to_string()),
        },
    );
    let text = screen_text(&state);
    assert!(text.contains(TEAMS_ERROR_TEXT));
    assert!(!text.contains(LOADING_TEXT));
}

#[test]
fn one_card_per_filtered_team() {
    let mut state = loaded(&[(42, "Arsenal"), (49, "Chelsea"), (541, "Real Madrid")]);
    let text = screen_text(&state);
    for name in ["ARSENAL", "CHELSEA", "REAL MADRID"] {
        assert!(text.contains(name), "missing card {name}");
    }

    state.browser.set_query("che");
    let text = screen_text(&state);
    assert!(text.contains("CHELSEA"));
    assert!(!text.contains("ARSENAL"));
    assert!(!text.contains("REAL MADRID"));
}

#[test]
fn short_terminal_still_shows_cards() {
    let state = loaded(&[(42, "Arsenal"), (49, "Chelsea")]);
    let text = screen_text_sized(&state, 80, 15);
    assert!(text.contains("ARSENAL"));
    assert!(text.contains("CHELSEA"));
}

#[test]
fn very_short_terminal_falls_back_to_names() {
    let state = loaded(&[(42, "Arsenal"), (49, "Chelsea")]);
    let text = screen_text_sized(&state, 80, 10);
    assert!(text.contains("ARSENAL"));
    assert!(text.contains("CHELSEA"));
}

#[test]
fn unmatched_query_shows_hint() {
    let mut state = loaded(&[(42, "Arsenal")]);
    state.browser.set_query("zz");
    let text = screen_text(&state);
    assert!(text.contains("No teams match \"zz\""));
    assert!(!text.contains("ARSENAL"));
}

#[test]
fn search_mode_shows_cursor() {
    let mut state = loaded(&[(42, "Arsenal")]);
    state.browser.input_mode = InputMode::Search;
    state.browser.push_char('a');
    assert!(screen_text(&state).contains("a_"));
}

#[test]
fn league_badge_only_for_shared_selection() {
    let fixed = loaded(&[(42, "Arsenal")]);
    assert!(!screen_text(&fixed).contains(" L  Premier League"));

    let mut shared = AppState::new(LeagueSource::Selected(LeagueSelection::new(LeagueMode::LaLiga)));
    shared.league_to_fetch();
    let text = screen_text(&shared);
    assert!(text.contains(" L  La Liga"));
}

#[test]
fn team_screen_shows_detail() {
    let mut state = loaded(&[(42, "Arsenal")]);
    state.open_route(Route::Team(TeamId(42)));
    let text = screen_text(&state);
    assert!(text.contains("ARSENAL"));
    assert!(text.contains("Emirates Stadium"));
    assert!(text.contains("1886"));
}

#[test]
fn team_screen_loading_and_error() {
    let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
    state.open_route(Route::Team(TeamId(7)));
    assert!(screen_text(&state).contains(LOADING_TEXT));

    apply_delta(
        &mut state,
        Delta::TeamLoaded {
            id: TeamId(7),
            result: Err("team not found".to_string()),
        },
    );
    assert!(screen_text(&state).contains(TEAM_ERROR_TEXT));
}
