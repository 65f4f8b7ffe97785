use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::browser::InputMode;
use crate::router::{Route, RouteQueue, Router};
use crate::state::{
    AppState, FetchStatus, LeagueId, LeagueSource, ProviderCommand, Screen, TeamId, league_id_label,
    league_label,
};

/// The browser application: screen state plus the command channel to the provider.
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    pub fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    /// Applies one key press to the current screen.
    pub fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }
        match self.state.screen {
            Screen::Teams => match self.state.browser.input_mode {
                InputMode::Search => self.on_search_key(key),
                InputMode::Browse => self.on_browse_key(key),
            },
            Screen::Team { id } => self.on_team_key(key, id),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        let browser = &mut self.state.browser;
        match key.code {
            KeyCode::Enter | KeyCode::Esc => browser.input_mode = InputMode::Browse,
            KeyCode::Backspace => browser.pop_char(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                browser.clear_query()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                browser.push_char(c)
            }
            _ => {}
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent) {
        let len = self.shown_len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.state.browser.input_mode = InputMode::Search,
            KeyCode::Esc => self.state.browser.clear_query(),
            KeyCode::Char('h') | KeyCode::Left => self.state.browser.move_left(),
            KeyCode::Char('l') | KeyCode::Right => self.state.browser.move_right(len),
            KeyCode::Char('k') | KeyCode::Up => self.state.browser.move_up(),
            KeyCode::Char('j') | KeyCode::Down => self.state.browser.move_down(len),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('L') => self.cycle_league(),
            KeyCode::Char('r') => {
                let league = self.state.begin_refetch();
                self.request_teams(league);
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_team_key(&mut self, key: KeyEvent, id: TeamId) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('b') | KeyCode::Esc => self.navigate_to(&Route::Teams.path()),
            KeyCode::Char('r') => {
                self.state.team_details.insert(id, FetchStatus::Loading);
                self.request_team(id);
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn shown_len(&self) -> usize {
        self.state
            .browser
            .cards(self.state.current_teams())
            .map_or(0, |cards| cards.len())
    }

    fn open_selected(&mut self) {
        let mut queue = RouteQueue::default();
        self.state
            .browser
            .open_selected(self.state.current_teams(), &mut queue);
        for path in queue.drain() {
            self.navigate_to(&path);
        }
    }

    fn cycle_league(&mut self) {
        let selection = match self.state.browser.source() {
            LeagueSource::Selected(selection) => Some(selection.clone()),
            LeagueSource::Fixed(_) => None,
        };
        match selection {
            Some(selection) => {
                let mode = selection.cycle();
                tracing::info!(league = league_label(mode), "league selected");
                self.state
                    .push_log(format!("[INFO] League: {}", league_label(mode)));
            }
            None => {
                let label = league_id_label(self.state.current_league());
                self.state
                    .push_log(format!("[INFO] League is pinned to {label}"));
            }
        }
    }

    /// Requests the current league's teams when it has never been requested.
    pub fn sync_teams(&mut self) {
        if let Some(league) = self.state.league_to_fetch() {
            self.request_teams(league);
        }
    }

    fn request_teams(&mut self, league: LeagueId) {
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ProviderCommand::FetchTeams { league }).is_ok());
        if !sent {
            self.state.push_log("[WARN] Teams request failed");
            self.state
                .teams
                .insert(league, FetchStatus::Error("provider unavailable".to_string()));
        }
    }

    fn request_team(&mut self, id: TeamId) {
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ProviderCommand::FetchTeam { id }).is_ok());
        if !sent {
            self.state.push_log("[WARN] Team request failed");
            self.state
                .team_details
                .insert(id, FetchStatus::Error("provider unavailable".to_string()));
        }
    }
}

impl Router for App {
    fn navigate_to(&mut self, path: &str) {
        let Some(route) = Route::parse(path) else {
            tracing::warn!(path, "unknown route");
            self.state.push_log(format!("[WARN] Unknown route {path}"));
            return;
        };
        tracing::info!(path, "navigate");
        if let Some(id) = self.state.open_route(route) {
            self.request_team(id);
        }
    }
}
