//! The team browser: search query, derived card list and card selection.
//!
//! Nothing here is stored beyond the query and the highlighted index; the
//! visible list is recomputed from the fetched teams on every call.

use crate::router::{Route, Router};
use crate::state::{FetchStatus, LeagueId, LeagueSource, TeamId, TeamRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

/// Keeps the records whose name contains `query`, ignoring case, in their original order.
pub fn filter_teams<'a>(teams: &'a [TeamRecord], query: &str) -> Vec<&'a TeamRecord> {
    if query.is_empty() {
        return teams.iter().collect();
    }
    let needle = query.to_lowercase();
    teams
        .iter()
        .filter(|team| team.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone)]
pub struct TeamBrowser {
    source: LeagueSource,
    query: String,
    selected: usize,
    columns: usize,
    shown_league: Option<LeagueId>,
    pub input_mode: InputMode,
}

impl TeamBrowser {
    pub fn new(source: LeagueSource) -> Self {
        Self {
            source,
            query: String::new(),
            selected: 0,
            columns: 1,
            shown_league: None,
            input_mode: InputMode::Browse,
        }
    }

    pub fn source(&self) -> &LeagueSource {
        &self.source
    }

    pub fn league_id(&self) -> LeagueId {
        self.source.current()
    }

    /// Records the league being shown; a different league resets the highlight.
    pub fn observe_league(&mut self, league: LeagueId) -> bool {
        if self.shown_league == Some(league) {
            return false;
        }
        self.shown_league = Some(league);
        self.selected = 0;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.selected = 0;
        }
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Cards to draw for `status`. `None` while loading or after an error: no list is shown then.
    pub fn cards<'a>(&self, status: &'a FetchStatus<Vec<TeamRecord>>) -> Option<Vec<&'a TeamRecord>> {
        status.success().map(|teams| filter_teams(teams, &self.query))
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_right(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + self.columns < len {
            self.selected += self.columns;
        }
    }

    pub fn selected_team<'a>(&self, status: &'a FetchStatus<Vec<TeamRecord>>) -> Option<&'a TeamRecord> {
        self.cards(status)
            .and_then(|cards| cards.get(self.selected).copied())
    }

    /// Asks `router` to open the highlighted team. Sends nothing when no card is shown.
    pub fn open_selected(
        &self,
        status: &FetchStatus<Vec<TeamRecord>>,
        router: &mut impl Router,
    ) -> Option<TeamId> {
        let team = self.selected_team(status)?;
        router.navigate_to(&Route::Team(team.id).path());
        Some(team.id)
    }
}
