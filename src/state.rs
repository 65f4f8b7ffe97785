use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::browser::TeamBrowser;
use crate::logo::LogoArt;
use crate::router::Route;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeagueId(pub u32);

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-ready data for one team. Owned by the data source; the browser only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: TeamId,
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<u32>,
    pub surface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub team: TeamRecord,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<u16>,
    pub national: bool,
    pub venue: Option<Venue>,
}

/// Outcome of one request to the data source. The error text goes to the console;
/// the screen always shows a fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus<T> {
    Loading,
    Error(String),
    Success(T),
}

impl<T> FetchStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchStatus::Error(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            FetchStatus::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T, String>> for FetchStatus<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => FetchStatus::Success(value),
            Err(err) => FetchStatus::Error(err),
        }
    }
}

static TEAMS_NOT_REQUESTED: FetchStatus<Vec<TeamRecord>> = FetchStatus::Loading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueMode {
    PremierLeague,
    LaLiga,
    Bundesliga,
    SerieA,
    Ligue1,
    ChampionsLeague,
    WorldCup,
}

impl LeagueMode {
    pub const ALL: [LeagueMode; 7] = [
        LeagueMode::PremierLeague,
        LeagueMode::LaLiga,
        LeagueMode::Bundesliga,
        LeagueMode::SerieA,
        LeagueMode::Ligue1,
        LeagueMode::ChampionsLeague,
        LeagueMode::WorldCup,
    ];

    /// API-Football league id.
    pub fn id(self) -> LeagueId {
        let raw = match self {
            LeagueMode::PremierLeague => 39,
            LeagueMode::LaLiga => 140,
            LeagueMode::Bundesliga => 78,
            LeagueMode::SerieA => 135,
            LeagueMode::Ligue1 => 61,
            LeagueMode::ChampionsLeague => 2,
            LeagueMode::WorldCup => 1,
        };
        LeagueId(raw)
    }

    pub fn from_id(id: LeagueId) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    pub fn next(self) -> Self {
        match self {
            LeagueMode::PremierLeague => LeagueMode::LaLiga,
            LeagueMode::LaLiga => LeagueMode::Bundesliga,
            LeagueMode::Bundesliga => LeagueMode::SerieA,
            LeagueMode::SerieA => LeagueMode::Ligue1,
            LeagueMode::Ligue1 => LeagueMode::ChampionsLeague,
            LeagueMode::ChampionsLeague => LeagueMode::WorldCup,
            LeagueMode::WorldCup => LeagueMode::PremierLeague,
        }
    }
}

pub fn league_label(mode: LeagueMode) -> &'static str {
    match mode {
        LeagueMode::PremierLeague => "Premier League",
        LeagueMode::LaLiga => "La Liga",
        LeagueMode::Bundesliga => "Bundesliga",
        LeagueMode::SerieA => "Serie A",
        LeagueMode::Ligue1 => "Ligue 1",
        LeagueMode::ChampionsLeague => "Champions League",
        LeagueMode::WorldCup => "World Cup",
    }
}

pub fn league_id_label(id: LeagueId) -> String {
    match LeagueMode::from_id(id) {
        Some(mode) => league_label(mode).to_string(),
        None => format!("League {id}"),
    }
}

/// Process-wide league selection. Cloning shares the same slot.
#[derive(Debug, Clone)]
pub struct LeagueSelection {
    inner: Arc<RwLock<LeagueMode>>,
}

impl LeagueSelection {
    pub fn new(mode: LeagueMode) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mode)),
        }
    }

    pub fn get(&self) -> LeagueMode {
        *self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set(&self, mode: LeagueMode) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = mode;
    }

    pub fn cycle(&self) -> LeagueMode {
        let next = self.get().next();
        self.set(next);
        next
    }
}

impl Default for LeagueSelection {
    fn default() -> Self {
        Self::new(LeagueMode::PremierLeague)
    }
}

/// Where the browser reads its league from: pinned at startup, or a selection
/// mutated elsewhere.
#[derive(Debug, Clone)]
pub enum LeagueSource {
    Fixed(LeagueId),
    Selected(LeagueSelection),
}

impl LeagueSource {
    pub fn current(&self) -> LeagueId {
        match self {
            LeagueSource::Fixed(id) => *id,
            LeagueSource::Selected(selection) => selection.get().id(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, LeagueSource::Fixed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Teams,
    Team { id: TeamId },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub browser: TeamBrowser,
    pub teams: HashMap<LeagueId, FetchStatus<Vec<TeamRecord>>>,
    pub team_details: HashMap<TeamId, FetchStatus<TeamDetail>>,
    pub logos: HashMap<TeamId, LogoArt>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub season: Option<u16>,
}

impl AppState {
    pub fn new(source: LeagueSource) -> Self {
        Self {
            screen: Screen::Teams,
            browser: TeamBrowser::new(source),
            teams: HashMap::with_capacity(8),
            team_details: HashMap::with_capacity(64),
            logos: HashMap::with_capacity(64),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            season: None,
        }
    }

    pub fn current_league(&self) -> LeagueId {
        self.browser.league_id()
    }

    /// Status of the team list for the league the browser currently shows.
    /// A league that was never requested reads as loading.
    pub fn current_teams(&self) -> &FetchStatus<Vec<TeamRecord>> {
        self.teams
            .get(&self.current_league())
            .unwrap_or(&TEAMS_NOT_REQUESTED)
    }

    /// Returns the league whose team list must be requested now, marking it in flight.
    /// Fetched lists stay cached per league, so switching back does not refetch. A failed
    /// league is requested again once the browser switches to it.
    pub fn league_to_fetch(&mut self) -> Option<LeagueId> {
        let league = self.current_league();
        let switched = self.browser.observe_league(league);
        match self.teams.get(&league) {
            Some(FetchStatus::Success(_)) | Some(FetchStatus::Loading) => return None,
            Some(FetchStatus::Error(_)) if !switched => return None,
            Some(FetchStatus::Error(_)) | None => {}
        }
        self.teams.insert(league, FetchStatus::Loading);
        Some(league)
    }

    /// Drops whatever is known about the current league and marks a new request in flight.
    pub fn begin_refetch(&mut self) -> LeagueId {
        let league = self.current_league();
        self.teams.insert(league, FetchStatus::Loading);
        league
    }

    /// Switches screen for a route. Returns the team whose detail still has to be fetched.
    pub fn open_route(&mut self, route: Route) -> Option<TeamId> {
        match route {
            Route::Teams => {
                self.screen = Screen::Teams;
                None
            }
            Route::Team(id) => {
                self.screen = Screen::Team { id };
                match self.team_details.get(&id) {
                    Some(FetchStatus::Success(_)) | Some(FetchStatus::Loading) => None,
                    Some(FetchStatus::Error(_)) | None => {
                        self.team_details.insert(id, FetchStatus::Loading);
                        Some(id)
                    }
                }
            }
        }
    }

    pub fn team_detail(&self, id: TeamId) -> Option<&FetchStatus<TeamDetail>> {
        self.team_details.get(&id)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }
}

/// Results flowing from the provider thread back to the UI.
#[derive(Debug, Clone)]
pub enum Delta {
    TeamsLoaded {
        league: LeagueId,
        result: Result<Vec<TeamDetail>, String>,
    },
    TeamLoaded {
        id: TeamId,
        result: Result<TeamDetail, String>,
    },
    LogoLoaded {
        id: TeamId,
        art: LogoArt,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchTeams { league: LeagueId },
    FetchTeam { id: TeamId },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::TeamsLoaded { league, result } => match result {
            Ok(details) => {
                tracing::info!(league = league.0, teams = details.len(), "teams loaded");
                let records = details.iter().map(|d| d.team.clone()).collect::<Vec<_>>();
                for detail in details {
                    state
                        .team_details
                        .insert(detail.team.id, FetchStatus::Success(detail));
                }
                state.push_log(format!(
                    "[INFO] {} teams loaded for {}",
                    records.len(),
                    league_id_label(league)
                ));
                state.teams.insert(league, FetchStatus::Success(records));
                if league == state.current_league() {
                    let shown = state.browser.cards(state.current_teams()).map_or(0, |c| c.len());
                    state.browser.clamp_selection(shown);
                }
            }
            Err(err) => {
                tracing::warn!(league = league.0, error = %err, "teams fetch failed");
                state.push_log(format!("[WARN] Teams fetch error: {err}"));
                state.teams.insert(league, FetchStatus::Error(err));
            }
        },
        Delta::TeamLoaded { id, result } => {
            if let Err(err) = &result {
                tracing::warn!(team = id.0, error = %err, "team fetch failed");
                state.push_log(format!("[WARN] Team {id} fetch error: {err}"));
            }
            state.team_details.insert(id, result.into());
        }
        Delta::LogoLoaded { id, art } => {
            state.logos.insert(id, art);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
