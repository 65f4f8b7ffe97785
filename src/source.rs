use anyhow::{Context, Result};

use crate::http_cache::fetch_bytes_cached;
use crate::http_client::http_client;
use crate::state::{LeagueId, LeagueMode, TeamDetail, TeamId, TeamRecord, Venue};
use crate::teams_fetch::{self, ApiFootballConfig};

const LOGO_BASE_URL: &str = "https://media.api-sports.io/football/teams";

/// Where team data comes from. Implementations are called from the provider thread only.
pub trait TeamSource: Send {
    fn name(&self) -> &'static str;

    fn fetch_teams(&self, league: LeagueId) -> Result<Vec<TeamDetail>>;

    fn fetch_team(&self, id: TeamId) -> Result<TeamDetail>;

    fn fetch_logo(&self, url: &str) -> Result<Vec<u8>> {
        let client = http_client()?;
        fetch_bytes_cached(client, url).context("logo fetch failed")
    }
}

pub struct ApiFootballSource {
    cfg: ApiFootballConfig,
}

impl ApiFootballSource {
    pub fn new(cfg: ApiFootballConfig) -> Self {
        Self { cfg }
    }
}

impl TeamSource for ApiFootballSource {
    fn name(&self) -> &'static str {
        "api-football"
    }

    fn fetch_teams(&self, league: LeagueId) -> Result<Vec<TeamDetail>> {
        teams_fetch::fetch_league_teams(&self.cfg, league)
    }

    fn fetch_team(&self, id: TeamId) -> Result<TeamDetail> {
        teams_fetch::fetch_team(&self.cfg, id)
    }
}

/// Built-in rosters for running offline. No network access, logos included: cards show
/// initials.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSource;

// (id, name, code, founded, venue, city, capacity)
type DemoTeam = (u32, &'static str, &'static str, u16, &'static str, &'static str, u32);

const PREMIER_LEAGUE: &[DemoTeam] = &[
    (42, "Arsenal", "ARS", 1886, "Emirates Stadium", "London", 60383),
    (66, "Aston Villa", "AST", 1874, "Villa Park", "Birmingham", 42824),
    (35, "Bournemouth", "BOU", 1899, "Vitality Stadium", "Bournemouth", 11307),
    (55, "Brentford", "BRE", 1889, "Gtech Community Stadium", "London", 17250),
    (51, "Brighton", "BRI", 1901, "American Express Stadium", "Falmer", 31876),
    (44, "Burnley", "BUR", 1882, "Turf Moor", "Burnley", 21944),
    (49, "Chelsea", "CHE", 1905, "Stamford Bridge", "London", 41841),
    (52, "Crystal Palace", "CRY", 1905, "Selhurst Park", "London", 26309),
    (45, "Everton", "EVE", 1878, "Goodison Park", "Liverpool", 40569),
    (36, "Fulham", "FUL", 1879, "Craven Cottage", "London", 29130),
    (63, "Leeds", "LEE", 1919, "Elland Road", "Leeds", 37890),
    (40, "Liverpool", "LIV", 1892, "Anfield", "Liverpool", 61276),
    (50, "Manchester City", "MAC", 1880, "Etihad Stadium", "Manchester", 55097),
    (33, "Manchester United", "MUN", 1878, "Old Trafford", "Manchester", 76212),
    (34, "Newcastle", "NEW", 1892, "St. James' Park", "Newcastle upon Tyne", 52758),
    (65, "Nottingham Forest", "NOT", 1865, "The City Ground", "Nottingham", 30445),
    (746, "Sunderland", "SUN", 1879, "Stadium of Light", "Sunderland", 49000),
    (47, "Tottenham", "TOT", 1882, "Tottenham Hotspur Stadium", "London", 62850),
    (48, "West Ham", "WES", 1895, "London Stadium", "London", 62500),
    (39, "Wolves", "WOL", 1877, "Molineux Stadium", "Wolverhampton", 31750),
];

const LA_LIGA: &[DemoTeam] = &[
    (529, "Barcelona", "BAR", 1899, "Estadi Olímpic Lluís Companys", "Barcelona", 55926),
    (541, "Real Madrid", "REA", 1902, "Estadio Santiago Bernabéu", "Madrid", 85454),
    (530, "Atletico Madrid", "MAD", 1903, "Estadio Cívitas Metropolitano", "Madrid", 70460),
    (531, "Athletic Club", "BIL", 1898, "San Mamés Barria", "Bilbao", 53289),
    (548, "Real Sociedad", "RSO", 1909, "Reale Arena", "San Sebastián", 39500),
    (543, "Real Betis", "BET", 1907, "Estadio Benito Villamarín", "Sevilla", 60721),
    (533, "Villarreal", "VIL", 1923, "Estadio de la Cerámica", "Villarreal", 23500),
    (536, "Sevilla", "SEV", 1890, "Estadio Ramón Sánchez Pizjuán", "Sevilla", 48649),
    (532, "Valencia", "VAL", 1919, "Estadio de Mestalla", "Valencia", 49430),
];

static ROSTERS: [(LeagueMode, &[DemoTeam], &str); 2] = [
    (LeagueMode::PremierLeague, PREMIER_LEAGUE, "England"),
    (LeagueMode::LaLiga, LA_LIGA, "Spain"),
];

impl DemoSource {
    fn detail(row: &DemoTeam, country: &str) -> TeamDetail {
        let (id, name, code, founded, venue, city, capacity) = *row;
        TeamDetail {
            team: TeamRecord {
                id: TeamId(id),
                name: name.to_string(),
                logo_url: format!("{LOGO_BASE_URL}/{id}.png"),
            },
            code: Some(code.to_string()),
            country: Some(country.to_string()),
            founded: Some(founded),
            national: false,
            venue: Some(Venue {
                name: Some(venue.to_string()),
                city: Some(city.to_string()),
                capacity: Some(capacity),
                surface: Some("grass".to_string()),
            }),
        }
    }
}

impl TeamSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn fetch_teams(&self, league: LeagueId) -> Result<Vec<TeamDetail>> {
        let Some((_, roster, country)) = ROSTERS
            .iter()
            .find(|(mode, ..)| Some(*mode) == LeagueMode::from_id(league))
        else {
            return Ok(Vec::new());
        };
        Ok(roster.iter().map(|row| Self::detail(row, country)).collect())
    }

    fn fetch_team(&self, id: TeamId) -> Result<TeamDetail> {
        for (_, roster, country) in &ROSTERS {
            if let Some(row) = roster.iter().find(|row| row.0 == id.0) {
                return Ok(Self::detail(row, country));
            }
        }
        Err(anyhow::anyhow!("unknown team {id}"))
    }

    fn fetch_logo(&self, url: &str) -> Result<Vec<u8>> {
        Err(anyhow::anyhow!("demo source is offline: {url}"))
    }
}
