use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use clap::Parser;

use crate::http_cache::cache_dir;
use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::state::{LeagueId, LeagueMode, LeagueSelection, LeagueSource};
use crate::teams_fetch::{ApiFootballConfig, DEFAULT_BASE_URL};

const DEFAULT_CACHE_TTL_SECS: u64 = 6 * 60 * 60;
const LOG_FILE: &str = "teams_terminal.log";

/// Browse football teams by league in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "teams_terminal", version, about)]
pub struct Cli {
    /// Pin the browser to one league id; without it the league can be cycled with `L`.
    #[arg(long, env = "TEAMS_LEAGUE")]
    pub league: Option<u32>,

    /// Season start year (defaults to the current season).
    #[arg(long, env = "TEAMS_SEASON")]
    pub season: Option<u16>,

    /// Use built-in rosters instead of API-Football.
    #[arg(long)]
    pub demo: bool,

    /// Skip downloading team logos.
    #[arg(long)]
    pub no_logos: bool,

    #[arg(long, env = "TEAMS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "API_FOOTBALL_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "API_FOOTBALL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    ApiFootball,
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub league: Option<LeagueId>,
    pub source: SourceKind,
    pub logos: bool,
    pub log_file: Option<PathBuf>,
    pub http_timeout: Duration,
    pub api: ApiFootballConfig,
}

impl Config {
    /// Loads `.env.local` and `.env` (first one wins per key) and parses the command line.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_cli(Cli::parse(), std::env::var("TEAMS_SOURCE").ok().as_deref())
    }

    pub fn from_cli(cli: Cli, source_env: Option<&str>) -> Self {
        let demo_env = source_env
            .map(|s| s.trim().eq_ignore_ascii_case("demo"))
            .unwrap_or(false);
        let source = if cli.demo || demo_env {
            SourceKind::Demo
        } else {
            SourceKind::ApiFootball
        };
        let season = cli
            .season
            .unwrap_or_else(|| current_season(Utc::now().date_naive()));
        let log_file = cli
            .log_file
            .or_else(|| cache_dir().map(|dir| dir.join(LOG_FILE)));
        Self {
            league: cli.league.map(LeagueId),
            source,
            logos: !cli.no_logos,
            log_file,
            http_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            api: ApiFootballConfig {
                base_url: cli.base_url,
                api_key: cli.api_key.filter(|k| !k.trim().is_empty()),
                season,
                cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
            },
        }
    }

    /// A pinned league gives a fixed source; otherwise the shared selection, starting at
    /// the Premier League.
    pub fn league_source(&self) -> LeagueSource {
        match self.league {
            Some(id) => LeagueSource::Fixed(id),
            None => LeagueSource::Selected(LeagueSelection::new(LeagueMode::PremierLeague)),
        }
    }
}

/// European seasons are named by their starting year and begin in July/August.
pub fn current_season(today: NaiveDate) -> u16 {
    let year = if today.month() < 7 {
        today.year() - 1
    } else {
        today.year()
    };
    u16::try_from(year).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;

    use super::{Cli, Config, SourceKind, current_season};
    use crate::state::{LeagueId, LeagueSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn season_rolls_over_in_july() {
        assert_eq!(current_season(date(2026, 6, 30)), 2025);
        assert_eq!(current_season(date(2026, 7, 1)), 2026);
        assert_eq!(current_season(date(2026, 10, 16)), 2026);
    }

    #[test]
    fn league_flag_pins_the_source() {
        let cli = Cli::parse_from(["teams_terminal", "--league", "140", "--season", "2023"]);
        let cfg = Config::from_cli(cli, None);
        assert!(matches!(cfg.league_source(), LeagueSource::Fixed(LeagueId(140))));
        assert_eq!(cfg.api.season, 2023);
    }

    #[test]
    fn demo_can_come_from_env() {
        let cli = Cli::parse_from(["teams_terminal", "--season", "2024"]);
        let cfg = Config::from_cli(cli, Some("Demo"));
        assert_eq!(cfg.source, SourceKind::Demo);
        assert!(!cfg.league_source().is_fixed());
    }
}
