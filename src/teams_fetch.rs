use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::http_cache::{fetch_json_cached, invalidate};
use crate::http_client::http_client;
use crate::state::{LeagueId, TeamDetail, TeamId, TeamRecord, Venue};

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const API_KEY_HEADER: &str = "x-apisports-key";

#[derive(Debug, Clone)]
pub struct ApiFootballConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub season: u16,
    pub cache_ttl: Duration,
}

pub fn teams_url(base_url: &str, league: LeagueId, season: u16) -> String {
    format!(
        "{}/teams?league={league}&season={season}",
        base_url.trim_end_matches('/')
    )
}

pub fn team_url(base_url: &str, id: TeamId) -> String {
    format!("{}/teams?id={id}", base_url.trim_end_matches('/'))
}

pub fn fetch_league_teams(cfg: &ApiFootballConfig, league: LeagueId) -> Result<Vec<TeamDetail>> {
    let url = teams_url(&cfg.base_url, league, cfg.season);
    let body = fetch_api(cfg, &url).context("league teams request failed")?;
    parse_teams_json(&body).inspect_err(|_| invalidate(&url))
}

pub fn fetch_team(cfg: &ApiFootballConfig, id: TeamId) -> Result<TeamDetail> {
    let url = team_url(&cfg.base_url, id);
    let body = fetch_api(cfg, &url).context("team request failed")?;
    parse_team_json(&body).inspect_err(|_| invalidate(&url))
}

fn fetch_api(cfg: &ApiFootballConfig, url: &str) -> Result<String> {
    let Some(key) = cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        return Err(anyhow::anyhow!("API_FOOTBALL_KEY is not set"));
    };
    let client = http_client()?;
    fetch_json_cached(client, url, &[(API_KEY_HEADER, key)], cfg.cache_ttl)
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<ApiTeamEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiTeamEntry {
    team: ApiTeam,
    #[serde(default)]
    venue: Option<ApiVenue>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    founded: Option<u16>,
    #[serde(default)]
    national: Option<bool>,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiVenue {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    capacity: Option<u32>,
    #[serde(default)]
    surface: Option<String>,
}

/// Parses a `/teams?league=..` payload. An empty `response` is a valid, empty league.
pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamDetail>> {
    let data = parse_response(raw)?;
    Ok(data.response.into_iter().map(build_detail).collect())
}

/// Parses a `/teams?id=..` payload, taking the first entry.
pub fn parse_team_json(raw: &str) -> Result<TeamDetail> {
    let data = parse_response(raw)?;
    data.response
        .into_iter()
        .next()
        .map(build_detail)
        .ok_or_else(|| anyhow::anyhow!("team not found"))
}

fn parse_response(raw: &str) -> Result<ApiResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ApiResponse {
            errors: Value::Null,
            response: Vec::new(),
        });
    }
    let data: ApiResponse = serde_json::from_str(trimmed).context("invalid teams json")?;
    if let Some(msg) = api_error_message(&data.errors) {
        return Err(anyhow::anyhow!("api error: {msg}"));
    }
    Ok(data)
}

/// API-Football reports errors as `[]` when there are none, otherwise as an object
/// (`{"token": "..."}`) or an array of strings.
fn api_error_message(errors: &Value) -> Option<String> {
    let parts: Vec<String> = match errors {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value.as_str() {
                Some(text) => format!("{key}: {text}"),
                None => format!("{key}: {value}"),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text.clone()],
        _ => Vec::new(),
    };
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

fn build_detail(entry: ApiTeamEntry) -> TeamDetail {
    let ApiTeamEntry { team, venue } = entry;
    let venue = venue.and_then(|v| {
        if v.name.is_none() && v.city.is_none() && v.capacity.is_none() && v.surface.is_none() {
            None
        } else {
            Some(Venue {
                name: non_empty(v.name),
                city: non_empty(v.city),
                capacity: v.capacity,
                surface: non_empty(v.surface),
            })
        }
    });
    TeamDetail {
        team: TeamRecord {
            id: TeamId(team.id),
            name: team.name,
            logo_url: team.logo.unwrap_or_default(),
        },
        code: non_empty(team.code),
        country: non_empty(team.country),
        founded: team.founded,
        national: team.national.unwrap_or(false),
        venue,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{api_error_message, team_url, teams_url};
    use crate::state::{LeagueId, TeamId};

    #[test]
    fn empty_error_list_is_not_an_error() {
        assert_eq!(api_error_message(&json!([])), None);
        assert_eq!(api_error_message(&json!(null)), None);
    }

    #[test]
    fn error_object_is_flattened() {
        let msg = api_error_message(&json!({"token": "Error/Missing application key"}));
        assert_eq!(msg.as_deref(), Some("token: Error/Missing application key"));
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        assert_eq!(
            teams_url("https://example.test/", LeagueId(39), 2024),
            "https://example.test/teams?league=39&season=2024"
        );
        assert_eq!(team_url("https://example.test", TeamId(42)), "https://example.test/teams?id=42");
    }
}
