use crate::state::TeamId;

const TEAMS_PATH: &str = "/teams";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Teams,
    Team(TeamId),
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Route::Teams => TEAMS_PATH.to_string(),
            Route::Team(id) => format!("{TEAMS_PATH}/{id}"),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed == TEAMS_PATH {
            return Some(Route::Teams);
        }
        let rest = trimmed.strip_prefix(TEAMS_PATH)?.strip_prefix('/')?;
        rest.parse::<u32>().ok().map(|id| Route::Team(TeamId(id)))
    }
}

/// Receives navigation requests. Fire-and-forget: nothing is reported back.
pub trait Router {
    fn navigate_to(&mut self, path: &str);
}

/// Collects requested paths so the caller can act on them once its own borrows end.
#[derive(Debug, Default)]
pub struct RouteQueue {
    paths: Vec<String>,
}

impl RouteQueue {
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.paths.drain(..)
    }
}

impl Router for RouteQueue {
    fn navigate_to(&mut self, path: &str) {
        self.paths.push(path.to_string());
    }
}
