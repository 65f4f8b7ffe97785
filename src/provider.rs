use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::logo::{self, LOGO_DOTS_X, LOGO_DOTS_Y};
use crate::source::TeamSource;
use crate::state::{Delta, ProviderCommand, TeamDetail, TeamId};

/// Runs `source` on its own thread until the command channel closes.
pub fn spawn_provider<S>(
    source: S,
    logos: bool,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    S: TeamSource + 'static,
{
    thread::spawn(move || {
        tracing::info!(source = source.name(), "provider started");
        let mut worker = Worker::new(source, logos, tx);
        loop {
            // Commands win over queued logo downloads so a league switch is never stuck
            // behind the previous league's logos.
            let cmd = if worker.has_pending_logos() {
                match cmd_rx.try_recv() {
                    Ok(cmd) => Some(cmd),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => break,
                }
            } else {
                match cmd_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break,
                }
            };
            match cmd {
                Some(cmd) => worker.handle(cmd),
                None => {
                    worker.step_logo();
                }
            }
        }
        tracing::info!("provider stopped");
    })
}

pub struct Worker<S> {
    source: S,
    tx: Sender<Delta>,
    logos: bool,
    pending_logos: VecDeque<(TeamId, String)>,
    seen_logos: HashSet<TeamId>,
}

impl<S: TeamSource> Worker<S> {
    pub fn new(source: S, logos: bool, tx: Sender<Delta>) -> Self {
        Self {
            source,
            tx,
            logos,
            pending_logos: VecDeque::new(),
            seen_logos: HashSet::new(),
        }
    }

    pub fn has_pending_logos(&self) -> bool {
        !self.pending_logos.is_empty()
    }

    pub fn handle(&mut self, cmd: ProviderCommand) {
        match cmd {
            ProviderCommand::FetchTeams { league } => {
                tracing::info!(league = league.0, "fetching teams");
                let result = self.source.fetch_teams(league);
                if let Ok(details) = &result {
                    self.queue_logos(details);
                }
                let _ = self.tx.send(Delta::TeamsLoaded {
                    league,
                    result: result.map_err(|err| format!("{err:#}")),
                });
            }
            ProviderCommand::FetchTeam { id } => {
                tracing::info!(team = id.0, "fetching team");
                let result = self.source.fetch_team(id);
                if let Ok(detail) = &result {
                    self.queue_logos(std::slice::from_ref(detail));
                }
                let _ = self.tx.send(Delta::TeamLoaded {
                    id,
                    result: result.map_err(|err| format!("{err:#}")),
                });
            }
        }
    }

    /// Downloads and decodes one queued logo. Returns false when the queue was empty.
    pub fn step_logo(&mut self) -> bool {
        let Some((id, url)) = self.pending_logos.pop_front() else {
            return false;
        };
        let art = self
            .source
            .fetch_logo(&url)
            .and_then(|bytes| logo::decode_logo(&bytes, LOGO_DOTS_X, LOGO_DOTS_Y));
        match art {
            Ok(art) => {
                let _ = self.tx.send(Delta::LogoLoaded { id, art });
            }
            Err(err) => tracing::debug!(team = id.0, error = %err, "logo unavailable"),
        }
        true
    }

    fn queue_logos(&mut self, details: &[TeamDetail]) {
        if !self.logos {
            return;
        }
        for detail in details {
            let team = &detail.team;
            if team.logo_url.is_empty() || !self.seen_logos.insert(team.id) {
                continue;
            }
            self.pending_logos.push_back((team.id, team.logo_url.clone()));
        }
    }
}
