use std::io;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;

use teams_terminal::app::App;
use teams_terminal::config::{Config, SourceKind};
use teams_terminal::http_client::init_http_client;
use teams_terminal::logging;
use teams_terminal::provider::spawn_provider;
use teams_terminal::source::{ApiFootballSource, DemoSource};
use teams_terminal::state::{self, AppState, apply_delta};
use teams_terminal::ui;

fn main() -> ExitCode {
    let cfg = Config::load();
    if let Some(path) = cfg.log_file.as_deref()
        && let Err(err) = logging::init_file_logging(path)
    {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match run(cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "exiting");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: Config) -> Result<()> {
    init_http_client(cfg.http_timeout)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    match cfg.source {
        SourceKind::Demo => spawn_provider(DemoSource, false, tx, cmd_rx),
        SourceKind::ApiFootball => {
            spawn_provider(ApiFootballSource::new(cfg.api.clone()), cfg.logos, tx, cmd_rx)
        }
    };

    let mut state = AppState::new(cfg.league_source());
    if cfg.source == SourceKind::ApiFootball {
        state.season = Some(cfg.api.season);
        if cfg.api.api_key.is_none() {
            state.push_log("[WARN] API_FOOTBALL_KEY is not set; run with --demo for built-in teams");
        }
    }
    tracing::info!(league = state.current_league().0, source = ?cfg.source, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let size = terminal.size()?;
        app.state.browser.set_columns(ui::grid_columns(size.width));
        app.sync_teams();

        terminal.draw(|f| ui::draw(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
