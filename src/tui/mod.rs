pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend as TermBackend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use crate::api::{Backend, HttpBackend};
use crate::config::Config;
use crate::controller::Controller;
use app::App;
use ui::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_tui(config: Config) -> Result<()> {
    let backend = HttpBackend::new(&config.api_url)?;
    let mut ctl = Controller::new(backend, config.default_view);
    info!(api = %config.api_url, "starting ui");
    ctl.boot().await;
    let mut app = App::new(ctl);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    // Run loop
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "ui loop failed");
    }
    res
}

async fn run_app<T: TermBackend, B: Backend>(terminal: &mut Terminal<T>, app: &mut App<B>) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key).await,
                Event::Mouse(mouse) => app.handle_mouse(mouse).await,
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
