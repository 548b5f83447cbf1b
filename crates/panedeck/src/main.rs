//! panedeck - configurable terminal dashboard
//!
//! Loads a TOML dashboard, lays its widgets out in tabs and lets the user
//! move focus between them with the keyboard.

mod cli;

use clap::Parser;
use cli::Cli;
use color_eyre::Result;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use panedeck_core::{
    AppCoordinator, DashboardConfig, GridResolver, InputEvent, LaunchRequest, Message, MessageBus,
    Theme,
};
use panedeck_ui::{App, AppLayout, WidgetManager};
use panedeck_widgets::{build_widget, WidgetEnv};
use ratatui::prelude::*;
use std::io::stdout;
use std::process::{Command, ExitCode};
use std::time::Duration;
use tracing::{debug, error, info};

/// Oldest configuration schema this build understands.
const SUPPORTED_SCHEMA: &str = "1.0.0";

/// Size assumed for `--check` when no terminal is attached.
const FALLBACK_SIZE: (u16, u16) = (120, 40);

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Err(e) = cli::init_logging(&cli) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let config = match DashboardConfig::load_validated(&cli.config, SUPPORTED_SCHEMA) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %cli.config.display(), "{e}");
            eprintln!("{e}");
            return Ok(ExitCode::from(1));
        }
    };

    let (cols, rows) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);

    if cli.check {
        print_summary(&config, cols, rows);
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("panedeck-worker")
        .build()?;
    let guard = runtime.enter();

    let env = WidgetEnv::from_config(&config);
    let (width, height) = AppLayout::grid_size(cols, rows);
    let manager = WidgetManager::build(&config, width, height, MessageBus::default(), |spec| {
        build_widget(spec, &env)
    })?;
    let theme = config
        .theme
        .as_deref()
        .and_then(Theme::by_name)
        .unwrap_or_else(Theme::dark);

    let mut app = App::new(manager, theme);
    app.start(runtime.handle());
    info!(config = %cli.config.display(), "dashboard started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    // Widget tasks run for the lifetime of the dashboard.
    drop(guard);
    runtime.shutdown_background();

    match app.take_launch_request() {
        Some(request) => launch(&request),
        None => Ok(ExitCode::SUCCESS),
    }
}

fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            let msg = Message::from(InputEvent::from(event::read()?));
            if !msg.is_none() {
                app.dispatch(msg);
            }
        }

        if app.should_quit() {
            break;
        }

        app.tick();
    }

    Ok(())
}

/// Runs a command picked from a menu in place of the dashboard.
fn launch(request: &LaunchRequest) -> Result<ExitCode> {
    debug!(command = %request.command, envs = request.envs.len(), "running launch command");
    let status = Command::new("sh")
        .arg("-c")
        .arg(&request.command)
        .envs(request.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .status()?;
    let code = status.code().unwrap_or(1);
    info!(code, "launch command finished");
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

fn print_summary(config: &DashboardConfig, cols: u16, rows: u16) {
    let (width, height) = AppLayout::grid_size(cols, rows);
    let layout = GridResolver::new(width, height).resolve(&config.layout);
    println!(
        "{}: {} widgets, {} tabs ({width}x{height})",
        config.schema_version,
        config.widgets.len(),
        layout.tabs.len()
    );
    for (i, tab) in layout.tabs.iter().enumerate() {
        println!("{}. {}", i + 1, tab.name);
        for rect in layout.tab_rects(i) {
            println!(
                "   {:<20} {:>4}x{:<4} at ({}, {})",
                rect.widget_id, rect.width, rect.height, rect.x, rect.y
            );
        }
    }
}
