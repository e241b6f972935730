#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};
use tower_builder::app::{App, AppResult};
use tower_builder::config::{Config, loader};
use tower_builder::sound::AudioState;
use tower_builder::ui;
use tower_builder::{FrameClock, Scheduler};

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "tower-builder.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    // Redirect stderr to the log file
    let stderr_fd = std::io::stderr().as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Tower Builder");

    let config = match loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            // Continue with default configuration
            Config::default()
        }
    };

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&config);
    let clock = FrameClock::new(config.display.frame());
    let res = run_app(&mut terminal, app, clock);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    info!("Tower Builder exited");
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut clock: FrameClock,
) -> AppResult<()> {
    // Flush anything typed before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    // The audio thread may fail after startup, so keep checking but only warn once
    let mut audio_error_logged = false;

    loop {
        let frames = clock.tick(&mut || app.on_tick());
        if frames > 0 {
            terminal.draw(|f| ui::render(f, &mut app))?;
        }

        if !audio_error_logged && !app.world.resource::<AudioState>().is_audio_available() {
            error!("Audio device is unavailable. Continuing without sound.");
            audio_error_logged = true;
        }

        if app.should_quit {
            return Ok(());
        }

        if event::poll(clock.until_next())? {
            handle_event(&mut app, event::read()?);
        }
    }
}

fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => {
            // Only presses count; repeats from a held key would drop twice
            if key.kind != KeyEventKind::Press {
                return;
            }
            debug!("Key event: {key:?}");
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                KeyCode::Char(' ') | KeyCode::Enter => app.press(),
                KeyCode::Char('m') => app.toggle_mute(),
                _ => {}
            }
        }
        Event::Mouse(mouse) => {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                app.press();
            }
        }
        _ => {}
    }
}
