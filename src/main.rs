//! schedtab - Terminal timetable viewer with attendance marking
//!
//! A TUI for a one-day, multi-track conference schedule with a Kanagawa
//! Dragon theme. Sessions can be checked for attendance, with overlap
//! protection and a persisted selection.

mod app;
mod attendance;
mod clock;
mod fetch;
mod grid;
mod links;
mod models;
mod store;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use app::App;
use clock::SystemClock;
use fetch::{FetchMessage, ScheduleSource, DEFAULT_SOURCE};
use store::AttendanceStore;

/// Input poll timeout per loop iteration
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How often the event-day clock is re-read
const CLOCK_INTERVAL: Duration = Duration::from_secs(60);

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install().ok();

    // Parse command line arguments for the schedule source
    let args: Vec<String> = std::env::args().collect();
    let source = ScheduleSource::parse(args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_SOURCE));

    run_tui(source).await
}

/// Run the TUI application
async fn run_tui(source: ScheduleSource) -> Result<()> {
    let store = AttendanceStore::at_default_location()?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Spawn the one-shot fetch so the loading view comes up immediately
    let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchMessage>(4);
    let fetch_task = tokio::spawn(fetch::run_fetch_worker(source, fetch_tx));

    let mut app = App::new(store);

    // Main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut fetch_rx).await;

    // Cleanup
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    fetch_task.abort();

    result
}

/// Run the main event loop
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fetch_rx: &mut mpsc::Receiver<FetchMessage>,
) -> Result<()> {
    let clock = SystemClock;
    let mut last_clock_refresh = Instant::now();

    loop {
        // Render the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Check for the fetch result (non-blocking)
        while let Ok(msg) = fetch_rx.try_recv() {
            app.handle_fetch_message(msg, &clock);
        }

        // Keep the "now" marker current
        if last_clock_refresh.elapsed() >= CLOCK_INTERVAL {
            app.refresh_clock(&clock);
            last_clock_refresh = Instant::now();
        }

        // Handle input events with timeout
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
