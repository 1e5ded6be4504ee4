//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::ui::{splash_duration, tick_rate};
use crate::events::Event as ActivityEvent;
use crate::live::LiveQuery;
use crate::ui::dashboard::{DashboardState, KeyOutcome, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Human readable data source, e.g. the database URL.
    pub target: String,
}

impl UIConfig {
    pub fn new(with_background_color: bool, target: impl Into<String>) -> Self {
        Self {
            with_background_color,
            target: target.into(),
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// The panel dashboard.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    ui_config: UIConfig,

    /// Session every panel queries through.
    live: Arc<dyn LiveQuery>,

    /// Handed to views; the receiving end is `event_receiver`.
    activity_sender: mpsc::Sender<ActivityEvent>,

    /// Receives activity events from the session and background writes.
    event_receiver: mpsc::Receiver<ActivityEvent>,

    /// The current screen being displayed in the application.
    current_screen: Screen,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        live: Arc<dyn LiveQuery>,
        activity_sender: mpsc::Sender<ActivityEvent>,
        event_receiver: mpsc::Receiver<ActivityEvent>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            ui_config,
            live,
            activity_sender,
            event_receiver,
            current_screen: Screen::Splash,
        }
    }

    /// Leaves the splash screen.
    fn open_dashboard(&mut self) {
        let state = DashboardState::new(
            self.live.clone(),
            self.activity_sender.clone(),
            self.start_time,
            self.ui_config.clone(),
        );
        self.current_screen = Screen::Dashboard(Box::new(state));
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();

    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                state.add_event(event);
            }
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update();
        }
        terminal.draw(|f| render(f, &mut app.current_screen))?;

        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration() {
                app.open_dashboard();
                continue;
            }
        }

        // Let spawned queries make progress between frames
        tokio::task::yield_now().await;

        if event::poll(tick_rate())? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            return Ok(());
                        }
                        // Any other key skips the splash screen
                        app.open_dashboard();
                    }
                    Screen::Dashboard(state) => {
                        if state.handle_key(key.code) == KeyOutcome::Quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &mut Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
