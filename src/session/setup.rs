//! Session setup and initialization

use crate::config::{ServerSettings, SessionConfig};
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::database::MemoryDatabase;
use crate::database::demo;
use crate::database::models::ensure_tables;
use crate::events::{Event, EventType};
use crate::live::{LiveQuery, LocalSession, WsSession};
use crate::logging::LogLevel;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Where every live query goes.
    pub live: Arc<dyn LiveQuery>,
    /// Human readable data source.
    pub target: String,
    /// Sender handed to views for background write results.
    pub event_sender: mpsc::Sender<Event>,
    /// Activity events for the dashboard or the console.
    pub event_receiver: mpsc::Receiver<Event>,
}

impl std::fmt::Debug for SessionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionData")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Sets up the live query session.
///
/// With `local` the dashboard runs against an in-process database seeded
/// with demo data; otherwise it connects to the server `config` points at.
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - The server could not be reached or seeding failed
pub async fn setup_session(
    config: &SessionConfig,
    local: bool,
) -> Result<SessionData, Box<dyn Error>> {
    let (event_sender, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);

    let (live, target): (Arc<dyn LiveQuery>, String) = if local {
        let db = Arc::new(MemoryDatabase::new(config.db.clone()));
        ensure_tables(&db, &ServerSettings::default().extra_tables);
        let rows = demo::seed(&db)?;
        log::debug!("Local session ready with {} rows", rows);
        (
            Arc::new(LocalSession::new(db)),
            format!("local:{}", config.db),
        )
    } else {
        let session = WsSession::connect(config).await?;
        let url = session.url().to_string();
        (Arc::new(session), url)
    };

    let _ = event_sender
        .send(Event::session(
            format!("Connected to {}", target),
            EventType::Success,
            LogLevel::Info,
        ))
        .await;

    Ok(SessionData {
        live,
        target,
        event_sender,
        event_receiver,
    })
}
