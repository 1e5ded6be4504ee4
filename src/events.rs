//! Event System
//!
//! Entries of the dashboard's activity log.

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

/// Part of the dashboard an event comes from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// The live query session.
    Session,
    /// The panel stack.
    Panels,
    /// Writes issued from a panel.
    Database,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn session(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Session, msg, event_type, log_level)
    }

    pub fn panels(msg: String) -> Self {
        Self::new(Source::Panels, msg, EventType::Info, LogLevel::Debug)
    }

    pub fn database(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Database, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_info_events_are_displayed() {
        let inserted = Event::database("Inserted turtle".into(), EventType::Success, LogLevel::Debug);
        assert!(inserted.should_display());
        let failed = Event::session("Connection lost".into(), EventType::Error, LogLevel::Error);
        assert!(failed.should_display());
    }

    #[test]
    fn test_display_format() {
        let event = Event::session("Connected".into(), EventType::Success, LogLevel::Info);
        let text = event.to_string();
        assert!(text.starts_with("Success ["));
        assert!(text.ends_with("] Connected"));
        assert_eq!(event.source, Source::Session);
    }
}
