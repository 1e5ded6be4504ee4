//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::ui::panels::{Panel, PanelControls};
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Session => Color::Cyan,
        Source::Panels => Color::Gray,
        Source::Database => Color::Green,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM"
    let mut parts = timestamp.split(' ');
    if let (Some(date), Some(time)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date.get(5..10), time.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Shorten transport errors to something that fits a log line.
pub fn clean_error_message(msg: &str) -> String {
    if msg.contains("Connection refused") {
        return "Database server unreachable".to_string();
    }
    if msg.contains("connection closed") || msg.contains("Connection reset") {
        return "Connection to the database server lost".to_string();
    }
    msg.to_string()
}

/// The control hints shown in a panel's title bar.
pub fn control_hints<C>(panel: &Panel<C>) -> String {
    let PanelControls {
        close,
        expand,
        collapse,
    } = panel.controls();
    let mut hints = Vec::new();
    if expand && !panel.is_expanded() {
        hints.push("[e]");
    }
    if collapse && panel.is_expanded() {
        hints.push("[c]");
    }
    if close {
        hints.push("[x]");
    }
    hints.join(" ")
}

/// Format an uptime as "1h 02m 03s", dropping leading zero units.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::panels::PanelEvents;

    #[test]
    fn test_format_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2024-05-01 10:20:30"), "05-01 10:20");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_control_hints_follow_expansion() {
        let (events, _receiver) = PanelEvents::channel();
        let mut panel = Panel::new("Monitors", (), events).with_id("m");
        assert_eq!(control_hints(&panel), "[e] [x]");
        panel.expand();
        assert_eq!(control_hints(&panel), "[c] [x]");
        let panel = panel.with_controls(PanelControls::close_only());
        assert_eq!(control_hints(&panel), "[x]");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
        assert_eq!(format_uptime(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
