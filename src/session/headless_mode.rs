//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::database::Query;
use crate::database::models::{Model, Monitor, Namespace};
use crate::print_cmd_warn;
use crate::live::{QueryRequest, ResultSet};
use std::error::Error;
use std::future::Future;

/// Renders one result set as a console line.
pub fn describe(table: &str, update: &ResultSet) -> String {
    match update {
        Ok(rows) => {
            let names: Vec<&str> = rows
                .iter()
                .map(|row| {
                    row.get("name")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("?")
                })
                .collect();
            format!("{} ({}): {}", table, rows.len(), names.join(", "))
        }
        Err(e) => format!("{}: {}", table, e),
    }
}

/// Why the headless loop stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HeadlessExit {
    /// The user pressed Ctrl+C.
    Interrupted,
    /// The changefeed of this table ended.
    Closed(&'static str),
}

/// Prints activity events and the monitors and namespaces changefeeds until
/// `shutdown` resolves or a changefeed ends.
pub async fn follow(
    session: &mut SessionData,
    shutdown: impl Future<Output = ()>,
) -> HeadlessExit {
    let mut monitors = session
        .live
        .subscribe(QueryRequest::changes(Query::table(Monitor::TABLE)));
    let mut namespaces = session
        .live
        .subscribe(QueryRequest::changes(Query::table(Namespace::TABLE)));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                println!("{}", event);
            }
            update = monitors.next() => {
                let Some(update) = update else {
                    return HeadlessExit::Closed(Monitor::TABLE);
                };
                println!("{}", describe(Monitor::TABLE, &update));
            }
            update = namespaces.next() => {
                let Some(update) = update else {
                    return HeadlessExit::Closed(Namespace::TABLE);
                };
                println!("{}", describe(Namespace::TABLE, &update));
            }
            _ = &mut shutdown => {
                return HeadlessExit::Interrupted;
            }
        }
    }
}

/// Runs [`follow`] until Ctrl+C. A session that closes on its own is an error.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.target);

    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let exit = follow(&mut session, ctrl_c).await;

    print_session_shutdown();
    match exit {
        HeadlessExit::Interrupted => {
            print_session_exit_success();
            Ok(())
        }
        HeadlessExit::Closed(table) => {
            print_cmd_warn!("Session closed", "{} stopped updating", table);
            Err(format!("Session on {} closed", session.target).into())
        }
    }
}
