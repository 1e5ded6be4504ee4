// Copyright (c) 2024 PASCANI. All rights reserved.

mod cli_messages;
mod config;
mod consts;
mod database;
mod environment;
mod events;
mod live;
mod logging;
mod server;
mod session;
mod ui;

use crate::config::{Config, ServerSettings, SessionConfig, get_config_path};
use crate::consts::cli_consts::HEALTH_PATH;
use crate::database::models::MODEL_TABLES;
use crate::database::{Mutation, Query, demo};
use crate::environment::Environment;
use crate::live::{LiveQuery, QueryRequest, WsSession};
use crate::server::Server;
use crate::session::headless_mode::describe;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,

    /// Path of the JSON config file. Defaults to ~/.pascani/config.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Where a client subcommand connects to.
#[derive(clap::Args, Debug, Default)]
struct Connection {
    /// Hostname of the server
    #[arg(long)]
    host: Option<String>,

    /// Port of the server
    #[arg(long)]
    port: Option<u16>,

    /// Database name
    #[arg(long)]
    db: Option<String>,
}

impl Connection {
    /// Flags win over the config file.
    fn apply(&self, mut session: SessionConfig) -> SessionConfig {
        if let Some(host) = &self.host {
            session.host = host.clone();
        }
        if let Some(port) = self.port {
            session.port = port;
        }
        if let Some(db) = &self.db {
            session.db = db.clone();
        }
        session
    }
}

#[derive(Subcommand)]
enum Command {
    /// Open the monitoring dashboard
    Dashboard {
        #[command(flatten)]
        connection: Connection,

        /// Print live query updates instead of drawing the dashboard
        #[arg(long, action = clap::ArgAction::SetTrue)]
        headless: bool,

        /// Use an in-process database with demo data instead of a server
        #[arg(long, action = clap::ArgAction::SetTrue)]
        local: bool,

        /// Disable background colors
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_background: bool,
    },
    /// Start the server: database bridge, health check and static files
    Serve {
        /// Port to listen on, overriding PASCANI_ENV and PORT
        #[arg(long)]
        port: Option<u16>,

        /// Directory of static files to serve
        #[arg(long, value_name = "DIR")]
        dist: Option<PathBuf>,

        /// Only accept queries on model tables and configured extra tables
        #[arg(long, action = clap::ArgAction::SetTrue)]
        restricted: bool,

        /// Seed the database with demo data
        #[arg(long, action = clap::ArgAction::SetTrue)]
        demo: bool,
    },
    /// Write the config file with every setting filled in
    InitConfig {
        /// Overwrite an existing file
        #[arg(long, action = clap::ArgAction::SetTrue)]
        force: bool,
    },
    /// Create a table for every model on a running server
    InitDb {
        #[command(flatten)]
        connection: Connection,
    },
    /// Print every result set of a table
    Watch {
        /// Table to observe
        table: String,

        /// Print the current rows and exit
        #[arg(long, action = clap::ArgAction::SetTrue)]
        once: bool,

        #[command(flatten)]
        connection: Connection,
    },
    /// Insert a JSON document into a table
    Insert {
        table: String,

        /// The document, e.g. '{"name":"Leonardo"}'
        document: String,

        #[command(flatten)]
        connection: Connection,
    },
    /// Check that a server is up and list its tables
    Status {
        #[command(flatten)]
        connection: Connection,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => get_config_path()?,
    };
    let config = Config::load_or_default(&config_path)
        .map_err(|e| format!("Failed to load config {}: {}", config_path.display(), e))?;

    match args.command {
        Command::Dashboard {
            connection,
            headless,
            local,
            no_background,
        } => {
            let session_config = connection.apply(config.session);
            if headless {
                logging::init();
            }
            let session = setup_session(&session_config, local).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, !no_background).await
            }
        }
        Command::Serve {
            port,
            dist,
            restricted,
            demo,
        } => {
            logging::init();
            let mut settings = config.server;
            if let Some(dist) = dist {
                settings.dist_dir = dist;
            }
            if restricted {
                settings.allow_any_query = false;
            }
            serve(settings, port, demo).await
        }
        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                let details = format!("{} (pass --force to overwrite)", config_path.display());
                print_cmd_error!("Config file exists", details.as_str());
                return Err("Config file exists".into());
            }
            config.save(&config_path)?;
            print_cmd_success!("Config written", "{}", config_path.display());
            Ok(())
        }
        Command::InitDb { connection } => {
            logging::init();
            let session = WsSession::connect(&connection.apply(config.session)).await?;
            let tables = MODEL_TABLES
                .iter()
                .map(|table| table.to_string())
                .chain(config.server.extra_tables.iter().cloned());
            for table in tables {
                session.run(Mutation::table_create(table.as_str())).await?;
                print_cmd_info!("Table ready", "{}", table);
            }
            print_cmd_success!("Database initialized", "{}", session.url());
            Ok(())
        }
        Command::Watch {
            table,
            once,
            connection,
        } => {
            logging::init();
            let session = WsSession::connect(&connection.apply(config.session)).await?;
            let query = Query::table(table.as_str());
            let request = if once {
                QueryRequest::once(query)
            } else {
                QueryRequest::changes(query)
            };
            let mut subscription = session.subscribe(request);
            loop {
                tokio::select! {
                    update = subscription.next() => {
                        let Some(update) = update else { break };
                        let failed = update.is_err();
                        println!("{}", describe(&table, &update));
                        if once || failed {
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok(())
        }
        Command::Insert {
            table,
            document,
            connection,
        } => {
            let document: serde_json::Value = serde_json::from_str(&document).map_err(|e| {
                print_cmd_error!("Invalid document", e.to_string().as_str());
                e
            })?;
            logging::init();
            let session = WsSession::connect(&connection.apply(config.session)).await?;
            let id = session.run(Mutation::insert(table.as_str(), document)).await?;
            print_cmd_success!("Inserted", "{} into {}", id, table);
            Ok(())
        }
        Command::Status { connection } => {
            let session_config = connection.apply(config.session);
            let url = format!("{}{}", session_config.http_url(), HEALTH_PATH);
            let health: serde_json::Value = reqwest::get(&url).await?.error_for_status()?.json().await?;
            print_cmd_success!("Server is up", "{}", url);
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(())
        }
    }
}

/// Runs the server until Ctrl+C.
async fn serve(
    settings: ServerSettings,
    port: Option<u16>,
    seed_demo: bool,
) -> Result<(), Box<dyn Error>> {
    let environment = Environment::from_env();
    let port = port.unwrap_or_else(|| environment.port_from_env());
    log::info!("Starting {} server", environment);
    if environment.is_production() && settings.allow_any_query {
        print_cmd_warn!(
            "Unrestricted bridge",
            "clients may query any table, pass --restricted to limit them"
        );
    }

    let server = Server::bind(&settings, port).await?;
    if seed_demo {
        let rows = demo::seed(server.database())?;
        print_cmd_info!("Demo data", "{} rows", rows);
    }
    print_cmd_success!("Server listening", "{}", server.local_addr()?);

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    server.run(shutdown).await?;
    print_cmd_info!("Server stopped", "");
    Ok(())
}
