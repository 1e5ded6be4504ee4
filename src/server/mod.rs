//! HTTP server: static client files, health check and the `/db` bridge.

pub mod bridge;

use crate::config::ServerSettings;
use crate::consts::cli_consts::HEALTH_PATH;
use crate::database::MemoryDatabase;
use crate::database::models::{MODEL_TABLES, ensure_tables};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query as Params, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bridge::AllowList;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::services::{ServeDir, ServeFile};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<MemoryDatabase>,
    pub allow: AllowList,
}

impl AppState {
    pub fn new(db: Arc<MemoryDatabase>, settings: &ServerSettings) -> Self {
        let allow = if settings.allow_any_query {
            AllowList::any()
        } else {
            AllowList::only(
                MODEL_TABLES
                    .iter()
                    .map(|t| t.to_string())
                    .chain(settings.extra_tables.iter().cloned())
                    .collect(),
            )
        };
        Self { db, allow }
    }
}

/// Creates the model tables and the configured extra tables.
pub fn init_database(db: &MemoryDatabase, settings: &ServerSettings) {
    for table in ensure_tables(db, &settings.extra_tables) {
        log::info!("Created table {}", table);
    }
}

pub fn router(state: AppState, settings: &ServerSettings) -> Router {
    let index_file = settings.dist_dir.join("index.html");
    let static_service =
        ServeDir::new(&settings.dist_dir).not_found_service(ServeFile::new(index_file));

    let db_path = if settings.db_path.starts_with('/') {
        settings.db_path.clone()
    } else {
        format!("/{}", settings.db_path)
    };

    Router::new()
        .route(&db_path, get(db_handler))
        .route(HEALTH_PATH, get(health_handler))
        .fallback_service(static_service)
        .with_state(state)
}

/// Upgrades to the bridge. A `db` parameter must name the served database.
async fn db_handler(
    ws: WebSocketUpgrade,
    Params(params): Params<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Response {
    if let Some(requested) = params.get("db") {
        if requested != state.db.name() {
            log::warn!(
                "Refusing bridge client for database `{}`, serving `{}`",
                requested,
                state.db.name()
            );
            return (
                StatusCode::NOT_FOUND,
                format!("Database `{}` is not served here", requested),
            )
                .into_response();
        }
    }
    ws.on_upgrade(move |socket| bridge::connection(socket, state))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "tables": state.db.table_list(),
    }))
}

/// A bound server, ready to run.
pub struct Server {
    listener: TcpListener,
    app: Router,
    db: Arc<MemoryDatabase>,
}

impl Server {
    /// Prepares the database and binds `settings.host:port`.
    pub async fn bind(settings: &ServerSettings, port: u16) -> Result<Self, ServerError> {
        let db = Arc::new(MemoryDatabase::new(settings.db.clone()));
        init_database(&db, settings);
        let app = router(AppState::new(db.clone(), settings), settings);

        let addr = format!("{}:{}", settings.host, port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, app, db })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn database(&self) -> &Arc<MemoryDatabase> {
        &self.db
    }

    /// Serves until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        if let Ok(addr) = self.listener.local_addr() {
            log::info!("Listening on http://{}", addr);
        }
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;
        log::info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::database::{Mutation, Query};
    use crate::live::{LiveError, LiveQuery, QueryRequest, Subscription, WsSession};
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::time::timeout;

    async fn start(settings: ServerSettings) -> (SocketAddr, CancellationToken) {
        let server = Server::bind(&settings, 0).await.unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        tokio::spawn(server.run(shutdown.clone()));
        (addr, shutdown)
    }

    fn local_settings() -> ServerSettings {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            ..ServerSettings::default()
        }
    }

    async fn session(addr: SocketAddr) -> WsSession {
        let config = SessionConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            ..SessionConfig::default()
        };
        WsSession::connect(&config).await.unwrap()
    }

    async fn next_update(subscription: &mut Subscription) -> Result<Vec<Value>, LiveError> {
        timeout(Duration::from_secs(5), subscription.next())
            .await
            .expect("update in time")
            .expect("subscription open")
    }

    #[tokio::test]
    async fn test_changefeed_over_bridge() {
        let (addr, shutdown) = start(local_settings()).await;
        let session = session(addr).await;

        let mut turtles = session.subscribe(QueryRequest::changes(Query::table("turtles")));
        assert!(next_update(&mut turtles).await.unwrap().is_empty());

        let outcome = session
            .run(Mutation::insert("turtles", serde_json::json!({"name": "Leonardo"})))
            .await
            .unwrap();
        assert_eq!(outcome["inserted"], 1);

        let rows = next_update(&mut turtles).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Leonardo");
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_restricted_bridge_rejects_unknown_tables() {
        let settings = ServerSettings {
            allow_any_query: false,
            ..local_settings()
        };
        let (addr, shutdown) = start(settings).await;
        let session = session(addr).await;

        let mut secrets = session.subscribe(QueryRequest::changes(Query::table("secrets")));
        assert!(matches!(
            next_update(&mut secrets).await,
            Err(LiveError::Server(_))
        ));
        assert!(matches!(
            session.run(Mutation::table_create("secrets")).await,
            Err(LiveError::Server(_))
        ));

        let mut monitors = session.subscribe(QueryRequest::once(Query::table("monitors")));
        assert!(next_update(&mut monitors).await.is_ok());
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_bridge_refuses_other_database() {
        let (addr, shutdown) = start(local_settings()).await;
        let config = SessionConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            db: "production_other".to_string(),
            ..SessionConfig::default()
        };
        assert!(WsSession::connect(&config).await.is_err());

        // The default client names the served database and gets through.
        let session = session(addr).await;
        assert!(
            session
                .run(Mutation::insert("turtles", serde_json::json!({"name": "Raph"})))
                .await
                .is_ok()
        );
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_single_run_ends_over_bridge() {
        let (addr, shutdown) = start(local_settings()).await;
        let session = session(addr).await;

        let mut monitors = session.subscribe(QueryRequest::once(Query::table("monitors")));
        assert!(next_update(&mut monitors).await.unwrap().is_empty());
        assert!(
            timeout(Duration::from_secs(5), monitors.next())
                .await
                .expect("end in time")
                .is_none()
        );

        // A later write is not delivered to the finished subscription.
        session
            .run(Mutation::insert("monitors", serde_json::json!({"name": "lb"})))
            .await
            .unwrap();
        assert!(monitors.try_next().is_none());
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_health_and_static_fallback() {
        let dist = tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<h1>PASCANI</h1>").unwrap();
        let settings = ServerSettings {
            dist_dir: dist.path().to_path_buf(),
            ..local_settings()
        };
        let (addr, shutdown) = start(settings).await;

        let health: Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        let tables = health["tables"].as_array().unwrap();
        assert!(tables.iter().any(|t| t == "monitors"));
        assert!(tables.iter().any(|t| t == "turtles"));

        let page = reqwest::get(format!("http://{}/monitors/abc", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(page, "<h1>PASCANI</h1>");
        shutdown.cancel();
    }
}
