pub mod admin;
pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod metrics;
pub mod password;
pub mod profanity;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use admin::AdminState;
use api::create_api_router;
use auth::TokenLifetimes;
use axum::{Router, middleware};
use cli::Platform;
use db::Database;
use jwt::JwtConfig;
use metrics::{HitCounter, count_hits};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing session tokens
    pub jwt_secret: Vec<u8>,
    /// Deployment platform, gates POST /admin/reset
    pub platform: Platform,
    /// Directory served under /app
    pub filepath_root: PathBuf,
    /// Session and refresh token lifetimes
    pub lifetimes: TokenLifetimes,
    /// Hit counter for /app, shared with /admin/metrics
    pub hits: HitCounter,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));

    let api_router = create_api_router(config.db.clone(), jwt, config.lifetimes);

    let admin_router = admin::router(AdminState {
        db: config.db.clone(),
        hits: config.hits.clone(),
        platform: config.platform,
    });

    let file_server = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            config.hits.clone(),
            count_hits,
        ))
        .service(ServeDir::new(&config.filepath_root));

    Router::new()
        .nest("/api", api_router)
        .nest("/admin", admin_router)
        .nest_service("/app", file_server)
}

/// Run cleanup tasks and spawn background scheduler.
/// Call this before starting the server.
pub async fn init_cleanup(db: &Database) {
    cleanup::run_cleanup(db).await;
    cleanup::spawn_cleanup_scheduler(db.clone());
}

/// Run the server on the given listener. This function blocks until the server exits.
/// Call `init_cleanup` before this to run cleanup on startup.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}
