//! Operator endpoints, mounted under `/admin`.
//!
//! - GET `/metrics` - HTML page with the `/app` hit count
//! - POST `/reset` - Zero the counter and delete every user (dev platform only)

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::cli::Platform;
use crate::db::Database;
use crate::metrics::HitCounter;

#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub hits: HitCounter,
    pub platform: Platform,
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/reset", post(reset))
        .with_state(state)
}

async fn metrics(State(state): State<AdminState>) -> Html<String> {
    Html(format!(
        "<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>",
        state.hits.get()
    ))
}

async fn reset(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != Platform::Dev {
        warn!("Reset refused outside the dev platform");
        return Err(ApiError::forbidden("Reset is only allowed in dev"));
    }

    state.hits.reset();
    let deleted = state
        .db
        .users()
        .delete_all()
        .await
        .map_err(|e| ApiError::db_error("Failed to delete users", e))?;

    info!(deleted, "Reset metrics and deleted all users");
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Hits reset to 0 and all users deleted",
    ))
}
