mod chirps;
mod error;
mod tokens;
mod users;

use axum::{Router, http::header, response::IntoResponse, routing::get};
use std::sync::Arc;

use crate::auth::TokenLifetimes;
use crate::db::Database;
use crate::jwt::JwtConfig;

pub use chirps::{ChirpsState, MAX_CHIRP_LEN};
pub use error::ApiError;
pub use tokens::TokensState;
pub use users::UsersState;

/// Create the API router, mounted under `/api`.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, lifetimes: TokenLifetimes) -> Router {
    let users_state = users::UsersState {
        db: db.clone(),
        jwt: jwt.clone(),
        lifetimes,
    };

    let chirps_state = chirps::ChirpsState {
        db: db.clone(),
        jwt: jwt.clone(),
        lifetimes,
    };

    let tokens_state = tokens::TokensState { db, jwt, lifetimes };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/users", users::router(users_state))
        .nest("/chirps", chirps::router(chirps_state))
        .merge(tokens::router(tokens_state))
}

async fn healthz() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}
