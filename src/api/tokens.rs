//! Session endpoints.
//!
//! - POST `/login` - Exchange email and password for a session token and a refresh token
//! - POST `/refresh` - Exchange a refresh token for a new session token
//! - POST `/revoke` - Revoke a refresh token

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::users::UserResponse;
use crate::auth::{
    AuthError, RefreshBearer, TokenLifetimes, login, refresh_session, revoke_refresh_token,
};
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub lifetimes: TokenLifetimes,
}

impl_has_auth_backend!(TokensState);

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/revoke", post(revoke_handler))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserResponse,
    token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

async fn login_handler(
    State(state): State<TokensState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let session = login(&state, payload.email.trim(), &payload.password).await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(session.user),
        token: session.token,
        refresh_token: session.refresh_token,
    }))
}

async fn refresh_handler(
    State(state): State<TokensState>,
    RefreshBearer(refresh_token): RefreshBearer,
) -> Result<impl IntoResponse, AuthError> {
    let token = refresh_session(&state, &refresh_token).await?;
    Ok(Json(RefreshResponse { token }))
}

async fn revoke_handler(
    State(state): State<TokensState>,
    RefreshBearer(refresh_token): RefreshBearer,
) -> Result<impl IntoResponse, AuthError> {
    revoke_refresh_token(&state, &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
