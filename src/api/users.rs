use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::{ApiError, ResultExt, is_unique_violation};
use crate::auth::{SessionAuth, TokenLifetimes};
use crate::db::{Database, User};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::password::hash_password;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub lifetimes: TokenLifetimes,
}

impl_has_auth_backend!(UsersState);

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(create_user).put(update_user))
        .with_state(state)
}

/// Body of both `POST /api/users` and `PUT /api/users`.
#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

impl CredentialsRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::bad_request("Email cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("Password cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub(super) struct UserResponse {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
        }
    }
}

async fn create_user(
    State(state): State<UsersState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let hashed_password = hash_password(&payload.password)?;

    let user = match state
        .db
        .users()
        .create(payload.email.trim(), &hashed_password)
        .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    info!(user_id = %user.id, "New user created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn update_user(
    State(state): State<UsersState>,
    SessionAuth(user_id): SessionAuth,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let hashed_password = hash_password(&payload.password)?;

    let updated = state
        .db
        .users()
        .update_email_and_password(user_id, payload.email.trim(), &hashed_password)
        .await;

    let user = match updated {
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        other => other
            .db_err("Failed to update user")?
            .ok_or_else(|| ApiError::not_found("User not found"))?,
    };

    info!(user_id = %user.id, "User updated");
    Ok(Json(UserResponse::from(user)))
}
