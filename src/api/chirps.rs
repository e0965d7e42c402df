//! Chirps API.
//!
//! Reading is public. Creating and deleting require a session token.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::{ApiError, ResultExt, parse_uuid_param};
use crate::auth::{SessionAuth, TokenLifetimes};
use crate::db::{Chirp, Database, SortOrder};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::profanity::clean_body;

/// Longest accepted chirp body, in characters.
pub const MAX_CHIRP_LEN: usize = 140;

/// State for chirps endpoints.
#[derive(Clone)]
pub struct ChirpsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub lifetimes: TokenLifetimes,
}

impl_has_auth_backend!(ChirpsState);

pub fn router(state: ChirpsState) -> Router {
    Router::new()
        .route("/", get(list_chirps).post(create_chirp))
        .route("/{chirp_id}", get(get_chirp).delete(delete_chirp))
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct CreateChirpRequest {
    body: String,
}

#[derive(Deserialize)]
struct ListChirpsQuery {
    author_id: Option<String>,
    sort: Option<String>,
}

#[derive(Serialize)]
struct ChirpResponse {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    body: String,
    user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

// --- Handlers ---

async fn create_chirp(
    State(state): State<ChirpsState>,
    SessionAuth(user_id): SessionAuth,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.body.chars().count() > MAX_CHIRP_LEN {
        return Err(ApiError::bad_request("Chirp is too long"));
    }

    let chirp = state
        .db
        .chirps()
        .create(user_id, &clean_body(&payload.body))
        .await
        .db_err("Failed to create chirp")?;

    info!(chirp_id = %chirp.id, user_id = %user_id, "New chirp sent out");
    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

async fn list_chirps(
    State(state): State<ChirpsState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author = query
        .author_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| parse_uuid_param(id, "author ID"))
        .transpose()?;

    let order = SortOrder::from_query(query.sort.as_deref());

    let chirps = match author {
        Some(author_id) => state.db.chirps().list_by_author(author_id, order).await,
        None => state.db.chirps().list(order).await,
    }
    .db_err("Failed to list chirps")?;

    let response: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    Ok(Json(response))
}

async fn get_chirp(
    State(state): State<ChirpsState>,
    Path(chirp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let chirp_id = parse_uuid_param(&chirp_id, "chirp ID")?;

    let chirp = state
        .db
        .chirps()
        .get(chirp_id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    Ok(Json(ChirpResponse::from(chirp)))
}

async fn delete_chirp(
    State(state): State<ChirpsState>,
    SessionAuth(user_id): SessionAuth,
    Path(chirp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let chirp_id = parse_uuid_param(&chirp_id, "chirp ID")?;

    let chirp = state
        .db
        .chirps()
        .get(chirp_id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    if chirp.user_id != user_id {
        return Err(ApiError::forbidden("You can only delete your own chirps"));
    }

    state
        .db
        .chirps()
        .delete(chirp_id)
        .await
        .db_err("Failed to delete chirp")?;

    info!(chirp_id = %chirp_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
