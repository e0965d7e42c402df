//! Chirp storage.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use super::parse_uuid;

#[derive(Clone)]
pub struct ChirpStore {
    pool: SqlitePool,
}

/// A stored chirp.
#[derive(Debug, Clone)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

impl SortOrder {
    /// Read a `sort` query value. Anything other than `desc` keeps the default.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChirpRow {
    id: String,
    body: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ChirpRow> for Chirp {
    type Error = sqlx::Error;

    fn try_from(row: ChirpRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            body: row.body,
            user_id: parse_uuid(&row.user_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_chirps(rows: Vec<ChirpRow>, order: SortOrder) -> Result<Vec<Chirp>, sqlx::Error> {
    let mut chirps = rows
        .into_iter()
        .map(Chirp::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    if order == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(chirps)
}

impl ChirpStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a chirp. The body is stored as given.
    pub async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, sqlx::Error> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(chirp.id.to_string())
        .bind(&chirp.body)
        .bind(chirp.user_id.to_string())
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(chirp)
    }

    /// List all chirps.
    pub async fn list(&self, order: SortOrder) -> Result<Vec<Chirp>, sqlx::Error> {
        let rows: Vec<ChirpRow> = sqlx::query_as(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        into_chirps(rows, order)
    }

    /// List the chirps of one author.
    pub async fn list_by_author(
        &self,
        user_id: Uuid,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, sqlx::Error> {
        let rows: Vec<ChirpRow> = sqlx::query_as(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        into_chirps(rows, order)
    }

    /// Get a chirp by ID.
    pub async fn get(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error> {
        let row: Option<ChirpRow> = sqlx::query_as(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Chirp::try_from).transpose()
    }

    /// Delete a chirp by ID. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
