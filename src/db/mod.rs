mod chirps;
mod token;
mod user;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

pub use chirps::{Chirp, ChirpStore, SortOrder};
pub use token::{RefreshToken, RefreshTokenStore};
pub use user::{User, UserStore};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    /// Use ":memory:" for an in-memory database.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let pool = if path == ":memory:" {
            // Every SQLite in-memory connection is its own database, so the
            // pool must hold exactly one connection and never recycle it.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect(&format!("sqlite:{}?mode=rwc", path))
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the current schema version.
    async fn get_version(&self) -> Result<i32, sqlx::Error> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(result.map(|r| r.0).unwrap_or(0))
    }

    /// Set the schema version within a transaction.
    async fn set_version(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut **tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Run database migrations.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let version = self.get_version().await?;

        if version < 1 {
            self.migrate_v1().await?;
        }

        if version < 2 {
            self.migrate_v2().await?;
        }

        Ok(())
    }

    /// Execute a list of queries in a transaction, then set the version.
    async fn run_migration(
        &self,
        version: i32,
        queries: &[&'static str],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for query in queries {
            sqlx::query(*query).execute(&mut *tx).await?;
        }
        Self::set_version(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn migrate_v1(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            1,
            &[
                "CREATE TABLE users (
                    id TEXT PRIMARY KEY NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    hashed_password TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                "CREATE TABLE chirps (
                    id TEXT PRIMARY KEY NOT NULL,
                    body TEXT NOT NULL,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                "CREATE INDEX idx_chirps_user_id ON chirps(user_id)",
                "CREATE INDEX idx_chirps_created_at ON chirps(created_at)",
            ],
        )
        .await
    }

    async fn migrate_v2(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            2,
            &[
                // Refresh tokens are kept after revocation so it stays checkable;
                // only expired rows are purged (see cleanup).
                "CREATE TABLE refresh_tokens (
                    token TEXT PRIMARY KEY NOT NULL,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    expires_at TEXT NOT NULL,
                    revoked_at TEXT
                )",
                "CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id)",
                "CREATE INDEX idx_refresh_tokens_expires_at ON refresh_tokens(expires_at)",
            ],
        )
        .await
    }

    /// Get the user store.
    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    /// Get the refresh token store.
    pub fn refresh_tokens(&self) -> RefreshTokenStore {
        RefreshTokenStore::new(self.pool.clone())
    }

    /// Get the chirp store.
    pub fn chirps(&self) -> ChirpStore {
        ChirpStore::new(self.pool.clone())
    }

    /// Get the underlying connection pool (for tests that need raw SQL access).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Parse a UUID stored as TEXT, reporting a bad value as a decode error.
fn parse_uuid(value: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = Database::open(":memory:").await.unwrap();

        let created = db.users().create("alice@example.com", "hash").await.unwrap();

        let user = db
            .users()
            .get_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.hashed_password, "hash");

        let user = db.users().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() {
        let db = Database::open(":memory:").await.unwrap();

        db.users().create("alice@example.com", "hash").await.unwrap();
        let result = db.users().create("alice@example.com", "other").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_email_and_password() {
        let db = Database::open(":memory:").await.unwrap();
        let user = db.users().create("alice@example.com", "hash").await.unwrap();

        let updated = db
            .users()
            .update_email_and_password(user.id, "alice@example.org", "new-hash")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "alice@example.org");
        assert_eq!(updated.hashed_password, "new-hash");
        assert_eq!(updated.created_at.timestamp(), user.created_at.timestamp());
        assert!(updated.updated_at >= user.updated_at);
        assert!(
            db.users()
                .get_by_email("alice@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = Database::open(":memory:").await.unwrap();

        let result = db
            .users()
            .update_email_and_password(Uuid::new_v4(), "ghost@example.com", "hash")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_all_cascades() {
        let db = Database::open(":memory:").await.unwrap();
        let user = db.users().create("alice@example.com", "hash").await.unwrap();
        let chirp = db.chirps().create(user.id, "hello").await.unwrap();
        db.refresh_tokens()
            .register(&"a".repeat(64), user.id, chrono::Utc::now())
            .await
            .unwrap();

        assert_eq!(db.users().delete_all().await.unwrap(), 1);

        assert!(db.users().get_by_id(user.id).await.unwrap().is_none());
        assert!(db.chirps().get(chirp.id).await.unwrap().is_none());
        assert!(
            db.refresh_tokens()
                .get(&"a".repeat(64))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_reopen_file_database_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chirpy.db");
        let path = path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.users().create("alice@example.com", "hash").await.unwrap();
        db.pool().close().await;

        let db = Database::open(path).await.unwrap();
        assert!(
            db.users()
                .get_by_email("alice@example.com")
                .await
                .unwrap()
                .is_some()
        );
    }
}
