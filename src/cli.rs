//! CLI argument parsing, validation, and startup helpers.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use crate::ServerConfig;
use crate::auth::TokenLifetimes;
use crate::db::Database;
use crate::metrics::HitCounter;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Longest accepted session token lifetime: 30 days.
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Longest accepted refresh token lifetime: about 10 years.
pub const MAX_REFRESH_TTL_DAYS: u64 = 3650;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Deployment platform. Destructive admin operations only run on `dev`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    Dev,
    #[default]
    Prod,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Chirpy", about = "Short public posts with token authentication")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DB_PATH", default_value = "chirpy.db")]
    pub database: String,

    /// Deployment platform; `dev` enables POST /admin/reset
    #[arg(long, env = "PLATFORM", value_enum, default_value = "prod", ignore_case = true)]
    pub platform: Platform,

    /// Directory served under /app
    #[arg(long, env = "FILEPATH_ROOT", default_value = ".")]
    pub filepath_root: PathBuf,

    /// Session token lifetime in seconds
    #[arg(long, default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_TTL_SECS))]
    pub session_ttl_secs: u64,

    /// Refresh token lifetime in days
    #[arg(long, default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..=MAX_REFRESH_TTL_DAYS))]
    pub refresh_ttl_days: u64,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Args {
    /// Token lifetimes requested on the command line.
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            session: Duration::from_secs(self.session_ttl_secs),
            refresh: Duration::from_secs(self.refresh_ttl_days * 24 * 60 * 60),
        }
    }
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let from_env = std::env::var("JWT_SECRET").ok();
    if from_env.is_some() {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
    }
    resolve_jwt_secret(from_env, jwt_secret_file)
}

/// Pick the secret from the environment value first, then the file.
pub fn resolve_jwt_secret(from_env: Option<String>, jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Some(secret) = from_env {
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: &Args, db: Database, jwt_secret: String) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        platform: args.platform,
        filepath_root: args.filepath_root.clone(),
        lifetimes: args.lifetimes(),
        hits: HitCounter::new(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
