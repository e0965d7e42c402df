use clap::Parser;
use chirpy::cli::{Args, build_config, init_logging, load_jwt_secret, open_database};
use chirpy::{init_cleanup, run_server};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_format);

    if let Err(e) = dotenv
        && !e.not_found()
    {
        warn!(error = %e, "Failed to load .env file");
    }

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    init_cleanup(&db).await;

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(local_addr) => info!(
            address = %local_addr,
            platform = ?args.platform,
            root = %args.filepath_root.display(),
            "Listening"
        ),
        Err(e) => warn!(error = %e, "Failed to read local address"),
    }

    let config = build_config(&args, db, jwt_secret);
    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
