//! bizdir_server - REST server for the business directory write engine.
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   DATABASE_URL       Postgres connection string (required)
//!   DATABASE_POOL_SIZE max pool connections (default: 10)
//!   PORT               listen port on 0.0.0.0 (default: 3001)
//!   CORS_ORIGIN        allowed origin(s), comma separated (default: *)
//!   STATIC_DIR         static files directory (default: public)
//!   BIZDIR_KEY_TYPE    uuid | text | bigint (default: uuid)

use std::io::ErrorKind;
use std::sync::Arc;

use bizdir::api::{build_app, AppState};
use bizdir::{PgExecutor, ServerConfig, WriteEngine};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bizdir=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("invalid server configuration");

    let executor = PgExecutor::connect(&config.database)
        .await
        .expect("failed to connect to database");

    let engine = WriteEngine::new(Arc::new(executor)).with_key_type(config.key_type);
    let app = build_app(AppState { engine }, &config).expect("failed to build router");

    let bind_addr = config.bind_addr();
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            tracing::error!("Port {} already in use", config.port);
            std::process::exit(1);
        }
        Err(e) => panic!("failed to bind to {bind_addr}: {e}"),
    };
    tracing::info!("bizdir_server listening on {bind_addr}");

    axum::serve(listener, app).await.expect("server error");
}
