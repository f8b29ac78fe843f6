// ============================
// crates/backend-bin/src/main.rs
// ============================
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use embrace_backend_lib::{
    config::Settings,
    router::create_router,
    store::MemoryStore,
    AppState,
};

/// Embrace Your Journey backend server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a TOML settings file (otherwise ./config.toml + EMBRACE_* env)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    if settings.jwt_secret == Settings::default().jwt_secret {
        tracing::warn!("running with the default JWT secret; set EMBRACE_JWT_SECRET");
    }

    let addr = settings.bind_addr;
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, settings);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
