mod cli;
mod server;

use std::sync::Arc;

use clap::Parser;
use eyre::WrapErr;

use podro_core::backend::{FileBackend, MemoryBackend, StorageBackend};
use podro_core::store::DataStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    // Generate a random API token for this server session unless the
    // caller pinned one.
    let api_token = args.api_token.clone().unwrap_or_else(|| {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().r#gen();
        hex_encode(bytes)
    });

    let backend: Arc<dyn StorageBackend> = match &args.data_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "using file-backed store");
            Arc::new(FileBackend::new(path))
        }
        None => {
            tracing::warn!("no --data-file given — store is in memory only and lost on exit");
            match args.quota_bytes {
                Some(capacity) => Arc::new(MemoryBackend::with_capacity(capacity)),
                None => Arc::new(MemoryBackend::new()),
            }
        }
    };

    let store = DataStore::new(backend);
    let modules = store.module_names().await;
    tracing::info!(modules = modules.len(), "store loaded");

    let state = server::AppState {
        store: Arc::new(tokio::sync::RwLock::new(store)),
        api_token: api_token.clone(),
    };

    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 — it is accessible from the network");
    }

    // Bind before building the router so `--port 0` resolves to the real
    // ephemeral port in the printed URL and the CORS origin.
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", args.bind, args.port))
        .await
        .context("bind TCP listener")?;
    let bind_addr = listener.local_addr().context("resolve local address")?;

    let origin = format!("http://{bind_addr}");
    let router = server::build_router(state, &origin);

    println!();
    println!("  Pocket DRO is running:");
    println!("    URL:       http://{bind_addr}?token={api_token}");
    println!();

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .await
        .context("run HTTP server")?;

    Ok(())
}

/// Tiny hex-encoding helper to avoid adding a `hex` crate dependency.
fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}
