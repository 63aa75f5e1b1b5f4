//! Static file server implementation
//!
//! Axum router with three fixed routes, each backed by a file in one directory.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Document served at `/`
pub const INDEX_FILE: &str = "index.html";
/// Cleaner input offered for download
pub const QUICKEN_EXPORT_FILE: &str = "quicken_export.xlsx";
/// Sample workbook offered for download
pub const SAMPLE_EXPORT_FILE: &str = "sample_export.xlsx";

/// Port used when neither `--port` nor `PORT` is given
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the served files
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
        }
    }
}

/// The fixed (route, file name) table
pub fn routes() -> [(&'static str, &'static str); 3] {
    [
        ("/", INDEX_FILE),
        ("/quicken_export.xlsx", QUICKEN_EXPORT_FILE),
        ("/sample_export.xlsx", SAMPLE_EXPORT_FILE),
    ]
}

/// Build the router serving files from `root`. Anything else is a 404.
pub fn router(root: &Path) -> Router {
    routes()
        .into_iter()
        .fold(Router::new(), |app, (route, file)| {
            app.route_service(route, ServeFile::new(root.join(file)))
        })
        .layer(TraceLayer::new_for_http())
}

/// Run the static file server until Ctrl+C or SIGTERM
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quicken_server=info,quicken_clean=info,tower_http=info".into()),
        )
        .init();

    let app = router(&config.root);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Serving {} on http://{}", config.root.display(), addr);
    info!(
        "   Routes: / ({}), /{}, /{}",
        INDEX_FILE, QUICKEN_EXPORT_FILE, SAMPLE_EXPORT_FILE
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
