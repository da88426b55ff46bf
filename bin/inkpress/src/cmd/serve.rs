//! Serve command - asset server for the compiled frontend

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use inkpress_core::Config;
use tokio::net::TcpListener;

use crate::server::{CONFIG_ROUTE, create_router};

/// Run the serve command.
///
/// Refuses to start when the configuration is invalid, so the browser never
/// receives incomplete credentials.
pub async fn run(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!(?config_path, "Starting asset server");

    let mut config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let site_root = PathBuf::from(&config.server.site_root);
    if !site_root.join("index.html").exists() {
        tracing::warn!(
            site_root = %site_root.display(),
            "index.html not found, build the frontend first"
        );
    }

    let app = create_router(&site_root, config.client_config());
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Inkpress running at http://{addr}");
    println!("  API:    {}", config.api.posts_url());
    println!("  Config: http://{addr}{CONFIG_ROUTE}");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
