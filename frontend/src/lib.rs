//! Browser entry point.
//!
//! Fetches the client configuration published by the asset server, builds
//! the [`Services`] and mounts the app. An unusable configuration mounts a
//! [`ConfigError`] screen instead.

use app::App;
use gloo_net::http::Request;
use inkpress_core::{ClientConfig, CoreError};
use inkpress_ui::{ConfigError, Services};
use leptos::{prelude::*, task::spawn_local};
use wasm_bindgen::prelude::wasm_bindgen;

/// Where the asset server publishes the client configuration.
pub const CONFIG_PATH: &str = "/app-config.json";

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    spawn_local(async {
        match load_services().await {
            Ok(services) => {
                tracing::info!(api = %services.config.api.base_url, "Starting Inkpress");
                leptos::mount::mount_to_body(move || view! { <App services=services.clone() /> });
            }
            Err(err) => {
                tracing::error!(error = %err, "Invalid client configuration");
                let message = err.to_string();
                leptos::mount::mount_to_body(move || {
                    view! { <ConfigError message=message.clone() /> }
                });
            }
        }
    });
}

async fn load_services() -> inkpress_core::Result<Services> {
    let response = Request::get(CONFIG_PATH)
        .send()
        .await
        .map_err(|e| CoreError::config(format!("Failed to fetch {CONFIG_PATH}: {e}")))?;

    if !response.ok() {
        return Err(CoreError::config(format!(
            "Failed to fetch {CONFIG_PATH}: HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| CoreError::config(format!("Failed to read {CONFIG_PATH}: {e}")))?;
    let config: ClientConfig = serde_json::from_str(&body)?;
    Services::new(config)
}
