//! Asset server for the compiled frontend.

use std::{path::Path, sync::Arc};

use axum::{Json, Router, extract::State, routing::get};
use inkpress_core::ClientConfig;
use tower_http::services::{ServeDir, ServeFile};

/// Route publishing the public client configuration.
pub const CONFIG_ROUTE: &str = "/app-config.json";

/// Create the asset server router.
///
/// Unknown paths fall back to `index.html` so client-side routes such as
/// `/blog/{id}` survive a reload.
pub fn create_router(site_root: &Path, client_config: ClientConfig) -> Router {
    let index = ServeFile::new(site_root.join("index.html"));

    Router::new()
        .route(CONFIG_ROUTE, get(client_config_handler))
        .fallback_service(ServeDir::new(site_root).fallback(index))
        .with_state(Arc::new(client_config))
}

async fn client_config_handler(State(config): State<Arc<ClientConfig>>) -> Json<ClientConfig> {
    Json(config.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use inkpress_core::MediaConfig;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    fn site() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("index.html"), "<html>inkpress</html>").expect("index");
        std::fs::create_dir(dir.path().join("pkg")).expect("pkg dir");
        std::fs::write(dir.path().join("pkg/inkpress.js"), "export {}").expect("js");
        dir
    }

    fn client_config() -> ClientConfig {
        ClientConfig {
            media: MediaConfig::new("demo", "unsigned"),
            ..ClientConfig::default()
        }
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_serves_client_config() {
        let site = site();
        let (status, body) = get(create_router(site.path(), client_config()), CONFIG_ROUTE).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["media"]["cloud_name"], "demo");
        assert_eq!(json["api"]["posts_path"], "/api/v1/posts");
    }

    #[tokio::test]
    async fn test_serves_static_assets() {
        let site = site();
        let router = create_router(site.path(), client_config());
        let (status, body) = get(router, "/pkg/inkpress.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "export {}");
    }

    #[tokio::test]
    async fn test_client_routes_fall_back_to_index() {
        let site = site();
        for uri in ["/", "/blog/42", "/auth/sign-in"] {
            let (status, body) = get(create_router(site.path(), client_config()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, "<html>inkpress</html>", "{uri}");
        }
    }
}
