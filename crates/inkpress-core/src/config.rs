//! Application configuration management.
//!
//! The full [`Config`] is loaded once by the `inkpress` binary. The browser
//! only ever sees its public projection, [`ClientConfig`], which it fetches
//! from `/app-config.json` and validates again before mounting the app.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Environment variable prefix used by [`Config::load_with_env`].
pub const ENV_PREFIX: &str = "INKPRESS";

/// Main configuration structure for Inkpress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Image host credentials.
    #[serde(default)]
    pub media: MediaConfig,

    /// Identity provider settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Asset server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Backend REST API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the posts collection, relative to `base_url`.
    #[serde(default = "default_posts_path")]
    pub posts_path: String,
}

/// Image host credentials for unsigned uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Cloud name identifying the media host account.
    #[serde(default)]
    pub cloud_name: String,

    /// Unsigned upload preset.
    #[serde(default)]
    pub upload_preset: String,
}

/// Identity provider settings for the sign-in/sign-up pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Publishable key handed to the provider's embedded widgets.
    #[serde(default)]
    pub publishable_key: Option<String>,

    /// Script URL of the provider's widget bundle.
    #[serde(default)]
    pub provider_script: Option<String>,
}

/// Asset server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the compiled frontend.
    #[serde(default = "default_site_root")]
    pub site_root: String,
}

/// Public subset of the configuration shipped to the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Image host credentials.
    #[serde(default)]
    pub media: MediaConfig,

    /// Identity provider settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_posts_path() -> String {
    "/api/v1/posts".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_site_root() -> String {
    "target/site".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            posts_path: default_posts_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_root: default_site_root(),
        }
    }
}

impl ApiConfig {
    /// URL of the posts collection.
    pub fn posts_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.posts_path.trim_matches('/');
        format!("{base}/{path}")
    }

    /// URL of a single post.
    pub fn post_url(&self, id: &str) -> String {
        format!("{}/{}", self.posts_url(), id)
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CoreError::config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.base_url.ends_with('/') {
            tracing::warn!("api.base_url should not have a trailing slash");
        }

        Ok(())
    }
}

impl MediaConfig {
    /// Create media credentials.
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        }
    }

    /// Endpoint receiving unsigned image uploads.
    pub fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }

    /// Validate that both credentials are present.
    pub fn validate(&self) -> Result<()> {
        if self.cloud_name.trim().is_empty() {
            return Err(CoreError::config("media.cloud_name is required"));
        }

        if self.upload_preset.trim().is_empty() {
            return Err(CoreError::config("media.upload_preset is required"));
        }

        Ok(())
    }
}

impl ClientConfig {
    /// Validate the configuration received by the browser.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.media.validate()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file overlaid with
    /// `INKPRESS__SECTION__KEY` environment variables.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.media.validate()?;

        if self.server.site_root.is_empty() {
            return Err(CoreError::config("server.site_root cannot be empty"));
        }

        Ok(())
    }

    /// Project the public part of the configuration for the browser.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api: self.api.clone(),
            media: self.media.clone(),
            auth: self.auth.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[api]
base_url = "https://blog-api.example.com"
posts_path = "/api/v1/posts"

[media]
cloud_name = "demo-cloud"
upload_preset = "unsigned-blog"

[auth]
publishable_key = "pk_test_123"

[server]
host = "0.0.0.0"
port = 8080
site_root = "dist"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.api.base_url, "https://blog-api.example.com");
        assert_eq!(config.media.cloud_name, "demo-cloud");
        assert_eq!(config.media.upload_preset, "unsigned-blog");
        assert_eq!(config.auth.publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.site_root, "dist");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        let minimal_config = r#"
[media]
cloud_name = "demo-cloud"
upload_preset = "unsigned-blog"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.posts_path, "/api/v1/posts");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.site_root, "target/site");
        assert!(config.auth.publishable_key.is_none());
    }

    #[test]
    fn test_missing_media_credentials_fail_fast() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        std::fs::write(&config_path, "[media]\ncloud_name = \"demo\"\n").expect("write");

        let result = Config::load(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("media.upload_preset is required")
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = Config::default();
        config.media = MediaConfig::new("demo", "preset");
        config.api.base_url = "localhost:8000".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/inkpress.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_with_env_reads_file_layer() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.media.cloud_name, "demo-cloud");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_posts_urls() {
        let api = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            posts_path: "/api/v1/posts/".to_string(),
        };

        assert_eq!(api.posts_url(), "http://localhost:8000/api/v1/posts");
        assert_eq!(api.post_url("abc"), "http://localhost:8000/api/v1/posts/abc");
    }

    #[test]
    fn test_upload_url() {
        let media = MediaConfig::new("demo-cloud", "preset");
        assert_eq!(
            media.upload_url(),
            "https://api.cloudinary.com/v1_1/demo-cloud/image/upload"
        );
    }

    #[test]
    fn test_client_config_projection_round_trips_through_json() {
        let mut config = Config::default();
        config.media = MediaConfig::new("demo-cloud", "preset");
        config.auth.publishable_key = Some("pk_test".to_string());

        let client = config.client_config();
        let json = serde_json::to_string(&client).expect("serialize");
        assert!(!json.contains("site_root"));

        let decoded: ClientConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, client);
        assert!(decoded.validate().is_ok());
    }

    #[test]
    fn test_client_config_without_media_is_invalid() {
        let client = ClientConfig::default();
        assert!(client.validate().is_err());
    }
}
