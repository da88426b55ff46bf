//! Check command - validate configuration

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use inkpress_core::Config;

/// Run the check command.
///
/// Loads the configuration exactly as `serve` does: the file is optional and
/// `INKPRESS__SECTION__KEY` environment variables override it.
pub fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking configuration");

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Validation failed: {e}");
        }
    };

    let warnings = warnings(&config);
    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warn in &warnings {
            println!("  ⚠ {warn}");
        }
    }

    println!();
    println!("  API:        {}", config.api.posts_url());
    println!("  Media:      {}", config.media.upload_url());
    println!("  Site root:  {}", config.server.site_root);
    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Non-fatal configuration issues.
fn warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.auth.publishable_key.is_none() || config.auth.provider_script.is_none() {
        warnings.push("auth is not configured, sign-in pages show a notice".to_string());
    }
    if config.api.base_url.starts_with("http://")
        && !config.api.base_url.contains("localhost")
        && !config.api.base_url.contains("127.0.0.1")
    {
        warnings.push(format!("api.base_url is not HTTPS: {}", config.api.base_url));
    }
    if !Path::new(&config.server.site_root).exists() {
        warnings.push(format!(
            "server.site_root does not exist yet: {}",
            config.server.site_root
        ));
    }

    warnings
}
