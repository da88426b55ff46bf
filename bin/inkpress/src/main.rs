//! Inkpress CLI
//!
//! Serves the compiled frontend and checks configuration.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Inkpress.
#[derive(Parser)]
#[command(
    name = "inkpress",
    version,
    about = "Asset server for the Inkpress blog frontend"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "inkpress.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the compiled frontend and its client configuration
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
    },
    /// Validate configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    inkpress::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { port, host } => {
            inkpress::cmd::serve::run(&cli.config, host, port).await?;
        }
        Commands::Check => {
            inkpress::cmd::check::run(&cli.config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_serve_defaults() {
        let cli = Cli::parse_from(["inkpress", "serve"]);

        assert_eq!(cli.config, std::path::PathBuf::from("inkpress.toml"));
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Serve { port, host } => {
                assert!(port.is_none());
                assert!(host.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_overrides() {
        let args = ["inkpress", "serve", "--port", "8080", "--host", "0.0.0.0"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_check_with_config() {
        let cli = Cli::parse_from(["inkpress", "-vv", "--config", "blog.toml", "check"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, std::path::PathBuf::from("blog.toml"));
        assert!(matches!(cli.command, Commands::Check));
    }
}
