//! CLI command implementations

use clap::Subcommand;
use drivecast_core::config::DrivecastConfig;
use drivecast_core::{DrivecastError, Result};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides DRIVECAST_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides DRIVECAST_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate configuration and exit
    CheckConfig,
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::CheckConfig => check_config(),
    }
}

/// Start the API server, refusing to serve with incomplete credentials.
///
/// # Errors
/// - `DrivecastError::Configuration` - Required OAuth credentials are missing
/// - `DrivecastError::Io` - Listen address could not be bound
async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = DrivecastConfig::from_env();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    config.validate()?;

    println!("Starting Drivecast API server...");
    println!("Bind: {}:{}", config.server.host, config.server.port);
    println!("Public URL: {}", config.server.public_url);
    println!("Frontend: {}", config.oauth.frontend_url);
    println!("{:-<50}", "");
    println!("Press Ctrl+C to stop the server");

    drivecast_web::run_server(config)
        .await
        .map_err(DrivecastError::Io)
}

/// Print the effective configuration with secrets redacted.
///
/// # Errors
/// - `DrivecastError::Configuration` - Required OAuth credentials are missing
fn check_config() -> Result<()> {
    let config = DrivecastConfig::from_env();

    println!("Drivecast configuration");
    println!("{:-<50}", "");
    println!("Bind address:    {}:{}", config.server.host, config.server.port);
    println!("Public URL:      {}", config.server.public_url);
    println!("Upstream API:    {}", config.upstream.api_base_url);
    println!(
        "Connect timeout: {}s",
        config.upstream.connect_timeout.as_secs()
    );
    println!("Frontend URL:    {}", config.oauth.frontend_url);
    println!("Redirect URI:    {}", config.oauth.redirect_uri);
    println!("CORS origins:    {}", config.cors.allowed_origins.join(", "));
    println!(
        "OAuth client:    {}",
        if config.oauth.client_id.is_empty() {
            "(not set)"
        } else {
            "configured"
        }
    );

    match config.validate() {
        Ok(()) => {
            println!("Configuration OK");
            Ok(())
        }
        Err(e) => {
            println!("Configuration invalid: {e}");
            Err(e.into())
        }
    }
}
