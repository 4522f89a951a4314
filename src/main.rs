use std::sync::Arc;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use edu_client::adapters::FileKeyValueStore;
use edu_client::cli::{parse_args, run_cli_command, CliCommand, USAGE};
use edu_client::config::GatewayConfig;
use edu_client::gateway::ApiGateway;
use edu_client::guard::{RouteGuard, RoutePolicy};
use edu_client::session::SessionStore;

fn init_tracing() {
    // stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());
    if let CliCommand::Invalid(message) = &command {
        eprintln!("error: {}\n\n{}", message, USAGE);
        std::process::exit(2);
    }

    let config = GatewayConfig::from_env();
    let storage = match &config.session_file {
        Some(path) => FileKeyValueStore::at_path(path),
        None => FileKeyValueStore::new()?,
    };
    tracing::debug!(base_url = %config.base_url, session_file = %storage.path().display(), "Starting");

    let session = SessionStore::load(Arc::new(storage));
    let gateway = ApiGateway::from_config(&config, session.clone());
    let guard = RouteGuard::new(RoutePolicy::default(), session);

    run_cli_command(command, &gateway, &guard).await
}
