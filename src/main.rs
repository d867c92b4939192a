use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ride_lifecycle::api;
use ride_lifecycle::config::Config;
use ride_lifecycle::demo;
use ride_lifecycle::error::AppError;
use ride_lifecycle::state::AppState;

#[derive(Parser)]
#[command(
    name = "ride-lifecycle",
    about = "Ride lifecycle service: driver assignment, status transitions and fares"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API (default)
    Serve {
        /// Port to listen on, overrides HTTP_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the sample ride scenario and print its outcome
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Demo => {
            let state = AppState::from_config(&config);
            for line in demo::run(&state)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, port: Option<u16>) -> Result<(), AppError> {
    let shared_state = Arc::new(AppState::from_config(&config));
    let app = api::rest::router(shared_state);

    let http_port = port.unwrap_or(config.http_port);
    let bind_addr = format!("0.0.0.0:{}", http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port,
        transition_policy = ?config.transition_policy,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
