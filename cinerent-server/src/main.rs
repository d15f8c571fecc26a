//! # Cinerent Server
//!
//! REST API fronting a Pagila-style movie-rental database: catalog queries,
//! search, customer directory, the rental lifecycle, and a PDF report.
//!
//! The server is built on Axum and uses PostgreSQL (via sqlx) for all
//! persistent state; the process itself holds none.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinerent_server::{create_app, infra::app_state::AppState, infra::config::Config};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "cinerent-server")]
#[command(about = "REST API for the cinerent movie-rental database")]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(host) = cli.host {
        config.server_host = host;
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("connected to database");

    let state = AppState::postgres(pool);
    let app = create_app(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let listener =
        tokio::net::TcpListener::bind((config.server_host.as_str(), config.server_port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    config.server_host, config.server_port
                )
            })?;
    info!(
        host = config.server_host.as_str(),
        port = config.server_port,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::any())
}
