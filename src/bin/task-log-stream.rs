// ABOUTME: Server binary that exposes task log streams over HTTP Server-Sent Events
// ABOUTME: Loads configuration, initializes logging and serves until interrupted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Task Log Stream Server Binary
//!
//! Starts the HTTP server hosting the log stream, connection stats and
//! health endpoints.

use anyhow::Result;
use clap::Parser;
use task_log_stream::{
    config::environment::ServerConfig, logging, routes::build_router, server,
    sse::LogStreamService,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "task-log-stream")]
#[command(about = "Task Log Stream - real-time SSE progress logs for AI task execution")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Override port if specified
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Task Log Stream server");
    info!("{}", config.summary());

    let service = LogStreamService::new(config.sse.clone());
    let app = build_router(&config, &service);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());
    display_available_endpoints(&config);

    let result = server::serve(listener, app, service, shutdown_signal()).await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Display all available API endpoints
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let addr = config.bind_addr();

    info!("=== Available API Endpoints ===");
    info!("   Task Log Stream:   GET    http://{addr}/api/logs/stream/{{task_id}}");
    info!("   Close Stream:      DELETE http://{addr}/api/logs/stream/{{task_id}}");
    info!("   Connection Stats:  GET    http://{addr}/api/logs/connections");
    info!("   Health:            GET    http://{addr}/health");
    info!("   Ready:             GET    http://{addr}/ready");
    info!("=== End of Endpoint List ===");
}
