// ABOUTME: HTTP server runner for the task log stream service
// ABOUTME: Serves the router and completes every open stream when shutdown is requested
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server lifecycle.
//!
//! SSE responses never end on their own, so a graceful shutdown that only
//! waits for in-flight connections would hang while any client is attached.
//! [`serve`] completes every open stream as soon as the shutdown signal
//! fires, which lets axum drain the connections and return.

use crate::sse::LogStreamService;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// Serve `app` on `listener` until `signal` resolves, then shut down
/// gracefully.
///
/// # Errors
///
/// Returns an error if the underlying server fails while accepting
/// connections
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    service: LogStreamService,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            info!("Shutdown signal received, closing open streams");
            service.shutdown();
        })
        .await
}
