// ABOUTME: Route module organization for the task log stream HTTP server
// ABOUTME: Assembles health and log stream routes with the tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the task log stream server
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to [`LogStreamService`].

/// Health check and system status routes
pub mod health;

pub use crate::sse::LogStreamRoutes;
/// Health check route handlers
pub use health::HealthRoutes;

use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::middleware::setup_cors;
use crate::sse::LogStreamService;
use axum::{http::Uri, Router};
use tower_http::trace::TraceLayer;

/// Build the complete application router
pub fn build_router(config: &ServerConfig, service: &LogStreamService) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(service.clone()))
        .merge(LogStreamRoutes::routes(service.clone()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(&config.cors))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}
