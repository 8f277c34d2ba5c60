// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Reports liveness together with the number of open task streams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! Load balancers poll `/health` for liveness and `/ready` for readiness.

use crate::constants::service_names::TASK_LOG_STREAM;
use crate::sse::LogStreamService;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(service: LogStreamService) -> axum::Router {
        use axum::{extract::State, routing::get, Json, Router};

        async fn health_handler(State(service): State<LogStreamService>) -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": TASK_LOG_STREAM,
                "version": env!("CARGO_PKG_VERSION"),
                "activeConnections": service.active_connection_count(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .with_state(service)
    }
}
