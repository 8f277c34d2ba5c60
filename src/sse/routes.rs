// ABOUTME: HTTP endpoints that expose task log streams as Server-Sent Events
// ABOUTME: Bridges each registered channel to an axum SSE response and wires the transport cleanup hooks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::channel::{ChannelFrame, TaskChannel};
use super::registry::ConnectionRegistry;
use super::service::LogStreamService;
use crate::constants::sse_wire::KEEPALIVE_TEXT;
use crate::errors::{AppError, AppResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures_util::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Log stream routes implementation
pub struct LogStreamRoutes;

impl LogStreamRoutes {
    /// Create the log stream routes bound to `service`
    pub fn routes(service: LogStreamService) -> Router {
        Router::new()
            .route(
                "/api/logs/stream/:task_id",
                get(Self::stream_task_logs).delete(Self::close_task_stream),
            )
            .route("/api/logs/connections", get(Self::connection_stats))
            .with_state(service)
    }

    /// Open the stream for a task and forward its frames as `log` events
    async fn stream_task_logs(
        State(service): State<LogStreamService>,
        Path(task_id): Path<String>,
    ) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
        validate_task_id(&task_id)?;
        let (channel, mut receiver) = service.open_connection(&task_id).into_parts();
        let idle_timeout = service.config().connection_timeout();
        let keepalive = service.config().keepalive_interval();

        // Owned by the stream from the start, so a response dropped before
        // its body is first polled still reports the disconnect
        let mut guard = StreamGuard::new(Arc::clone(service.registry()), channel);

        let stream = async_stream::stream! {
            loop {
                let frame = match idle_timeout {
                    Some(limit) => {
                        if let Ok(frame) = tokio::time::timeout(limit, receiver.recv()).await {
                            frame
                        } else {
                            guard.timed_out();
                            break;
                        }
                    }
                    None => receiver.recv().await,
                };

                match frame {
                    Some(ChannelFrame::Event { name, data }) => {
                        yield Ok(Event::default().event(name).data(data));
                    }
                    Some(ChannelFrame::Complete) | None => {
                        guard.completed();
                        break;
                    }
                }
            }
        };

        Ok(Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(keepalive)
                .text(KEEPALIVE_TEXT),
        ))
    }

    /// Close the stream for a task. Closing an unknown task still succeeds.
    async fn close_task_stream(
        State(service): State<LogStreamService>,
        Path(task_id): Path<String>,
    ) -> AppResult<Response> {
        validate_task_id(&task_id)?;
        service.close_connection(&task_id);
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn connection_stats(State(service): State<LogStreamService>) -> Json<serde_json::Value> {
        let connections = service.connections();
        Json(serde_json::json!({
            "activeConnections": connections.len(),
            "connections": connections,
        }))
    }
}

/// Task ids are opaque keys: blank ids are rejected, anything else is used
/// exactly as given
fn validate_task_id(task_id: &str) -> AppResult<()> {
    if task_id.trim().is_empty() {
        return Err(AppError::invalid_input("Task id must not be empty"));
    }
    Ok(())
}

/// Runs the matching registry hook when the SSE response stream ends.
///
/// axum drops the stream when the client goes away, so a guard that is
/// dropped without having been resolved reports a disconnect.
struct StreamGuard {
    registry: Arc<ConnectionRegistry>,
    channel: TaskChannel,
    resolved: bool,
}

impl StreamGuard {
    const fn new(registry: Arc<ConnectionRegistry>, channel: TaskChannel) -> Self {
        Self {
            registry,
            channel,
            resolved: false,
        }
    }

    fn completed(&mut self) {
        self.resolved = true;
        self.registry.on_completion(&self.channel);
    }

    fn timed_out(&mut self) {
        self.resolved = true;
        self.registry.on_timeout(&self.channel);
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        debug!(
            task_id = %self.channel.task_id(),
            connection_id = %self.channel.connection_id(),
            "SSE response stream dropped by transport"
        );
        self.registry.on_error(&self.channel, "client disconnected");
    }
}
