// ABOUTME: Best-effort dispatcher that serializes log events and writes them to task streams
// ABOUTME: Exposes the typed push operations and schedules the delayed close after task completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::channel::TaskSubscription;
use super::events::LogEvent;
use super::registry::{ConnectionInfo, ConnectionRegistry};
use crate::config::SseConfig;
use crate::constants::sse_wire::LOG_EVENT_NAME;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Log stream service: opens task streams and pushes events to them.
///
/// Delivery is best-effort. None of the push operations report failure to
/// the caller; a missing stream drops the event and a failed write drops the
/// stream.
#[derive(Clone)]
pub struct LogStreamService {
    registry: Arc<ConnectionRegistry>,
    config: SseConfig,
    shutdown: Arc<watch::Sender<bool>>,
}

impl Default for LogStreamService {
    fn default() -> Self {
        Self::new(SseConfig::default())
    }
}

impl LogStreamService {
    /// Create a service with an empty registry
    #[must_use]
    pub fn new(config: SseConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            config,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Shared connection registry
    #[must_use]
    pub const fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// SSE settings this service was built with
    #[must_use]
    pub const fn config(&self) -> &SseConfig {
        &self.config
    }

    /// Open the stream for `task_id` and greet it with a `CONNECTION` event
    #[must_use]
    pub fn open_connection(&self, task_id: &str) -> TaskSubscription {
        info!(task_id = %task_id, "Opening SSE connection");
        let subscription = self.registry.register(task_id);
        self.send(task_id, &LogEvent::connection(task_id));
        subscription
    }

    /// Close the stream for `task_id`; a no-op when none is open
    pub fn close_connection(&self, task_id: &str) {
        self.registry.close(task_id);
    }

    /// Number of open streams
    #[must_use]
    pub fn active_connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of the open streams
    #[must_use]
    pub fn connections(&self) -> Vec<ConnectionInfo> {
        self.registry.connections()
    }

    /// Whether a stream is open for `task_id`
    #[must_use]
    pub fn has_connection(&self, task_id: &str) -> bool {
        self.registry.contains(task_id)
    }

    /// Serialize `event` and write it to the stream for `task_id`
    pub fn send(&self, task_id: &str, event: &LogEvent) {
        let Some(channel) = self.registry.get(task_id) else {
            warn!(
                task_id = %task_id,
                event_type = event.kind(),
                "No SSE connection found, dropping event"
            );
            return;
        };

        let data = match serde_json::to_string(event) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    task_id = %task_id,
                    event_type = event.kind(),
                    error = %e,
                    "Failed to serialize log event"
                );
                return;
            }
        };

        debug!(task_id = %task_id, event_type = event.kind(), data = %data, "Pushing log event");

        match channel.send_event(LOG_EVENT_NAME, data) {
            Ok(()) => debug!(task_id = %task_id, event_type = event.kind(), "Log event pushed"),
            Err(e) => {
                error!(task_id = %task_id, error = %e, "Failed to push log event");
                self.registry.on_error(&channel, &e.to_string());
            }
        }
    }

    /// A tool call is planned
    pub fn push_tool_execution_summary(
        &self,
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        summary: &str,
        reason: &str,
    ) {
        self.send(
            task_id,
            &LogEvent::tool_execution_summary(task_id, tool_name, file_path, summary, reason),
        );
    }

    /// A tool started
    pub fn push_tool_start(&self, task_id: &str, tool_name: &str, file_path: &str, message: &str) {
        self.send(
            task_id,
            &LogEvent::tool_start(task_id, tool_name, file_path, message),
        );
    }

    /// A tool finished successfully
    pub fn push_tool_success(
        &self,
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        message: &str,
        execution_time_ms: u64,
    ) {
        self.send(
            task_id,
            &LogEvent::tool_success(task_id, tool_name, file_path, message, execution_time_ms),
        );
    }

    /// A tool failed
    pub fn push_tool_error(
        &self,
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        message: &str,
        execution_time_ms: u64,
    ) {
        self.send(
            task_id,
            &LogEvent::tool_error(task_id, tool_name, file_path, message, execution_time_ms),
        );
    }

    /// Progress of a named analysis step
    pub fn push_analysis_step(
        &self,
        task_id: &str,
        step_name: &str,
        description: &str,
        status: &str,
    ) {
        self.send(
            task_id,
            &LogEvent::analysis_step(task_id, step_name, description, status),
        );
    }

    /// Analysis of the user's request started
    pub fn push_task_analysis_start(&self, task_id: &str, user_message: &str) {
        self.send(task_id, &LogEvent::task_analysis_start(task_id, user_message));
    }

    /// An execution plan was generated
    pub fn push_execution_plan_generated(&self, task_id: &str, plan_summary: &str) {
        self.send(task_id, &LogEvent::execution_plan(task_id, plan_summary));
    }

    /// Send `TASK_COMPLETE`, then close the stream once the configured delay
    /// has passed. Returns immediately.
    pub fn push_task_complete(&self, task_id: &str) {
        let target = self.registry.get(task_id).map(|channel| channel.connection_id());
        self.send(task_id, &LogEvent::task_complete(task_id));

        if let Some(connection_id) = target {
            self.schedule_close(task_id, connection_id);
        }
    }

    /// A file was created
    pub fn push_file_created(&self, task_id: &str, file_path: &str, message: &str) {
        self.send(task_id, &LogEvent::file_created(task_id, file_path, message));
    }

    /// A chunk of content was written
    pub fn push_file_content_chunk(
        &self,
        task_id: &str,
        file_path: &str,
        chunk: &str,
        chunk_index: u32,
        total_bytes: u64,
        written_bytes: u64,
    ) {
        self.send(
            task_id,
            &LogEvent::file_content_chunk(
                task_id,
                file_path,
                chunk,
                chunk_index,
                total_bytes,
                written_bytes,
            ),
        );
    }

    /// Byte-level write progress
    pub fn push_file_write_progress(
        &self,
        task_id: &str,
        file_path: &str,
        total_bytes: u64,
        written_bytes: u64,
        progress_percent: f64,
    ) {
        self.send(
            task_id,
            &LogEvent::file_write_progress(
                task_id,
                file_path,
                total_bytes,
                written_bytes,
                progress_percent,
            ),
        );
    }

    /// A file was fully written
    pub fn push_file_write_complete(
        &self,
        task_id: &str,
        file_path: &str,
        total_bytes: u64,
        execution_time_ms: u64,
    ) {
        self.send(
            task_id,
            &LogEvent::file_write_complete(task_id, file_path, total_bytes, execution_time_ms),
        );
    }

    /// Writing a file failed
    pub fn push_file_write_error(
        &self,
        task_id: &str,
        file_path: &str,
        error_message: &str,
        execution_time_ms: u64,
    ) {
        self.send(
            task_id,
            &LogEvent::file_write_error(task_id, file_path, error_message, execution_time_ms),
        );
    }

    /// Cancel every pending delayed close and complete every open stream,
    /// so HTTP responses can finish and a graceful server shutdown can drain.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
        let closed = self.registry.close_all();
        info!(closed, "Log stream service shut down, pending closes cancelled");
    }

    fn schedule_close(&self, task_id: &str, connection_id: Uuid) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                task_id = %task_id,
                "No async runtime available, stream will not be closed after completion"
            );
            return;
        };

        let registry = Arc::clone(&self.registry);
        let mut shutdown = self.shutdown.subscribe();
        let delay = self.config.close_delay();
        let task_id = task_id.to_owned();

        runtime.spawn(async move {
            if *shutdown.borrow_and_update() {
                debug!(task_id = %task_id, "Shutdown in progress, skipping delayed close");
                return;
            }
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    registry.close_connection(&task_id, connection_id);
                }
                _ = shutdown.changed() => {
                    debug!(task_id = %task_id, "Delayed close cancelled");
                }
            }
        });
    }
}
