// ABOUTME: Server-Sent Events log streaming for long-running AI task execution
// ABOUTME: Groups the event model, per-task channels, connection registry, dispatcher and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Task Log Streaming
//!
//! A client opens one stream per task id and receives every progress event
//! the task's producer pushes while it runs: tool calls, analysis steps,
//! file writes and the final completion notice. Each message is a named
//! `log` SSE event whose data is the JSON-encoded [`LogEvent`].
//!
//! Delivery is best-effort and in-process only. Events pushed before a
//! client connects, or after its stream is gone, are dropped.

/// Per-task channel handle and lifecycle states
pub mod channel;
/// Structured log events and their JSON wire shape
pub mod events;
/// Fixed icon tables for tools and analysis steps
pub mod icons;
/// Concurrent task id to channel registry
pub mod registry;
/// HTTP route handlers for the log stream endpoints
pub mod routes;
/// Event dispatcher and typed push operations
pub mod service;

pub use channel::{ChannelError, ChannelFrame, ChannelState, TaskChannel, TaskSubscription};
pub use events::{
    AnalysisDetails, EventPayload, FileStatus, FileStreamDetails, LogEvent, ToolDetails,
    ToolStatus,
};
pub use icons::{analysis_icon, tool_icon, AnalysisStep, ToolKind};
pub use registry::{ConnectionInfo, ConnectionRegistry};
pub use routes::LogStreamRoutes;
pub use service::LogStreamService;
