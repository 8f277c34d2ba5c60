// ABOUTME: Main library entry point for the task log stream service
// ABOUTME: Streams real-time progress logs of AI task execution to browser clients over SSE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Task Log Stream
//!
//! Real-time, per-task progress logging for an AI coding agent. While a task
//! runs, its producer pushes structured events (tool calls, analysis steps,
//! file write progress, completion) and every event is forwarded to the
//! client subscribed to that task over Server-Sent Events.
//!
//! ## Architecture
//!
//! - **Events**: typed [`sse::LogEvent`] values with a fixed JSON wire shape
//! - **Registry**: at most one live stream per task id
//! - **Service**: best-effort dispatcher with typed push operations
//! - **Routes**: axum endpoints that open, close and count streams
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use task_log_stream::config::SseConfig;
//! use task_log_stream::sse::{ChannelFrame, LogStreamService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = LogStreamService::new(SseConfig::default());
//!     let mut subscription = service.open_connection("task-42");
//!
//!     service.push_tool_start("task-42", "readFile", "src/main.rs", "Reading entry point");
//!     service.push_task_complete("task-42");
//!
//!     while let Some(frame) = subscription.recv().await {
//!         match frame {
//!             ChannelFrame::Event { data, .. } => println!("{data}"),
//!             ChannelFrame::Complete => break,
//!         }
//!     }
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP route assembly
pub mod routes;

/// HTTP server lifecycle
pub mod server;

/// Server-Sent Events task log streaming
pub mod sse;
