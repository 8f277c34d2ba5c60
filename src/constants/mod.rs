// ABOUTME: System-wide constants and defaults for the task log stream service
// ABOUTME: Groups network, timing, wire-format and service-name constants by concern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults. Anything operators may want to tune is read through
//! [`crate::config`], which falls back to the values defined here.

/// Network configuration
pub mod network_config {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Timing defaults
pub mod timeouts {
    /// Delay between `TASK_COMPLETE` and closing the task's stream, in milliseconds
    pub const TASK_COMPLETE_CLOSE_DELAY_MS: u64 = 2_000;
    /// Interval between SSE keep-alive comments in seconds
    pub const SSE_KEEPALIVE_INTERVAL_SECS: u64 = 15;
    /// Idle timeout for SSE streams in seconds (0 disables the timeout)
    pub const SSE_CONNECTION_TIMEOUT_SECS: u64 = 0;
}

/// SSE wire format
pub mod sse_wire {
    /// Name of the SSE event every log payload is sent under
    pub const LOG_EVENT_NAME: &str = "log";
    /// Keep-alive comment text
    pub const KEEPALIVE_TEXT: &str = "keepalive";
}

/// Time formats
pub mod time_formats {
    /// Timestamp format carried in every log event (`yyyy-MM-dd HH:mm:ss`)
    pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Limits applied when building event payloads
pub mod limits {
    /// Characters of the user request echoed in `TASK_ANALYSIS_START`
    pub const USER_MESSAGE_PREVIEW_CHARS: usize = 50;
}

/// Service names for structured logging
pub mod service_names {
    /// This service
    pub const TASK_LOG_STREAM: &str = "task-log-stream";
}
