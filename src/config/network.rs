// ABOUTME: Network configuration types for SSE streams and CORS
// ABOUTME: Handles stream keep-alive, idle timeout, completion close delay and allowed origins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::timeouts;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// SSE connection management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Delay between a `TASK_COMPLETE` event and closing the stream, in milliseconds
    pub close_delay_ms: u64,
    /// Interval between keep-alive comments in seconds
    pub keepalive_interval_secs: u64,
    /// Idle timeout in seconds; a stream that delivers nothing for this long is timed out.
    /// Zero disables the timeout.
    pub connection_timeout_secs: u64,
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: timeouts::TASK_COMPLETE_CLOSE_DELAY_MS,
            keepalive_interval_secs: timeouts::SSE_KEEPALIVE_INTERVAL_SECS,
            connection_timeout_secs: timeouts::SSE_CONNECTION_TIMEOUT_SECS,
        }
    }
}

impl SseConfig {
    /// Load SSE configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if SSE environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            close_delay_ms: env_var_or(
                "LOG_STREAM_CLOSE_DELAY_MS",
                &timeouts::TASK_COMPLETE_CLOSE_DELAY_MS.to_string(),
            )
            .parse()
            .map_err(|e| {
                AppError::config_invalid(format!("Invalid LOG_STREAM_CLOSE_DELAY_MS value: {e}"))
            })?,
            keepalive_interval_secs: env_var_or(
                "SSE_KEEPALIVE_INTERVAL_SECS",
                &timeouts::SSE_KEEPALIVE_INTERVAL_SECS.to_string(),
            )
            .parse()
            .map_err(|e| {
                AppError::config_invalid(format!("Invalid SSE_KEEPALIVE_INTERVAL_SECS value: {e}"))
            })?,
            connection_timeout_secs: env_var_or(
                "SSE_CONNECTION_TIMEOUT_SECS",
                &timeouts::SSE_CONNECTION_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .map_err(|e| {
                AppError::config_invalid(format!("Invalid SSE_CONNECTION_TIMEOUT_SECS value: {e}"))
            })?,
        })
    }

    /// Delay before a completed task's stream is closed
    #[must_use]
    pub const fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Keep-alive interval, never shorter than one second
    #[must_use]
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs.max(1))
    }

    /// Idle timeout, `None` when disabled
    #[must_use]
    pub const fn connection_timeout(&self) -> Option<Duration> {
        if self.connection_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.connection_timeout_secs))
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins; empty or `*` allows any origin
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Load CORS configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        }
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
