// ABOUTME: Environment-based server configuration for the task log stream service
// ABOUTME: Loads bind address, port, SSE and CORS settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration loaded from the process environment.
//!
//! Every value has a default from [`crate::constants`]; only values that are
//! present but malformed produce an error.

use super::network::{CorsConfig, SseConfig};
use crate::constants::network_config;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub host: IpAddr,
    /// HTTP port
    pub http_port: u16,
    /// SSE stream settings
    pub sse: SseConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            http_port: network_config::DEFAULT_HTTP_PORT,
            sse: SseConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let host = env_var_or("HOST", network_config::DEFAULT_HOST)
            .parse()
            .map_err(|e| AppError::config_invalid(format!("Invalid HOST value: {e}")))?;
        let http_port = env_var_or("HTTP_PORT", &network_config::DEFAULT_HTTP_PORT.to_string())
            .parse()
            .map_err(|e| AppError::config_invalid(format!("Invalid HTTP_PORT value: {e}")))?;

        Ok(Self {
            host,
            http_port,
            sse: SseConfig::from_env()?,
            cors: CorsConfig::from_env(),
        })
    }

    /// Socket address for the HTTP listener
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Task Log Stream Configuration:\n\
             - Bind Address: {}\n\
             - Completion Close Delay: {}ms\n\
             - Keep-Alive Interval: {}s\n\
             - Idle Timeout: {}\n\
             - CORS Origins: {}",
            self.bind_addr(),
            self.sse.close_delay_ms,
            self.sse.keepalive_interval_secs,
            self.sse
                .connection_timeout()
                .map_or_else(|| "disabled".to_owned(), |d| format!("{}s", d.as_secs())),
            if self.cors.allowed_origins.is_empty() {
                "*"
            } else {
                self.cors.allowed_origins.as_str()
            },
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
