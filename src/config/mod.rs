// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment loader and the SSE/CORS network settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment and server configuration
pub mod environment;
/// SSE and CORS configuration
pub mod network;

pub use environment::ServerConfig;
pub use network::{CorsConfig, SseConfig};
