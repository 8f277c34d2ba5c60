// ABOUTME: Tests for environment-driven server, SSE, CORS and logging configuration
// ABOUTME: Runs serially because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::time::Duration;
use task_log_stream::config::ServerConfig;
use task_log_stream::errors::ErrorCode;
use task_log_stream::logging::{LogFormat, LoggingConfig};

const CONFIG_VARS: &[&str] = &[
    "HOST",
    "HTTP_PORT",
    "LOG_STREAM_CLOSE_DELAY_MS",
    "SSE_KEEPALIVE_INTERVAL_SECS",
    "SSE_CONNECTION_TIMEOUT_SECS",
    "CORS_ALLOWED_ORIGINS",
];

fn clear_config_env() {
    for var in CONFIG_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8081");
    assert_eq!(config.sse.close_delay(), Duration::from_millis(2000));
    assert_eq!(config.sse.keepalive_interval(), Duration::from_secs(15));
    assert!(config.sse.connection_timeout().is_none());
    assert!(config.cors.allowed_origins.is_empty());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_config_env();
    env::set_var("HOST", "127.0.0.1");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("LOG_STREAM_CLOSE_DELAY_MS", "500");
    env::set_var("SSE_KEEPALIVE_INTERVAL_SECS", "5");
    env::set_var("SSE_CONNECTION_TIMEOUT_SECS", "600");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://app.example.com");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9090");
    assert_eq!(config.sse.close_delay(), Duration::from_millis(500));
    assert_eq!(config.sse.keepalive_interval(), Duration::from_secs(5));
    assert_eq!(
        config.sse.connection_timeout(),
        Some(Duration::from_secs(600))
    );
    assert_eq!(config.cors.allowed_origins, "https://app.example.com");

    let summary = config.summary();
    assert!(summary.contains("127.0.0.1:9090"));
    assert!(summary.contains("500ms"));
    assert!(summary.contains("600s"));

    clear_config_env();
}

#[test]
#[serial]
fn test_malformed_port_is_rejected() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains("HTTP_PORT"));

    clear_config_env();
}

#[test]
#[serial]
fn test_malformed_close_delay_is_rejected() {
    clear_config_env();
    env::set_var("LOG_STREAM_CLOSE_DELAY_MS", "-5");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains("LOG_STREAM_CLOSE_DELAY_MS"));

    clear_config_env();
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("LOG_FORMAT", "json");
    env::set_var("RUST_LOG", "debug");

    let config = LoggingConfig::from_env();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "debug");

    env::remove_var("LOG_FORMAT");
    env::remove_var("RUST_LOG");

    let config = LoggingConfig::from_env();
    assert_eq!(config.format, LogFormat::Pretty);
}
