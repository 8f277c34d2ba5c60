// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds services with short delays and drains subscription frames into parsed events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]
//! Shared test utilities for `task_log_stream`

use std::sync::Once;
use std::time::Duration;
use task_log_stream::{
    config::{ServerConfig, SseConfig},
    constants::sse_wire::LOG_EVENT_NAME,
    routes::build_router,
    sse::{ChannelFrame, LogStreamService, TaskSubscription},
};

/// Delayed-close window used by tests instead of the production default
pub const TEST_CLOSE_DELAY_MS: u64 = 50;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet test logging once per test binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// SSE settings with a short completion delay
pub fn test_sse_config() -> SseConfig {
    SseConfig {
        close_delay_ms: TEST_CLOSE_DELAY_MS,
        ..SseConfig::default()
    }
}

/// Service with a short completion delay
pub fn create_test_service() -> LogStreamService {
    init_test_logging();
    LogStreamService::new(test_sse_config())
}

/// Full application router around `service`
pub fn create_test_router(service: &LogStreamService) -> axum::Router {
    let config = ServerConfig {
        sse: service.config().clone(),
        ..ServerConfig::default()
    };
    build_router(&config, service)
}

/// Drain every frame already queued on `subscription`, parsing `log` events as JSON.
/// `ChannelFrame::Complete` is returned as `None`.
pub fn drain_frames(subscription: &mut TaskSubscription) -> Vec<Option<serde_json::Value>> {
    let mut frames = Vec::new();
    while let Some(frame) = subscription.try_recv() {
        frames.push(match frame {
            ChannelFrame::Event { name, data } => {
                assert_eq!(name, LOG_EVENT_NAME);
                Some(serde_json::from_str(&data).expect("log event data is JSON"))
            }
            ChannelFrame::Complete => None,
        });
    }
    frames
}

/// Drain queued `log` events only
pub fn drain_events(subscription: &mut TaskSubscription) -> Vec<serde_json::Value> {
    drain_frames(subscription).into_iter().flatten().collect()
}

/// Wait long enough for a scheduled completion close to fire
pub async fn wait_past_close_delay() {
    tokio::time::sleep(Duration::from_millis(TEST_CLOSE_DELAY_MS * 6)).await;
}
