// ABOUTME: Concurrent registry mapping task identifiers to their live SSE channel
// ABOUTME: Handles registration, explicit close and the transport completion/timeout/error cleanup hooks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::channel::{ChannelState, TaskChannel, TaskSubscription};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Diagnostic view of one registered stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// Task the stream belongs to
    pub task_id: String,
    /// Id of the registered connection
    pub connection_id: Uuid,
    /// When the stream was opened
    pub created_at: DateTime<Utc>,
}

/// Registry of live task streams, at most one per task identifier.
///
/// `DashMap` shards the map so concurrent producers, HTTP handlers and
/// delayed-close timers never contend on a single lock. Every operation
/// touches exactly one key and no guard escapes a method.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: DashMap<String, TaskChannel>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new channel for `task_id` and register it.
    ///
    /// An existing registration for the same task is replaced without being
    /// closed; the old stream stays up until its client goes away.
    #[must_use]
    pub fn register(&self, task_id: &str) -> TaskSubscription {
        let (channel, receiver) = TaskChannel::open(task_id);
        let connection_id = channel.connection_id();

        if let Some(previous) = self.channels.insert(task_id.to_owned(), channel.clone()) {
            debug!(
                task_id = %task_id,
                previous_connection_id = %previous.connection_id(),
                connection_id = %connection_id,
                "Replaced existing SSE channel"
            );
        }

        info!(task_id = %task_id, connection_id = %connection_id, "SSE channel registered");
        TaskSubscription::new(channel, receiver)
    }

    /// Channel currently registered for `task_id`
    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<TaskChannel> {
        self.channels.get(task_id).map(|entry| entry.value().clone())
    }

    /// Whether a channel is registered for `task_id`
    #[must_use]
    pub fn contains(&self, task_id: &str) -> bool {
        self.channels.contains_key(task_id)
    }

    /// Number of registered channels
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Snapshot of every registered stream, oldest first
    #[must_use]
    pub fn connections(&self) -> Vec<ConnectionInfo> {
        let mut connections: Vec<ConnectionInfo> = self
            .channels
            .iter()
            .map(|entry| ConnectionInfo {
                task_id: entry.key().clone(),
                connection_id: entry.value().connection_id(),
                created_at: entry.value().created_at(),
            })
            .collect();
        connections.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        connections
    }

    /// Remove the registration for `task_id` and complete its stream.
    /// Returns `false` (and does nothing else) if none was registered.
    pub fn close(&self, task_id: &str) -> bool {
        let Some((_, channel)) = self.channels.remove(task_id) else {
            debug!(task_id = %task_id, "No SSE channel to close");
            return false;
        };

        channel.complete();
        info!(
            task_id = %task_id,
            connection_id = %channel.connection_id(),
            "SSE channel closed"
        );
        true
    }

    /// Remove and complete every registered channel. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let task_ids: Vec<String> = self
            .channels
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let closed = task_ids
            .iter()
            .filter(|task_id| self.close(task_id))
            .count();
        if closed > 0 {
            info!(closed, "Closed all SSE channels");
        }
        closed
    }

    /// Like [`Self::close`], but only if the registered channel is still the
    /// connection identified by `connection_id`.
    pub fn close_connection(&self, task_id: &str, connection_id: Uuid) -> bool {
        let Some((_, channel)) = self
            .channels
            .remove_if(task_id, |_, channel| channel.connection_id() == connection_id)
        else {
            debug!(
                task_id = %task_id,
                connection_id = %connection_id,
                "SSE connection already gone or replaced, skipping close"
            );
            return false;
        };

        channel.complete();
        info!(task_id = %task_id, connection_id = %connection_id, "SSE channel closed");
        true
    }

    /// Transport hook: the stream ended normally
    pub fn on_completion(&self, channel: &TaskChannel) {
        channel.transition(ChannelState::Completed);
        if self.release(channel) {
            info!(
                task_id = %channel.task_id(),
                connection_id = %channel.connection_id(),
                "SSE connection completed"
            );
        }
    }

    /// Transport hook: the stream hit its idle timeout
    pub fn on_timeout(&self, channel: &TaskChannel) {
        channel.transition(ChannelState::TimedOut);
        if self.release(channel) {
            warn!(
                task_id = %channel.task_id(),
                connection_id = %channel.connection_id(),
                "SSE connection timed out"
            );
        }
    }

    /// Transport hook: writing failed or the client went away
    pub fn on_error(&self, channel: &TaskChannel, reason: &str) {
        channel.transition(ChannelState::Errored);
        if self.release(channel) {
            error!(
                task_id = %channel.task_id(),
                connection_id = %channel.connection_id(),
                error = %reason,
                "SSE connection error"
            );
        }
    }

    /// Drop the registration if it still points at `channel`
    fn release(&self, channel: &TaskChannel) -> bool {
        self.channels
            .remove_if(channel.task_id(), |_, registered| {
                registered.connection_id() == channel.connection_id()
            })
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::channel::ChannelFrame;

    #[test]
    fn test_register_and_lookup() {
        let registry = ConnectionRegistry::new();
        let subscription = registry.register("task-1");

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("task-1"));
        assert_eq!(
            registry.get("task-1").unwrap().connection_id(),
            subscription.connection_id()
        );
        assert!(registry.get("task-2").is_none());
    }

    #[test]
    fn test_close_completes_channel() {
        let registry = ConnectionRegistry::new();
        let mut subscription = registry.register("task-1");

        assert!(registry.close("task-1"));
        assert!(registry.is_empty());
        assert_eq!(subscription.try_recv(), Some(ChannelFrame::Complete));
        assert_eq!(subscription.channel().state(), ChannelState::Completed);

        assert!(!registry.close("task-1"));
    }

    #[test]
    fn test_hooks_ignore_replaced_channel() {
        let registry = ConnectionRegistry::new();
        let old = registry.register("task-1");
        let new = registry.register("task-1");
        assert_eq!(registry.len(), 1);

        registry.on_error(old.channel(), "client disconnected");

        assert_eq!(old.channel().state(), ChannelState::Errored);
        assert_eq!(
            registry.get("task-1").unwrap().connection_id(),
            new.connection_id()
        );
    }

    #[test]
    fn test_timeout_hook_removes_registration() {
        let registry = ConnectionRegistry::new();
        let subscription = registry.register("task-1");

        registry.on_timeout(subscription.channel());

        assert!(!registry.contains("task-1"));
        assert_eq!(subscription.channel().state(), ChannelState::TimedOut);
    }

    #[test]
    fn test_close_all_completes_every_channel() {
        let registry = ConnectionRegistry::new();
        let mut first = registry.register("task-1");
        let mut second = registry.register("task-2");

        assert_eq!(registry.close_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(first.try_recv(), Some(ChannelFrame::Complete));
        assert_eq!(second.try_recv(), Some(ChannelFrame::Complete));
        assert_eq!(registry.close_all(), 0);
    }

    #[test]
    fn test_connections_snapshot() {
        let registry = ConnectionRegistry::new();
        let first = registry.register("task-1");
        let _second = registry.register("task-2");

        let connections = registry.connections();
        assert_eq!(connections.len(), 2);
        let info = connections
            .iter()
            .find(|c| c.task_id == "task-1")
            .unwrap();
        assert_eq!(info.connection_id, first.connection_id());
        assert_eq!(info.created_at, first.channel().created_at());
    }

    #[test]
    fn test_close_connection_checks_identity() {
        let registry = ConnectionRegistry::new();
        let old = registry.register("task-1");
        let new = registry.register("task-1");

        assert!(!registry.close_connection("task-1", old.connection_id()));
        assert!(registry.contains("task-1"));
        assert!(registry.close_connection("task-1", new.connection_id()));
        assert!(!registry.contains("task-1"));
    }
}
