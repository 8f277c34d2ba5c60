// ABOUTME: Per-task streaming channel handle and its lifecycle state machine
// ABOUTME: Queues named SSE frames for one client and records how the connection ended
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Lifecycle of a channel. `Open` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelState {
    /// Accepting frames
    Open = 0,
    /// Closed normally
    Completed = 1,
    /// Closed after the idle timeout elapsed
    TimedOut = 2,
    /// Closed after a failed write or a client disconnect
    Errored = 3,
}

impl ChannelState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Completed,
            2 => Self::TimedOut,
            _ => Self::Errored,
        }
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Unit queued for the client side of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFrame {
    /// A named SSE message
    Event {
        /// SSE `event:` field
        name: &'static str,
        /// SSE `data:` field
        data: String,
    },
    /// The server finished the stream
    Complete,
}

/// Failure to queue a frame on a channel
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The receiving side is gone
    #[error("stream for task {task_id} is disconnected")]
    Disconnected {
        /// Task the channel belonged to
        task_id: String,
    },
    /// The channel already reached a terminal state
    #[error("stream for task {task_id} is already {state:?}")]
    Terminated {
        /// Task the channel belonged to
        task_id: String,
        /// State the channel ended in
        state: ChannelState,
    },
}

/// Sending half of a task stream. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct TaskChannel {
    connection_id: Uuid,
    task_id: Arc<str>,
    created_at: DateTime<Utc>,
    sender: mpsc::UnboundedSender<ChannelFrame>,
    state: Arc<AtomicU8>,
}

impl TaskChannel {
    /// Create a channel in the `Open` state together with its receiving half
    #[must_use]
    pub fn open(task_id: &str) -> (Self, mpsc::UnboundedReceiver<ChannelFrame>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            connection_id: Uuid::new_v4(),
            task_id: Arc::from(task_id),
            created_at: Utc::now(),
            sender,
            state: Arc::new(AtomicU8::new(ChannelState::Open as u8)),
        };
        (channel, receiver)
    }

    /// Unique id of this connection, distinct across re-registrations of a task
    #[must_use]
    pub const fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Task the channel streams for
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// When the channel was opened
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> ChannelState {
        ChannelState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the channel still accepts frames
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    /// Queue a named message for the client
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Terminated`] if the channel already ended and
    /// [`ChannelError::Disconnected`] if the receiving side was dropped.
    pub fn send_event(&self, name: &'static str, data: String) -> Result<(), ChannelError> {
        let state = self.state();
        if state.is_terminal() {
            return Err(ChannelError::Terminated {
                task_id: self.task_id.to_string(),
                state,
            });
        }
        self.sender
            .send(ChannelFrame::Event { name, data })
            .map_err(|_| ChannelError::Disconnected {
                task_id: self.task_id.to_string(),
            })
    }

    /// Finish the stream normally. Returns `false` if it had already ended.
    pub fn complete(&self) -> bool {
        if !self.transition(ChannelState::Completed) {
            return false;
        }
        // A receiver that is already gone needs no completion signal
        let _ = self.sender.send(ChannelFrame::Complete);
        true
    }

    /// Move from `Open` to the given terminal state.
    /// Returns `false` if the channel was not open.
    pub fn transition(&self, to: ChannelState) -> bool {
        if !to.is_terminal() {
            return false;
        }
        self.state
            .compare_exchange(
                ChannelState::Open as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Handle returned when a task stream is opened: the registered channel plus
/// the receiving half that the transport drains.
#[derive(Debug)]
pub struct TaskSubscription {
    channel: TaskChannel,
    receiver: mpsc::UnboundedReceiver<ChannelFrame>,
}

impl TaskSubscription {
    pub(crate) const fn new(
        channel: TaskChannel,
        receiver: mpsc::UnboundedReceiver<ChannelFrame>,
    ) -> Self {
        Self { channel, receiver }
    }

    /// The registered channel
    #[must_use]
    pub const fn channel(&self) -> &TaskChannel {
        &self.channel
    }

    /// Id of the underlying connection
    #[must_use]
    pub const fn connection_id(&self) -> Uuid {
        self.channel.connection_id
    }

    /// Wait for the next frame.
    ///
    /// The subscription owns a sender itself, so this does not return `None`
    /// while the subscription lives. A stream that was closed by the server
    /// ends with [`ChannelFrame::Complete`]; stop reading there.
    pub async fn recv(&mut self) -> Option<ChannelFrame> {
        self.receiver.recv().await
    }

    /// Take the next frame if one is already queued
    pub fn try_recv(&mut self) -> Option<ChannelFrame> {
        self.receiver.try_recv().ok()
    }

    /// Split into the channel and its receiver
    #[must_use]
    pub fn into_parts(self) -> (TaskChannel, mpsc::UnboundedReceiver<ChannelFrame>) {
        (self.channel, self.receiver)
    }
}
