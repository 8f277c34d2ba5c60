// ABOUTME: Typed log events pushed to task streams, modelled as a tagged union
// ABOUTME: Builds connection, tool, analysis, file-stream and completion payloads with icons and timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Log event payloads.
//!
//! Every event shares the base fields (`taskId`, `message`, `timestamp`,
//! `icon`) and carries a `type` tag selecting one of the variants of
//! [`EventPayload`]. Serialized with `serde_json`, an event looks like:
//!
//! ```json
//! {"type":"TOOL_START","toolName":"readFile","filePath":"src/main.rs",
//!  "status":"RUNNING","taskId":"task-1","message":"Reading file",
//!  "timestamp":"2025-01-01 12:00:00","icon":"📖"}
//! ```

use super::icons::{analysis_icon, tool_icon, AnalysisStep};
use crate::constants::{limits, time_formats};
use serde::Serialize;

/// Execution status of a tool event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    /// The tool call is planned but has not started
    Planning,
    /// The tool is running
    Running,
    /// The tool finished successfully
    Success,
    /// The tool failed
    Error,
}

/// Status of a file-stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    /// The file was created
    Created,
    /// Content is being written
    Writing,
    /// All content was written
    Complete,
    /// Writing failed
    Error,
}

/// Fields carried by tool events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetails {
    /// Wire name of the tool
    pub tool_name: String,
    /// File the tool operates on
    pub file_path: String,
    /// Execution status
    pub status: ToolStatus,
    /// Execution time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
    /// Description of the step the tool call belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra detail, such as the reason for the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Fields carried by analysis events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// Name of the analysis step
    pub step_name: String,
    /// What the step is doing
    pub description: String,
    /// Caller-defined step status
    pub status: String,
}

/// Fields carried by file-stream events
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStreamDetails {
    /// Path of the file being written
    pub file_path: String,
    /// Write status
    pub status: FileStatus,
    /// Total size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
    /// Bytes written so far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_bytes: Option<u64>,
    /// Progress percentage in `0.0..=100.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
    /// Content of the chunk just written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_chunk: Option<String>,
    /// Index of the chunk just written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    /// Execution time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
}

impl FileStreamDetails {
    fn new(file_path: &str, status: FileStatus) -> Self {
        Self {
            file_path: file_path.to_owned(),
            status,
            total_bytes: None,
            written_bytes: None,
            progress_percent: None,
            content_chunk: None,
            chunk_index: None,
            execution_time: None,
        }
    }
}

/// Variant part of a log event; the variant name is the wire `type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    /// Stream established
    Connection,
    /// A tool started
    ToolStart(ToolDetails),
    /// A tool finished successfully
    ToolSuccess(ToolDetails),
    /// A tool failed
    ToolError(ToolDetails),
    /// A tool call is about to be made, with the reasoning behind it
    ToolExecutionSummary(ToolDetails),
    /// Progress of a named analysis step
    AnalysisStep(AnalysisDetails),
    /// Analysis of the user's request started
    TaskAnalysisStart(AnalysisDetails),
    /// An execution plan was produced
    ExecutionPlan(AnalysisDetails),
    /// A file was created
    FileCreated(FileStreamDetails),
    /// A chunk of content was written to a file
    FileContentChunk(FileStreamDetails),
    /// Byte-level write progress
    FileWriteProgress(FileStreamDetails),
    /// A file was fully written
    FileWriteComplete(FileStreamDetails),
    /// Writing a file failed
    FileWriteError(FileStreamDetails),
    /// The whole task finished
    TaskComplete,
}

impl EventPayload {
    /// Wire name of the event kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection => "CONNECTION",
            Self::ToolStart(_) => "TOOL_START",
            Self::ToolSuccess(_) => "TOOL_SUCCESS",
            Self::ToolError(_) => "TOOL_ERROR",
            Self::ToolExecutionSummary(_) => "TOOL_EXECUTION_SUMMARY",
            Self::AnalysisStep(_) => "ANALYSIS_STEP",
            Self::TaskAnalysisStart(_) => "TASK_ANALYSIS_START",
            Self::ExecutionPlan(_) => "EXECUTION_PLAN",
            Self::FileCreated(_) => "FILE_CREATED",
            Self::FileContentChunk(_) => "FILE_CONTENT_CHUNK",
            Self::FileWriteProgress(_) => "FILE_WRITE_PROGRESS",
            Self::FileWriteComplete(_) => "FILE_WRITE_COMPLETE",
            Self::FileWriteError(_) => "FILE_WRITE_ERROR",
            Self::TaskComplete => "TASK_COMPLETE",
        }
    }
}

/// A single immutable log event addressed to one task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(flatten)]
    payload: EventPayload,
    task_id: String,
    message: String,
    timestamp: String,
    icon: String,
}

impl LogEvent {
    fn new(
        task_id: &str,
        payload: EventPayload,
        message: impl Into<String>,
        icon: &str,
    ) -> Self {
        Self {
            payload,
            task_id: task_id.to_owned(),
            message: message.into(),
            timestamp: current_timestamp(),
            icon: icon.to_owned(),
        }
    }

    /// Variant payload
    #[must_use]
    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Wire name of the event kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.payload.kind()
    }

    /// Task this event belongs to
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Local time the event was built at, `yyyy-MM-dd HH:mm:ss`
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Emoji icon
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Stream established
    #[must_use]
    pub fn connection(task_id: &str) -> Self {
        Self::new(
            task_id,
            EventPayload::Connection,
            "SSE connection established",
            "🔗",
        )
    }

    /// A tool started running against `file_path`
    #[must_use]
    pub fn tool_start(task_id: &str, tool_name: &str, file_path: &str, message: &str) -> Self {
        let details = tool_details(tool_name, file_path, ToolStatus::Running, None);
        Self::new(
            task_id,
            EventPayload::ToolStart(details),
            message,
            tool_icon(tool_name),
        )
    }

    /// A tool finished successfully
    #[must_use]
    pub fn tool_success(
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        message: &str,
        execution_time_ms: u64,
    ) -> Self {
        let details = tool_details(
            tool_name,
            file_path,
            ToolStatus::Success,
            Some(execution_time_ms),
        );
        Self::new(
            task_id,
            EventPayload::ToolSuccess(details),
            message,
            tool_icon(tool_name),
        )
    }

    /// A tool failed; always uses the error icon
    #[must_use]
    pub fn tool_error(
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        message: &str,
        execution_time_ms: u64,
    ) -> Self {
        let details = tool_details(
            tool_name,
            file_path,
            ToolStatus::Error,
            Some(execution_time_ms),
        );
        Self::new(task_id, EventPayload::ToolError(details), message, "❌")
    }

    /// A tool call is planned; `summary` says what it will do and `reason` why
    #[must_use]
    pub fn tool_execution_summary(
        task_id: &str,
        tool_name: &str,
        file_path: &str,
        summary: &str,
        reason: &str,
    ) -> Self {
        let details = ToolDetails {
            description: Some(summary.to_owned()),
            details: Some(reason.to_owned()),
            ..tool_details(tool_name, file_path, ToolStatus::Planning, None)
        };
        Self::new(
            task_id,
            EventPayload::ToolExecutionSummary(details),
            format!("Preparing to execute tool: {tool_name}"),
            tool_icon(tool_name),
        )
    }

    /// Progress of a named analysis step; the description doubles as the message
    #[must_use]
    pub fn analysis_step(task_id: &str, step_name: &str, description: &str, status: &str) -> Self {
        let details = AnalysisDetails {
            step_name: step_name.to_owned(),
            description: description.to_owned(),
            status: status.to_owned(),
        };
        Self::new(
            task_id,
            EventPayload::AnalysisStep(details),
            description,
            analysis_icon(step_name),
        )
    }

    /// Analysis of the user's request started; long requests are truncated in the description
    #[must_use]
    pub fn task_analysis_start(task_id: &str, user_message: &str) -> Self {
        let details = AnalysisDetails {
            step_name: AnalysisStep::TaskAnalysis.name().to_owned(),
            description: format!("Analyzing user request: {}", preview(user_message)),
            status: "ANALYZING".to_owned(),
        };
        Self::new(
            task_id,
            EventPayload::TaskAnalysisStart(details),
            "AI is analyzing your request...",
            AnalysisStep::TaskAnalysis.icon(),
        )
    }

    /// An execution plan was generated
    #[must_use]
    pub fn execution_plan(task_id: &str, plan_summary: &str) -> Self {
        let details = AnalysisDetails {
            step_name: AnalysisStep::ExecutionPlan.name().to_owned(),
            description: plan_summary.to_owned(),
            status: "COMPLETED".to_owned(),
        };
        Self::new(
            task_id,
            EventPayload::ExecutionPlan(details),
            "Execution plan generated",
            AnalysisStep::ExecutionPlan.icon(),
        )
    }

    /// The whole task finished
    #[must_use]
    pub fn task_complete(task_id: &str) -> Self {
        Self::new(
            task_id,
            EventPayload::TaskComplete,
            "Task execution completed",
            "🎉",
        )
    }

    /// A file was created
    #[must_use]
    pub fn file_created(task_id: &str, file_path: &str, message: &str) -> Self {
        Self::new(
            task_id,
            EventPayload::FileCreated(FileStreamDetails::new(file_path, FileStatus::Created)),
            message,
            "📄",
        )
    }

    /// A chunk of content was written
    #[must_use]
    pub fn file_content_chunk(
        task_id: &str,
        file_path: &str,
        chunk: &str,
        chunk_index: u32,
        total_bytes: u64,
        written_bytes: u64,
    ) -> Self {
        let details = FileStreamDetails {
            total_bytes: Some(total_bytes),
            written_bytes: Some(written_bytes),
            content_chunk: Some(chunk.to_owned()),
            chunk_index: Some(chunk_index),
            ..FileStreamDetails::new(file_path, FileStatus::Writing)
        };
        Self::new(
            task_id,
            EventPayload::FileContentChunk(details),
            format!("Writing chunk {chunk_index} ({written_bytes}/{total_bytes} bytes)"),
            "✏️",
        )
    }

    /// Byte-level write progress
    #[must_use]
    pub fn file_write_progress(
        task_id: &str,
        file_path: &str,
        total_bytes: u64,
        written_bytes: u64,
        progress_percent: f64,
    ) -> Self {
        let details = FileStreamDetails {
            total_bytes: Some(total_bytes),
            written_bytes: Some(written_bytes),
            progress_percent: Some(progress_percent),
            ..FileStreamDetails::new(file_path, FileStatus::Writing)
        };
        Self::new(
            task_id,
            EventPayload::FileWriteProgress(details),
            format!("Write progress: {progress_percent:.1}% ({written_bytes}/{total_bytes} bytes)"),
            "📊",
        )
    }

    /// A file was fully written; written and total bytes are both `total_bytes`
    #[must_use]
    pub fn file_write_complete(
        task_id: &str,
        file_path: &str,
        total_bytes: u64,
        execution_time_ms: u64,
    ) -> Self {
        let details = FileStreamDetails {
            total_bytes: Some(total_bytes),
            written_bytes: Some(total_bytes),
            progress_percent: Some(100.0),
            execution_time: Some(execution_time_ms),
            ..FileStreamDetails::new(file_path, FileStatus::Complete)
        };
        Self::new(
            task_id,
            EventPayload::FileWriteComplete(details),
            format!("File write complete ({total_bytes} bytes, {execution_time_ms}ms)"),
            "✅",
        )
    }

    /// Writing a file failed
    #[must_use]
    pub fn file_write_error(
        task_id: &str,
        file_path: &str,
        error_message: &str,
        execution_time_ms: u64,
    ) -> Self {
        let details = FileStreamDetails {
            execution_time: Some(execution_time_ms),
            ..FileStreamDetails::new(file_path, FileStatus::Error)
        };
        Self::new(
            task_id,
            EventPayload::FileWriteError(details),
            format!("File write failed: {error_message}"),
            "❌",
        )
    }
}

fn tool_details(
    tool_name: &str,
    file_path: &str,
    status: ToolStatus,
    execution_time: Option<u64>,
) -> ToolDetails {
    ToolDetails {
        tool_name: tool_name.to_owned(),
        file_path: file_path.to_owned(),
        status,
        execution_time,
        description: None,
        details: None,
    }
}

/// First characters of a user message, with an ellipsis when cut
fn preview(message: &str) -> String {
    let limit = limits::USER_MESSAGE_PREVIEW_CHARS;
    if message.chars().count() > limit {
        let head: String = message.chars().take(limit).collect();
        format!("{head}...")
    } else {
        message.to_owned()
    }
}

fn current_timestamp() -> String {
    chrono::Local::now()
        .format(time_formats::LOG_TIMESTAMP_FORMAT)
        .to_string()
}
