//! Serialisable DTOs for the JSON operation surface.
//!
//! These shapes are the complete request/response contract a transport layer
//! (HTTP or otherwise) exposes; the registry returns them directly so a
//! listener stays a mechanical wrapper.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::{MatchStatus, SessionState, TaskResult};
use crate::task::Task;
use crate::{GameError, TaskCategory};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Task fields exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub task_id: String,
    pub category: TaskCategory,
    pub difficulty: u8,
    pub initial: String,
    pub desired: String,
    pub cursor_start: usize,
    pub cursor_end: usize,
    pub highlight_start: usize,
    pub highlight_end: usize,
    pub optimal_keys: String,
    pub optimal_count: usize,
    pub description: String,
    pub hint: String,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            category: task.category,
            difficulty: task.difficulty,
            initial: task.initial.clone(),
            desired: task.desired.clone(),
            cursor_start: task.cursor_start,
            cursor_end: task.cursor_end,
            highlight_start: task.highlight_start,
            highlight_end: task.highlight_end,
            optimal_keys: task.optimal_keys.clone(),
            optimal_count: task.optimal_count,
            description: task.description.clone(),
            hint: task.hint.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub round_type: String,
    pub total_tasks: usize,
    pub current_task_index: usize,
    pub started_at: DateTime<Utc>,
    pub skips_remaining: u32,
    pub current_task: Option<TaskView>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub round_type: String,
    pub state: SessionState,
    pub total_tasks: usize,
    pub current_task_index: usize,
    pub started_at: DateTime<Utc>,
    pub skips_remaining: u32,
    pub current_task: Option<TaskView>,
    pub buffer_state: String,
    pub cursor_position: usize,
    pub current_mode: String,
    pub elapsed_time_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct KeystrokeResponse {
    pub buffer_state: String,
    pub cursor_position: usize,
    pub current_mode: String,
    pub match_status: MatchStatus,
    pub task_completed: bool,
    pub elapsed_time_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub task_completed: bool,
    pub round_complete: bool,
    pub tasks_remaining: usize,
    pub result: TaskResult,
    pub next_task: Option<TaskView>,
}

#[derive(Debug, Serialize)]
pub struct SkipResponse {
    pub task_skipped: bool,
    pub skips_remaining: u32,
    pub tasks_remaining: usize,
    pub next_task: Option<TaskView>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub task_reset: bool,
    pub buffer_state: String,
    pub cursor_position: usize,
    pub elapsed_time_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub round_types: Vec<&'static str>,
}

/// The `{"error":{code,message}}` envelope every failure serialises to.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl From<&GameError> for ErrorEnvelope {
    fn from(err: &GameError) -> Self {
        Self {
            error: ErrorDetail {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let envelope = ErrorEnvelope::from(&GameError::NoSkipsRemaining);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "NO_SKIPS_REMAINING");
        assert_eq!(json["error"]["message"], "no skips remaining");
    }

    #[test]
    fn match_status_serialises_snake_case() {
        let response = KeystrokeResponse {
            buffer_state: "x".into(),
            cursor_position: 0,
            current_mode: "NORMAL".into(),
            match_status: MatchStatus::InProgress,
            task_completed: false,
            elapsed_time_ms: 12,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["match_status"], "in_progress");
    }
}
