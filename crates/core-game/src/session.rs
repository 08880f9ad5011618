//! A live training session: one engine, an ordered task list, timing and
//! scoring.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use core_engine::Engine;
use core_stats::{CategoryStats, SessionStats, TaskStats, grade_for};
use core_text::Mode;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::task::{RoundType, Task, TaskCategory};

/// Skips granted per session.
pub const SKIPS_PER_SESSION: u32 = 5;

/// Synthetic time charged for a skipped task.
const SKIP_TIME_MS: i64 = 60_000;

/// Classifier output after each keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Buffer equals the initial text.
    None,
    /// Buffer modified but not matching yet.
    InProgress,
    /// Buffer (or cursor, for motion tasks) matches the target.
    Complete,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::None => "none",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Paused,
    Completed,
}

/// Outcome of one attempted task, successful or skipped.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub task_id: String,
    pub category: TaskCategory,
    pub difficulty: u8,
    pub time_ms: i64,
    pub keystrokes: u64,
    pub optimal_keystrokes: u64,
    pub efficiency: f64,
    pub success: bool,
    pub keys_used: String,
    pub resets: u32,
    pub hints_used: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Session {
    id: String,
    round_type: RoundType,
    tasks: Vec<Task>,
    current_index: usize,
    state: SessionState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    task_results: Vec<TaskResult>,
    skips_remaining: u32,

    engine: Engine,
    task_start: Instant,
    paused_time: Duration,
    pause_start: Option<Instant>,
    keystrokes: u64,
    keys_used: String,
    hints_used: u32,
    resets: u32,
}

impl Session {
    pub fn new(round_type: RoundType, tasks: Vec<Task>) -> Self {
        let mut session = Self {
            id: Uuid::new_v4().to_string(),
            round_type,
            tasks,
            current_index: 0,
            state: SessionState::Active,
            started_at: Utc::now(),
            completed_at: None,
            task_results: Vec::new(),
            skips_remaining: SKIPS_PER_SESSION,
            engine: Engine::new(""),
            task_start: Instant::now(),
            paused_time: Duration::ZERO,
            pause_start: None,
            keystrokes: 0,
            keys_used: String::new(),
            hints_used: 0,
            resets: 0,
        };
        if session.tasks.is_empty() {
            session.state = SessionState::Completed;
            session.completed_at = Some(Utc::now());
        } else {
            session.start_task();
        }
        info!(
            target: "game.session",
            session_id = %session.id,
            round_type = %round_type,
            tasks = session.tasks.len(),
            "session_created"
        );
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn skips_remaining(&self) -> u32 {
        self.skips_remaining
    }

    pub fn task_results(&self) -> &[TaskResult] {
        &self.task_results
    }

    pub fn keystrokes(&self) -> u64 {
        self.keystrokes
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.current_index)
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn buffer_text(&self) -> String {
        self.engine.text()
    }

    pub fn cursor_index(&self) -> usize {
        self.engine.cursor_index()
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    /// Fraction of the round already advanced past.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.tasks.len() as f64
    }

    fn start_task(&mut self) {
        let Some(task) = self.tasks.get(self.current_index) else {
            return;
        };
        self.engine.reset(&task.initial, task.cursor_start);
        self.task_start = Instant::now();
        self.paused_time = Duration::ZERO;
        self.keystrokes = 0;
        self.keys_used.clear();
        self.hints_used = 0;
        self.resets = 0;
    }

    /// Feed one keystroke into the engine and classify the result. Every
    /// accepted key counts toward the efficiency denominator, including keys
    /// the parser ends up dropping.
    pub fn process_key(&mut self, key: &str) -> MatchStatus {
        if self.is_paused() || self.current_task().is_none() {
            return MatchStatus::None;
        }
        self.engine.process_key(key);
        self.keystrokes += 1;
        self.keys_used.push_str(key);
        self.check_match()
    }

    /// Compare the live buffer against the current task.
    pub fn check_match(&self) -> MatchStatus {
        let Some(task) = self.current_task() else {
            return MatchStatus::None;
        };

        if task.is_motion_task() {
            return if self.engine.cursor_index() == task.cursor_end {
                MatchStatus::Complete
            } else {
                MatchStatus::InProgress
            };
        }

        let text = self.engine.text();
        if text == task.desired {
            MatchStatus::Complete
        } else if text == task.initial {
            MatchStatus::None
        } else {
            MatchStatus::InProgress
        }
    }

    /// Elapsed time on the current task, excluding paused intervals.
    pub fn elapsed_time(&self) -> Duration {
        let raw = match self.pause_start {
            Some(paused_at) => paused_at.duration_since(self.task_start),
            None => self.task_start.elapsed(),
        };
        raw.saturating_sub(self.paused_time)
    }

    /// Wall-clock time across the whole session.
    pub fn total_elapsed_ms(&self) -> i64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }

    fn advance(&mut self) {
        self.current_index += 1;
        if self.current_index >= self.tasks.len() {
            self.state = SessionState::Completed;
            self.completed_at = Some(Utc::now());
            info!(target: "game.session", session_id = %self.id, "session_completed");
        } else {
            self.start_task();
        }
    }

    /// Record the current task as solved and move to the next one.
    pub fn complete_task(&mut self) -> Option<TaskResult> {
        let task = self.current_task()?;
        let elapsed_ms = self.elapsed_time().as_millis() as i64;
        let efficiency = if self.keystrokes > 0 {
            (task.optimal_count as f64 / self.keystrokes as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let result = TaskResult {
            task_id: task.id.clone(),
            category: task.category,
            difficulty: task.difficulty,
            time_ms: elapsed_ms,
            keystrokes: self.keystrokes,
            optimal_keystrokes: task.optimal_count as u64,
            efficiency,
            success: true,
            keys_used: self.keys_used.clone(),
            resets: self.resets,
            hints_used: self.hints_used,
            completed_at: Utc::now(),
        };
        debug!(
            target: "game.session",
            session_id = %self.id,
            task_id = %result.task_id,
            keystrokes = result.keystrokes,
            efficiency = result.efficiency,
            "task_completed"
        );
        self.task_results.push(result.clone());
        self.advance();
        Some(result)
    }

    /// Skip the current task, charging the synthetic maximum time. Returns
    /// false when no skips remain.
    pub fn skip_task(&mut self) -> bool {
        if self.skips_remaining == 0 {
            return false;
        }
        let Some(task) = self.current_task().cloned() else {
            return false;
        };
        self.skips_remaining -= 1;

        let result = TaskResult {
            task_id: task.id.clone(),
            category: task.category,
            difficulty: task.difficulty,
            time_ms: SKIP_TIME_MS,
            keystrokes: self.keystrokes,
            optimal_keystrokes: task.optimal_count as u64,
            efficiency: 0.0,
            success: false,
            keys_used: self.keys_used.clone(),
            resets: self.resets,
            hints_used: self.hints_used,
            completed_at: Utc::now(),
        };
        debug!(
            target: "game.session",
            session_id = %self.id,
            task_id = %result.task_id,
            skips_remaining = self.skips_remaining,
            "task_skipped"
        );
        self.task_results.push(result);
        self.advance();
        true
    }

    /// Restore the current task's initial state. Timer and keystroke counters
    /// keep running.
    pub fn reset_task(&mut self) {
        let Some(task) = self.current_task().cloned() else {
            return;
        };
        self.resets += 1;
        self.engine.reset(&task.initial, task.cursor_start);
    }

    pub fn use_hint(&mut self) {
        self.hints_used += 1;
    }

    pub fn pause(&mut self) {
        if self.pause_start.is_none() && self.state == SessionState::Active {
            self.pause_start = Some(Instant::now());
            self.state = SessionState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if let Some(paused_at) = self.pause_start.take() {
            self.paused_time += paused_at.elapsed();
            self.state = SessionState::Active;
        }
    }

    /// Aggregate the recorded results into scoreboard statistics. `None`
    /// until at least one task was attempted.
    pub fn stats(&self) -> Option<SessionStats> {
        if self.task_results.is_empty() {
            return None;
        }

        let mut stats = SessionStats {
            session_id: self.id.clone(),
            round_type: self.round_type.as_str().to_string(),
            started_at: Some(self.started_at),
            completed_at: self.completed_at,
            total_time_ms: self.total_elapsed_ms(),
            tasks_attempted: self.task_results.len() as u64,
            ..SessionStats::default()
        };

        let mut category_stats: BTreeMap<String, CategoryStats> = BTreeMap::new();
        let mut total_efficiency = 0.0;
        let mut total_time_ms = 0i64;

        for result in &self.task_results {
            if result.success {
                stats.tasks_completed += 1;
            }
            total_efficiency += result.efficiency;
            total_time_ms += result.time_ms;

            let entry = category_stats
                .entry(result.category.as_str().to_string())
                .or_default();
            entry.tasks_attempted += 1;
            if result.success {
                entry.tasks_completed += 1;
                if entry.best_time_ms == 0 || result.time_ms < entry.best_time_ms {
                    entry.best_time_ms = result.time_ms;
                }
            }
            entry.total_time_ms += result.time_ms;
            entry.total_keystrokes += result.keystrokes;
            entry.total_efficiency += result.efficiency;

            stats.tasks.push(TaskStats {
                task_id: result.task_id.clone(),
                category: result.category.as_str().to_string(),
                difficulty: result.difficulty,
                time_ms: result.time_ms,
                keystrokes: result.keystrokes,
                optimal_keystrokes: result.optimal_keystrokes,
                efficiency: result.efficiency,
                success: result.success,
                keys_used: result.keys_used.clone(),
                resets: result.resets,
                hints_used: result.hints_used,
                completed_at: result.completed_at,
            });
        }

        stats.avg_efficiency = total_efficiency / stats.tasks_attempted as f64;
        stats.avg_time_ms = total_time_ms / stats.tasks_attempted as i64;
        stats.category_stats = category_stats;
        stats.grade = grade_for(&stats).as_str().to_string();
        Some(stats)
    }
}
