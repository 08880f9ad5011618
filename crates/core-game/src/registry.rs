//! Session registry: the id-to-session map and the operation surface over it.
//!
//! One reader-writer lock covers the map, the generator and the stats sink.
//! Lookups and stats reads share the read side; anything that mutates session
//! state takes the write side, which also serialises keystrokes within a
//! session (clients are sequential per session, so finer locking buys
//! nothing). Stats hit the disk only when a session completes.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use core_stats::{LifetimeStats, SessionStats, StatsTracker};
use tracing::{info, warn};

use crate::generator::TaskGenerator;
use crate::session::{MatchStatus, Session};
use crate::task::RoundType;
use crate::wire;
use crate::{GameError, Result};

struct Inner {
    sessions: HashMap<String, Session>,
    generator: TaskGenerator,
    tracker: StatsTracker,
}

pub struct SessionRegistry {
    inner: RwLock<Inner>,
    started_at: Instant,
}

/// Export formats for the lifetime statistics document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "json" | "" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(GameError::InvalidRequest(format!(
                "supported formats: json, csv (got {other:?})"
            ))),
        }
    }
}

impl SessionRegistry {
    pub fn new(generator: TaskGenerator, tracker: StatsTracker) -> Self {
        Self {
            inner: RwLock::new(Inner {
                sessions: HashMap::new(),
                generator,
                tracker,
            }),
            started_at: Instant::now(),
        }
    }

    pub fn health(&self) -> wire::HealthResponse {
        wire::HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    pub fn round_types(&self) -> wire::RoundsResponse {
        wire::RoundsResponse {
            round_types: RoundType::ALL.iter().map(RoundType::as_str).collect(),
        }
    }

    pub fn attribution(&self) -> String {
        crate::corpus::attribution()
    }

    /// Generate a fresh round and register a session over it.
    pub fn create_session(&self, round_type: &str) -> wire::SessionCreated {
        let round = RoundType::parse(round_type);
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let tasks = inner.generator.round(round);
        let session = Session::new(round, tasks);

        let created = wire::SessionCreated {
            session_id: session.id().to_string(),
            round_type: round.as_str().to_string(),
            total_tasks: session.total_tasks(),
            current_task_index: session.current_index(),
            started_at: session.started_at(),
            skips_remaining: session.skips_remaining(),
            current_task: session.current_task().map(wire::TaskView::from),
        };
        info!(target: "game.registry", session_id = %created.session_id, round = %round, "session_registered");
        inner.sessions.insert(created.session_id.clone(), session);
        created
    }

    pub fn session_view(&self, id: &str) -> Result<wire::SessionView> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let session = inner.sessions.get(id).ok_or(GameError::SessionNotFound)?;
        Ok(wire::SessionView {
            session_id: session.id().to_string(),
            round_type: session.round_type().as_str().to_string(),
            state: session.state(),
            total_tasks: session.total_tasks(),
            current_task_index: session.current_index(),
            started_at: session.started_at(),
            skips_remaining: session.skips_remaining(),
            current_task: session.current_task().map(wire::TaskView::from),
            buffer_state: session.buffer_text(),
            cursor_position: session.cursor_index(),
            current_mode: session.mode().to_string(),
            elapsed_time_ms: session.elapsed_time().as_millis() as i64,
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner
            .sessions
            .remove(id)
            .map(|_| ())
            .ok_or(GameError::SessionNotFound)
    }

    /// Apply a single keystroke.
    pub fn keystroke(&self, id: &str, key: &str) -> Result<wire::KeystrokeResponse> {
        self.keystrokes(id, std::slice::from_ref(&key))
    }

    /// Apply keystrokes in order until the task completes or the batch is
    /// exhausted.
    pub fn keystrokes<K: AsRef<str>>(&self, id: &str, keys: &[K]) -> Result<wire::KeystrokeResponse> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        if session.is_complete() {
            return Err(GameError::SessionCompleted);
        }

        let mut status = session.check_match();
        for key in keys {
            status = session.process_key(key.as_ref());
            if status == MatchStatus::Complete {
                break;
            }
        }

        Ok(wire::KeystrokeResponse {
            buffer_state: session.buffer_text(),
            cursor_position: session.cursor_index(),
            current_mode: session.mode().to_string(),
            match_status: status,
            task_completed: status == MatchStatus::Complete,
            elapsed_time_ms: session.elapsed_time().as_millis() as i64,
        })
    }

    /// Confirm the current task as done and advance. Persists stats when the
    /// round finishes.
    pub fn complete_task(&self, id: &str) -> Result<wire::CompleteResponse> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        let result = session.complete_task().ok_or(GameError::SessionCompleted)?;

        let round_complete = session.is_complete();
        let response = wire::CompleteResponse {
            task_completed: true,
            round_complete,
            tasks_remaining: session.total_tasks() - session.current_index().min(session.total_tasks()),
            result,
            next_task: session.current_task().map(wire::TaskView::from),
        };
        if round_complete {
            Self::record_finished(&mut *inner, id);
        }
        Ok(response)
    }

    /// Skip the current task; fails once the skip budget is spent.
    pub fn skip_task(&self, id: &str) -> Result<wire::SkipResponse> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        if session.is_complete() {
            return Err(GameError::SessionCompleted);
        }
        if !session.skip_task() {
            return Err(GameError::NoSkipsRemaining);
        }

        let round_complete = session.is_complete();
        let response = wire::SkipResponse {
            task_skipped: true,
            skips_remaining: session.skips_remaining(),
            tasks_remaining: session.total_tasks() - session.current_index().min(session.total_tasks()),
            next_task: session.current_task().map(wire::TaskView::from),
        };
        if round_complete {
            Self::record_finished(&mut *inner, id);
        }
        Ok(response)
    }

    pub fn reset_task(&self, id: &str) -> Result<wire::ResetResponse> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        session.reset_task();
        Ok(wire::ResetResponse {
            task_reset: true,
            buffer_state: session.buffer_text(),
            cursor_position: session.cursor_index(),
            elapsed_time_ms: session.elapsed_time().as_millis() as i64,
        })
    }

    pub fn use_hint(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        session.use_hint();
        Ok(())
    }

    pub fn pause_session(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        session.pause();
        Ok(())
    }

    pub fn resume_session(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or(GameError::SessionNotFound)?;
        session.resume();
        Ok(())
    }

    /// Live statistics for one session (zeroed until a task was attempted).
    pub fn session_stats(&self, id: &str) -> Result<SessionStats> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let session = inner.sessions.get(id).ok_or(GameError::SessionNotFound)?;
        Ok(session.stats().unwrap_or_else(|| SessionStats {
            session_id: session.id().to_string(),
            round_type: session.round_type().as_str().to_string(),
            started_at: Some(session.started_at()),
            grade: "F".to_string(),
            ..SessionStats::default()
        }))
    }

    pub fn lifetime_stats(&self) -> LifetimeStats {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.tracker.lifetime().clone()
    }

    pub fn export_stats(&self, format: ExportFormat) -> Result<String> {
        let inner = self.inner.read().expect("registry lock poisoned");
        match format {
            ExportFormat::Json => inner
                .tracker
                .export_json()
                .map_err(|e| GameError::InvalidRequest(e.to_string())),
            ExportFormat::Csv => Ok(inner.tracker.export_csv()),
        }
    }

    /// Fold a finished session into the stats sink. Disk failures are logged
    /// and swallowed — stats loss must not fail the user-facing call.
    fn record_finished(inner: &mut Inner, id: &str) {
        let Some(stats) = inner.sessions.get(id).and_then(Session::stats) else {
            return;
        };
        info!(
            target: "game.registry",
            session_id = %id,
            grade = %stats.grade,
            tasks_completed = stats.tasks_completed,
            "session_recorded"
        );
        inner.tracker.record_session(stats);
        if let Err(e) = inner.tracker.save() {
            warn!(target: "game.registry", error = %e, "stats_save_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        let dir = std::env::temp_dir().join(format!("vimdrill-test-{}", uuid::Uuid::new_v4()));
        SessionRegistry::new(
            TaskGenerator::with_seed(99),
            StatsTracker::open(dir.join("stats.json")),
        )
    }

    #[test]
    fn create_and_fetch_session() {
        let reg = registry();
        let created = reg.create_session("beginner");
        assert_eq!(created.total_tasks, 30);
        assert!(created.current_task.is_some());

        let view = reg.session_view(&created.session_id).unwrap();
        assert_eq!(view.session_id, created.session_id);
        assert_eq!(view.current_mode, "NORMAL");
        assert_eq!(view.skips_remaining, 5);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let reg = registry();
        let err = reg.session_view("missing").unwrap_err();
        assert!(matches!(err, GameError::SessionNotFound));
        assert_eq!(err.code(), "SESSION_NOT_FOUND");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn delete_removes_session() {
        let reg = registry();
        let created = reg.create_session("beginner");
        reg.delete_session(&created.session_id).unwrap();
        assert!(reg.session_view(&created.session_id).is_err());
        assert!(reg.delete_session(&created.session_id).is_err());
    }

    #[test]
    fn keystroke_reports_buffer_snapshot() {
        let reg = registry();
        let created = reg.create_session("beginner");
        let response = reg.keystroke(&created.session_id, "j").unwrap();
        assert_eq!(response.current_mode, "NORMAL");
        assert!(!response.buffer_state.is_empty());
    }

    #[test]
    fn skip_exhaustion_surfaces_typed_error() {
        let reg = registry();
        let created = reg.create_session("beginner");
        for expected_remaining in (0..5).rev() {
            let response = reg.skip_task(&created.session_id).unwrap();
            assert_eq!(response.skips_remaining, expected_remaining);
        }
        let err = reg.skip_task(&created.session_id).unwrap_err();
        assert!(matches!(err, GameError::NoSkipsRemaining));
        assert_eq!(err.http_status(), 400);

        let view = reg.session_view(&created.session_id).unwrap();
        assert_eq!(view.current_task_index, 5);
    }

    #[test]
    fn reset_restores_initial_text() {
        let reg = registry();
        let created = reg.create_session("beginner");
        let initial = created.current_task.as_ref().unwrap().initial.clone();
        reg.keystroke(&created.session_id, "x").unwrap();
        let reset = reg.reset_task(&created.session_id).unwrap();
        assert!(reset.task_reset);
        assert_eq!(reset.buffer_state, initial);
    }

    #[test]
    fn export_formats() {
        let reg = registry();
        assert!(reg.export_stats(ExportFormat::Json).unwrap().contains("lifetime"));
        assert!(reg.export_stats(ExportFormat::Csv).unwrap().starts_with("Category,"));
        assert!(ExportFormat::parse("bogus").is_err());
        assert_eq!(ExportFormat::parse("").unwrap(), ExportFormat::Json);
    }

    #[test]
    fn rounds_listing() {
        let reg = registry();
        let rounds = reg.round_types();
        assert_eq!(
            rounds.round_types,
            vec!["beginner", "intermediate", "advanced", "expert", "mixed"]
        );
    }

    #[test]
    fn health_reports_version() {
        let reg = registry();
        let health = reg.health();
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }
}
