//! Scoreboard: per-session and lifetime statistics, achievements and the
//! JSON persistence sink.
//!
//! The tracker owns a single on-disk document. Loading tolerates a missing or
//! corrupt file by starting fresh; saving writes a temporary file and renames
//! it into place. Persistence happens only when a session completes — never on
//! the keystroke path.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod grade;

pub use grade::{Grade, grade_for};

/// Persisted sessions are capped to the most recent entries.
const SESSION_HISTORY_MAX: usize = 100;

const STATS_VERSION: &str = "2.0.0";

/// The complete statistics document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsData {
    pub version: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub lifetime: LifetimeStats,
    pub sessions: Vec<SessionStats>,
    pub achievements: Vec<Achievement>,
    pub preferences: Preferences,
}

impl Default for StatsData {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: STATS_VERSION.to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            last_updated: now,
            lifetime: LifetimeStats::default(),
            sessions: Vec::new(),
            achievements: Vec::new(),
            preferences: Preferences::default(),
        }
    }
}

/// Aggregates over every recorded session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_rounds: u64,
    pub total_tasks: u64,
    pub total_time_ms: i64,
    pub total_keystrokes: u64,
    pub total_practice_time_ms: i64,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub personal_bests: PersonalBests,
}

/// Statistics for one task category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub tasks_attempted: u64,
    pub tasks_completed: u64,
    pub total_time_ms: i64,
    pub total_keystrokes: u64,
    pub total_efficiency: f64,
    pub best_time_ms: i64,
    pub avg_time_ms: i64,
    pub avg_efficiency: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalBests {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest_task: Option<BestRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_efficiency: Option<BestRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest_round: Option<BestRecord>,
}

/// A personal record: which session or task set it, the numeric value, when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestRecord {
    pub id: String,
    pub value: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub round_type: String,
}

/// Statistics for one finished (or abandoned) session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub round_type: String,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_time_ms: i64,
    pub tasks_completed: u64,
    pub tasks_attempted: u64,
    pub grade: String,
    pub avg_efficiency: f64,
    pub avg_time_ms: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_stats: BTreeMap<String, CategoryStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskStats>,
}

/// One task attempt inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStats {
    pub task_id: String,
    pub category: String,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    pub auto_advance_delay_ms: u32,
    pub show_hints: bool,
    pub enable_sounds: bool,
    pub animation_speed: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            auto_advance_delay_ms: 500,
            show_hints: true,
            enable_sounds: false,
            animation_speed: 1.0,
        }
    }
}

/// Owns the stats document and its file path.
#[derive(Debug)]
pub struct StatsTracker {
    path: PathBuf,
    data: StatsData,
}

impl StatsTracker {
    /// Load from `path`, starting a fresh document when the file is missing
    /// or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StatsData>(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!(target: "stats.store", error = %e, "stats_file_unparseable_starting_fresh");
                    StatsData::default()
                }
            },
            Err(_) => {
                debug!(target: "stats.store", path = %path.display(), "no_stats_file_starting_fresh");
                StatsData::default()
            }
        };
        Self { path, data }
    }

    /// Write the document: temporary file in the same directory, then rename.
    pub fn save(&mut self) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating stats directory {}", dir.display()))?;
        }
        self.data.last_updated = Utc::now();
        let payload = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("renaming into {}", self.path.display()))?;
        debug!(target: "stats.store", path = %self.path.display(), "stats_saved");
        Ok(())
    }

    /// Fold a finished session into the document: history (bounded), lifetime
    /// aggregates, personal bests and achievements.
    pub fn record_session(&mut self, session: SessionStats) {
        self.update_lifetime(&session);
        self.check_achievements(&session);
        self.data.sessions.push(session);
        if self.data.sessions.len() > SESSION_HISTORY_MAX {
            let excess = self.data.sessions.len() - SESSION_HISTORY_MAX;
            self.data.sessions.drain(..excess);
        }
    }

    fn update_lifetime(&mut self, session: &SessionStats) {
        let lifetime = &mut self.data.lifetime;
        lifetime.total_rounds += 1;
        lifetime.total_tasks += session.tasks_attempted;
        lifetime.total_time_ms += session.total_time_ms;
        lifetime.total_practice_time_ms += session.total_time_ms;

        for (category, incoming) in &session.category_stats {
            let entry = lifetime.by_category.entry(category.clone()).or_default();
            entry.tasks_attempted += incoming.tasks_attempted;
            entry.tasks_completed += incoming.tasks_completed;
            entry.total_time_ms += incoming.total_time_ms;
            entry.total_keystrokes += incoming.total_keystrokes;
            entry.total_efficiency += incoming.total_efficiency;
            lifetime.total_keystrokes += incoming.total_keystrokes;

            if entry.tasks_attempted > 0 {
                entry.avg_time_ms = entry.total_time_ms / entry.tasks_attempted as i64;
                entry.avg_efficiency = entry.total_efficiency / entry.tasks_attempted as f64;
                entry.success_rate =
                    entry.tasks_completed as f64 / entry.tasks_attempted as f64 * 100.0;
            }
            if incoming.best_time_ms > 0
                && (entry.best_time_ms == 0 || incoming.best_time_ms < entry.best_time_ms)
            {
                entry.best_time_ms = incoming.best_time_ms;
            }
        }

        let bests = &mut lifetime.personal_bests;
        if session.total_time_ms > 0 {
            let record = BestRecord {
                id: session.session_id.clone(),
                value: session.total_time_ms as f64,
                date: session.completed_at.unwrap_or_else(Utc::now),
                round_type: session.round_type.clone(),
            };
            if bests
                .fastest_round
                .as_ref()
                .is_none_or(|b| record.value < b.value)
            {
                bests.fastest_round = Some(record);
            }
        }
        for task in session.tasks.iter().filter(|t| t.success) {
            if task.time_ms > 0
                && bests
                    .fastest_task
                    .as_ref()
                    .is_none_or(|b| (task.time_ms as f64) < b.value)
            {
                bests.fastest_task = Some(BestRecord {
                    id: task.task_id.clone(),
                    value: task.time_ms as f64,
                    date: task.completed_at,
                    round_type: session.round_type.clone(),
                });
            }
            if bests
                .best_efficiency
                .as_ref()
                .is_none_or(|b| task.efficiency > b.value)
            {
                bests.best_efficiency = Some(BestRecord {
                    id: task.task_id.clone(),
                    value: task.efficiency,
                    date: task.completed_at,
                    round_type: session.round_type.clone(),
                });
            }
        }
    }

    fn check_achievements(&mut self, session: &SessionStats) {
        match self.data.lifetime.total_rounds {
            1 => self.unlock("first-steps", "First Steps", "Complete your first round"),
            10 => self.unlock("dedicated", "Dedicated", "Complete 10 rounds"),
            100 => self.unlock("expert", "Expert", "Complete 100 rounds"),
            _ => {}
        }
        if session.avg_efficiency >= 100.0 {
            self.unlock(
                "optimal-path",
                "Optimal Path",
                "Achieve 100% efficiency on a round",
            );
        }
        if session.tasks_completed == session.tasks_attempted
            && session.tasks_attempted > 0
            && session.avg_efficiency >= 95.0
        {
            self.unlock(
                "flawless-victory",
                "Flawless Victory",
                "Complete a round with 95%+ efficiency",
            );
        }
    }

    fn unlock(&mut self, id: &str, name: &str, description: &str) {
        if self.data.achievements.iter().any(|a| a.id == id) {
            return;
        }
        info!(target: "stats.store", achievement = id, "achievement_unlocked");
        self.data.achievements.push(Achievement {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            unlocked_at: Utc::now(),
        });
    }

    pub fn lifetime(&self) -> &LifetimeStats {
        &self.data.lifetime
    }

    pub fn recent_sessions(&self, count: usize) -> &[SessionStats] {
        let start = self.data.sessions.len().saturating_sub(count);
        &self.data.sessions[start..]
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.data.achievements
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.data.preferences = preferences;
    }

    /// Whole-document JSON export.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Per-category CSV export of the lifetime aggregates.
    pub fn export_csv(&self) -> String {
        let mut out = String::from("Category,Tasks Completed,Avg Time (ms),Avg Efficiency\n");
        for (category, stats) in &self.data.lifetime.by_category {
            out.push_str(&format!(
                "{category},{},{},{:.1}\n",
                stats.tasks_completed, stats.avg_time_ms, stats.avg_efficiency
            ));
        }
        out
    }
}
