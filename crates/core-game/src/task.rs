//! Task model: an immutable editing challenge.

use serde::{Deserialize, Serialize};

/// The kind of vim skill a task trains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Motion,
    Delete,
    Change,
    Insert,
    Visual,
    Complex,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Motion,
        TaskCategory::Delete,
        TaskCategory::Change,
        TaskCategory::Insert,
        TaskCategory::Visual,
        TaskCategory::Complex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Motion => "motion",
            TaskCategory::Delete => "delete",
            TaskCategory::Change => "change",
            TaskCategory::Insert => "insert",
            TaskCategory::Visual => "visual",
            TaskCategory::Complex => "complex",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round types select the difficulty band; the per-category distribution is
/// the same for every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundType {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Mixed,
}

impl RoundType {
    pub const ALL: [RoundType; 5] = [
        RoundType::Beginner,
        RoundType::Intermediate,
        RoundType::Advanced,
        RoundType::Expert,
        RoundType::Mixed,
    ];

    /// Parse a wire-level round name; unknown names fall back to beginner.
    pub fn parse(name: &str) -> RoundType {
        match name {
            "intermediate" => RoundType::Intermediate,
            "advanced" => RoundType::Advanced,
            "expert" => RoundType::Expert,
            "mixed" => RoundType::Mixed,
            _ => RoundType::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Beginner => "beginner",
            RoundType::Intermediate => "intermediate",
            RoundType::Advanced => "advanced",
            RoundType::Expert => "expert",
            RoundType::Mixed => "mixed",
        }
    }

    /// Inclusive difficulty band generated for this round.
    pub fn difficulty_range(&self) -> (u8, u8) {
        match self {
            RoundType::Beginner => (1, 1),
            RoundType::Intermediate => (1, 2),
            RoundType::Advanced => (2, 3),
            RoundType::Expert => (3, 4),
            RoundType::Mixed => (1, 4),
        }
    }
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One training challenge. Values are immutable once generated; the session
/// engine never mutates its task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub category: TaskCategory,
    pub difficulty: u8,
    pub initial: String,
    pub desired: String,
    pub cursor_start: usize,
    /// Target cursor index; meaningful only when `initial == desired`.
    #[serde(default)]
    pub cursor_end: usize,
    /// Span of `initial` marking the characters to delete or change.
    #[serde(default)]
    pub highlight_start: usize,
    #[serde(default)]
    pub highlight_end: usize,
    pub optimal_keys: String,
    pub optimal_count: usize,
    pub description: String,
    pub hint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Task {
    /// Pure cursor-movement tasks are graded on cursor position, not text.
    pub fn is_motion_task(&self) -> bool {
        self.initial == self.desired && self.cursor_end > 0
    }

    pub fn has_highlight(&self) -> bool {
        self.highlight_end > self.highlight_start
    }

    /// The slice of `initial` a renderer should highlight, in characters.
    pub fn highlighted_text(&self) -> String {
        if !self.has_highlight() {
            return String::new();
        }
        self.initial
            .chars()
            .skip(self.highlight_start)
            .take(self.highlight_end - self.highlight_start)
            .collect()
    }
}

/// Number of keys in an optimal-keys display string. The `<ESC>` token counts
/// as a single key; everything else is one key per character.
pub fn key_count(optimal: &str) -> usize {
    let mut rest = optimal;
    let mut count = 0;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("<ESC>") {
            rest = stripped;
        } else {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
        count += 1;
    }
    count
}
