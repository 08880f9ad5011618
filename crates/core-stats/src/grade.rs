//! Letter grading for a finished round.

use crate::SessionStats;

/// Average per-task time that anchors the S grade.
const TARGET_TIME_MS: i64 = 8_000;

/// Letter ranking derived from completion rate, efficiency and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching row of the grade table wins.
pub fn grade_for(stats: &SessionStats) -> Grade {
    if stats.tasks_attempted == 0 {
        return Grade::F;
    }
    let completion = stats.tasks_completed as f64 / stats.tasks_attempted as f64;
    let efficiency = stats.avg_efficiency;
    let avg_time = stats.avg_time_ms;

    if completion == 1.0 && efficiency >= 95.0 && avg_time <= TARGET_TIME_MS {
        Grade::S
    } else if completion == 1.0
        && efficiency >= 85.0
        && avg_time <= (TARGET_TIME_MS as f64 * 1.2) as i64
    {
        Grade::A
    } else if completion >= 0.9 && efficiency >= 75.0 {
        Grade::B
    } else if completion >= 0.75 && efficiency >= 60.0 {
        Grade::C
    } else if completion >= 0.5 {
        Grade::D
    } else {
        Grade::F
    }
}
