//! Procedural task generation from the literary corpus.
//!
//! Every builder computes cursor targets and highlight spans by position-aware
//! word search, so the published `optimal_keys` genuinely solve the task they
//! describe. Targets for `f`/`t` tasks are restricted to characters whose
//! first occurrence (searching from column one, the way `f` does) is the
//! intended landing spot.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::corpus::{self, SOURCES};
use crate::task::{RoundType, Task, TaskCategory, key_count};

/// Tasks per category in every round.
const DISTRIBUTION: [(TaskCategory, usize); 6] = [
    (TaskCategory::Motion, 6),
    (TaskCategory::Delete, 6),
    (TaskCategory::Change, 6),
    (TaskCategory::Insert, 6),
    (TaskCategory::Visual, 3),
    (TaskCategory::Complex, 3),
];

const REPLACEMENTS: [&str; 5] = ["new", "changed", "updated", "modified", "different"];
const INSERTIONS: [&str; 5] = ["very", "quite", "rather", "extremely", "somewhat"];

/// `(char_start, word)` for each whitespace-separated word.
fn word_positions(sentence: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    for (i, c) in sentence.chars().enumerate() {
        if c == ' ' {
            if !current.is_empty() {
                out.push((start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                start = i;
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        out.push((start, current));
    }
    out
}

/// Word starts reachable by `f{first char}` from column zero: the first
/// occurrence of the character at column one or later is the word start
/// itself.
fn find_targets(sentence: &str) -> Vec<(usize, char)> {
    let chars: Vec<char> = sentence.chars().collect();
    word_positions(sentence)
        .into_iter()
        .skip(1)
        .filter_map(|(start, word)| {
            let target = word.chars().next()?;
            let first = chars.iter().skip(1).position(|&c| c == target)? + 1;
            (first == start).then_some((start, target))
        })
        .collect()
}

fn remove_span(sentence: &str, start: usize, end: usize) -> String {
    sentence
        .chars()
        .enumerate()
        .filter(|(i, _)| *i < start || *i >= end)
        .map(|(_, c)| c)
        .collect()
}

fn replace_span(sentence: &str, start: usize, end: usize, replacement: &str) -> String {
    let chars: Vec<char> = sentence.chars().collect();
    let mut out: String = chars[..start].iter().collect();
    out.push_str(replacement);
    out.extend(&chars[end..]);
    out
}

/// Seeded generator over the public-domain corpus.
pub struct TaskGenerator {
    rng: SmallRng,
}

impl Default for TaskGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Reproducible generator; identical seeds yield identical rounds.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn attribution(&self) -> String {
        corpus::attribution()
    }

    fn sentence(&mut self) -> &'static str {
        let source = &SOURCES[self.rng.gen_range(0..SOURCES.len())];
        source.sentences[self.rng.gen_range(0..source.sentences.len())]
    }

    fn task_id(&mut self, category: TaskCategory, variant: &str) -> String {
        format!("gen-{category}-{variant}-{:08x}", self.rng.r#gen::<u32>())
    }

    fn base(category: TaskCategory, difficulty: u8, sentence: &str) -> Task {
        Task {
            id: String::new(),
            category,
            difficulty,
            initial: sentence.to_string(),
            desired: sentence.to_string(),
            cursor_start: 0,
            cursor_end: 0,
            highlight_start: 0,
            highlight_end: 0,
            optimal_keys: String::new(),
            optimal_count: 0,
            description: String::new(),
            hint: String::new(),
            tags: vec![category.as_str().to_string(), "procedural".to_string()],
        }
    }

    pub fn motion_task(&mut self, difficulty: u8) -> Task {
        let sentence = self.sentence();
        let words = word_positions(sentence);
        let total = sentence.chars().count();
        let mut task = Self::base(TaskCategory::Motion, difficulty, sentence);

        match difficulty {
            1 => {
                let mut variant = self.rng.gen_range(0..4);
                if variant == 1 && words[0].1.chars().count() < 2 {
                    // A one-letter first word makes `e` a zero-length hop.
                    variant = 0;
                }
                match variant {
                    0 => {
                        task.cursor_start = 0;
                        task.cursor_end = words[1].0;
                        task.optimal_keys = "w".to_string();
                        task.description = "Move to the next word".to_string();
                        task.hint = "Use 'w' to move to the start of the next word".to_string();
                        task.id = self.task_id(TaskCategory::Motion, "w");
                    }
                    1 => {
                        task.cursor_start = 0;
                        task.cursor_end = words[0].1.chars().count() - 1;
                        task.optimal_keys = "e".to_string();
                        task.description = "Move to the end of the word".to_string();
                        task.hint = "Use 'e' to move to the end of the current word".to_string();
                        task.id = self.task_id(TaskCategory::Motion, "e");
                    }
                    2 => {
                        task.cursor_start = 0;
                        task.cursor_end = total - 1;
                        task.optimal_keys = "$".to_string();
                        task.description = "Move to the end of the line".to_string();
                        task.hint = "Use '$' to move to the end of the line".to_string();
                        task.id = self.task_id(TaskCategory::Motion, "dollar");
                    }
                    _ => {
                        task.cursor_start = words[2].0;
                        task.cursor_end = words[1].0;
                        task.optimal_keys = "b".to_string();
                        task.description = "Move back to the previous word".to_string();
                        task.hint =
                            "Use 'b' to move back to the start of the previous word".to_string();
                        task.id = self.task_id(TaskCategory::Motion, "b");
                    }
                }
            }
            2 => {
                if self.rng.r#gen::<f32>() < 0.5 {
                    let wanted = 2 + self.rng.gen_range(0..2usize);
                    let count = wanted.min(words.len() - 1);
                    task.cursor_start = 0;
                    task.cursor_end = words[count].0;
                    task.optimal_keys = format!("{count}w");
                    task.description = format!("Move forward {count} words");
                    task.hint = format!("Use '{count}w' to move forward {count} words");
                    task.id = self.task_id(TaskCategory::Motion, "nw");
                } else if let Some(&(start, target)) =
                    find_targets(sentence).as_slice().choose(&mut self.rng)
                {
                    task.cursor_start = 0;
                    task.cursor_end = start;
                    task.optimal_keys = format!("f{target}");
                    task.description = format!("Find '{target}'");
                    task.hint = format!("Use 'f{target}' to jump to the next '{target}'");
                    task.id = self.task_id(TaskCategory::Motion, "f");
                } else {
                    task.cursor_start = 0;
                    task.cursor_end = total - 1;
                    task.optimal_keys = "$".to_string();
                    task.description = "Move to the end of the line".to_string();
                    task.hint = "Use '$' to move to the end of the line".to_string();
                    task.id = self.task_id(TaskCategory::Motion, "dollar");
                }
            }
            _ => {
                let targets: Vec<(usize, char)> = find_targets(sentence)
                    .into_iter()
                    .filter(|(start, _)| *start > 1)
                    .collect();
                if let Some(&(start, target)) = targets.as_slice().choose(&mut self.rng) {
                    task.cursor_start = 0;
                    task.cursor_end = start - 1;
                    task.optimal_keys = format!("t{target}");
                    task.description = format!("Move until '{target}'");
                    task.hint = format!("Use 't{target}' to stop just before '{target}'");
                    task.id = self.task_id(TaskCategory::Motion, "t");
                } else {
                    task.cursor_start = 0;
                    task.cursor_end = total - 1;
                    task.optimal_keys = "$".to_string();
                    task.description = "Move to the end of the line".to_string();
                    task.hint = "Use '$' to move to the end of the line".to_string();
                    task.id = self.task_id(TaskCategory::Motion, "dollar");
                }
            }
        }

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    pub fn delete_task(&mut self, difficulty: u8) -> Task {
        let sentence = self.sentence();
        let words = word_positions(sentence);
        let mut task = Self::base(TaskCategory::Delete, difficulty, sentence);

        match difficulty {
            1 => {
                let idx = self.rng.gen_range(0..words.len() - 1);
                let (start, word) = &words[idx];
                let end = start + word.chars().count() + 1;
                task.desired = remove_span(sentence, *start, end);
                task.cursor_start = *start;
                task.highlight_start = *start;
                task.highlight_end = end;
                task.optimal_keys = "dw".to_string();
                task.description = "Delete the word".to_string();
                task.hint = "Use 'dw' to delete the word under the cursor".to_string();
                task.id = self.task_id(TaskCategory::Delete, "dw");
            }
            2 => {
                let idx = self.rng.gen_range(0..words.len());
                let (start, word) = &words[idx];
                let len = word.chars().count();
                let (span_start, span_end) = if idx == words.len() - 1 {
                    (start - 1, start + len)
                } else {
                    (*start, start + len + 1)
                };
                task.desired = remove_span(sentence, span_start, span_end);
                task.cursor_start = start + len / 2;
                task.highlight_start = span_start;
                task.highlight_end = span_end;
                task.optimal_keys = "daw".to_string();
                task.description = "Delete a word with its spacing".to_string();
                task.hint = "Use 'daw' to delete the word and its surrounding space".to_string();
                task.id = self.task_id(TaskCategory::Delete, "daw");
            }
            _ => {
                if let Some(&(start, target)) =
                    find_targets(sentence).as_slice().choose(&mut self.rng)
                {
                    task.desired = sentence.chars().skip(start).collect();
                    task.cursor_start = 0;
                    task.highlight_start = 0;
                    task.highlight_end = start;
                    task.optimal_keys = format!("dt{target}");
                    task.description = format!("Delete until '{target}'");
                    task.hint = format!("Use 'dt{target}' to delete up to '{target}'");
                    task.id = self.task_id(TaskCategory::Delete, "dt");
                } else {
                    let (start, word) = &words[0];
                    let end = start + word.chars().count() + 1;
                    task.desired = remove_span(sentence, *start, end);
                    task.cursor_start = *start;
                    task.highlight_start = *start;
                    task.highlight_end = end;
                    task.optimal_keys = "dw".to_string();
                    task.description = "Delete the word".to_string();
                    task.hint = "Use 'dw' to delete the word under the cursor".to_string();
                    task.id = self.task_id(TaskCategory::Delete, "dw");
                }
            }
        }

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    pub fn change_task(&mut self, difficulty: u8) -> Task {
        let sentence = self.sentence();
        let words = word_positions(sentence);
        let replacement = REPLACEMENTS[self.rng.gen_range(0..REPLACEMENTS.len())];
        let mut task = Self::base(TaskCategory::Change, difficulty, sentence);

        match difficulty {
            1 => {
                // `cw` rides the word-end motion, so one-letter words would
                // reach into the following word; skip them.
                let candidates: Vec<usize> = (0..words.len())
                    .filter(|&i| words[i].1.chars().count() >= 2)
                    .collect();
                let idx = candidates[self.rng.gen_range(0..candidates.len())];
                let (start, word) = &words[idx];
                let end = start + word.chars().count();
                task.desired = replace_span(sentence, *start, end, replacement);
                task.cursor_start = *start;
                task.highlight_start = *start;
                task.highlight_end = end;
                task.optimal_keys = format!("cw{replacement}<ESC>");
                task.description = format!("Change the word to '{replacement}'");
                task.hint = "Use 'cw', type the new word, press ESC".to_string();
                task.id = self.task_id(TaskCategory::Change, "cw");
            }
            2 => {
                let idx = self.rng.gen_range(0..words.len());
                let (start, word) = &words[idx];
                let len = word.chars().count();
                task.desired = replace_span(sentence, *start, start + len, replacement);
                task.cursor_start = start + len / 2;
                task.highlight_start = *start;
                task.highlight_end = start + len;
                task.optimal_keys = format!("ciw{replacement}<ESC>");
                task.description = format!("Change the inner word to '{replacement}'");
                task.hint = "Use 'ciw' to change the word from anywhere inside it".to_string();
                task.id = self.task_id(TaskCategory::Change, "ciw");
            }
            _ => {
                task.desired = replacement.to_string();
                task.cursor_start = 0;
                task.highlight_start = 0;
                task.highlight_end = sentence.chars().count();
                task.optimal_keys = format!("cc{replacement}<ESC>");
                task.description = "Change the entire line".to_string();
                task.hint = "Use 'cc' to change the whole line".to_string();
                task.id = self.task_id(TaskCategory::Change, "cc");
            }
        }

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    pub fn insert_task(&mut self, difficulty: u8) -> Task {
        let sentence = self.sentence();
        let words = word_positions(sentence);
        let insertion = INSERTIONS[self.rng.gen_range(0..INSERTIONS.len())];
        let mut task = Self::base(TaskCategory::Insert, difficulty, sentence);

        match difficulty {
            1 => {
                let pos = words[1].0;
                let head: String = sentence.chars().take(pos).collect();
                let tail: String = sentence.chars().skip(pos).collect();
                task.desired = format!("{head}{insertion} {tail}");
                task.cursor_start = pos;
                task.optimal_keys = format!("i{insertion} <ESC>");
                task.description = format!("Insert '{insertion}' before the cursor");
                task.hint = "Use 'i' to insert before the cursor".to_string();
                task.id = self.task_id(TaskCategory::Insert, "i");
            }
            2 => {
                task.desired = format!("{sentence} {insertion}");
                task.cursor_start = 0;
                task.optimal_keys = format!("A {insertion}<ESC>");
                task.description = "Append at the end of the line".to_string();
                task.hint = "Use 'A' to append at the end of the line".to_string();
                task.id = self.task_id(TaskCategory::Insert, "A");
            }
            _ => {
                task.desired = format!("{sentence}\n{insertion}");
                task.cursor_start = 0;
                task.optimal_keys = format!("o{insertion}<ESC>");
                task.description = "Open a new line below".to_string();
                task.hint = "Use 'o' to open a line below and start typing".to_string();
                task.id = self.task_id(TaskCategory::Insert, "o");
            }
        }

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    pub fn visual_task(&mut self, difficulty: u8) -> Task {
        let sentence = self.sentence();
        let words = word_positions(sentence);
        let mut task = Self::base(TaskCategory::Visual, difficulty.max(2), sentence);

        let idx = self.rng.gen_range(0..words.len());
        let (start, word) = &words[idx];
        let len = word.chars().count();
        let (span_start, span_end) = if idx == words.len() - 1 {
            (start - 1, start + len)
        } else {
            (*start, start + len + 1)
        };
        task.desired = remove_span(sentence, span_start, span_end);
        task.cursor_start = *start;
        task.highlight_start = span_start;
        task.highlight_end = span_end;
        task.optimal_keys = "viwd".to_string();
        task.description = "Select the word and delete it".to_string();
        task.hint = "Use 'viw' to select the word, then 'd' to delete".to_string();
        task.id = self.task_id(TaskCategory::Visual, "viwd");

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    pub fn complex_task(&mut self, difficulty: u8) -> Task {
        // Identical first words would make the swap a no-op.
        let mut sentence = self.sentence();
        loop {
            let words = word_positions(sentence);
            if words[0].1 != words[1].1 {
                break;
            }
            sentence = self.sentence();
        }
        let words = word_positions(sentence);
        let mut task = Self::base(TaskCategory::Complex, difficulty.max(3), sentence);

        let mut swapped: Vec<&str> = words.iter().map(|(_, w)| w.as_str()).collect();
        swapped.swap(0, 1);
        task.desired = swapped.join(" ");
        task.cursor_start = 0;
        task.optimal_keys = "dwwP".to_string();
        task.description = "Swap the first two words".to_string();
        task.hint = "Delete the first word, move to the next, paste before it".to_string();
        task.id = self.task_id(TaskCategory::Complex, "swap");

        task.optimal_count = key_count(&task.optimal_keys);
        task
    }

    /// Generate and shuffle the full 30-task round for a round type.
    pub fn round(&mut self, round_type: RoundType) -> Vec<Task> {
        let (min_diff, max_diff) = round_type.difficulty_range();
        let mut tasks = Vec::new();

        for (category, count) in DISTRIBUTION {
            for _ in 0..count {
                let difficulty = if max_diff > min_diff {
                    min_diff + self.rng.gen_range(0..=(max_diff - min_diff))
                } else {
                    min_diff
                };
                let task = match category {
                    TaskCategory::Motion => self.motion_task(difficulty),
                    TaskCategory::Delete => self.delete_task(difficulty),
                    TaskCategory::Change => self.change_task(difficulty),
                    TaskCategory::Insert => self.insert_task(difficulty),
                    TaskCategory::Visual => self.visual_task(difficulty),
                    TaskCategory::Complex => self.complex_task(difficulty),
                };
                tasks.push(task);
            }
        }

        tasks.shuffle(&mut self.rng);
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_positions_reports_char_starts() {
        assert_eq!(
            word_positions("one two three"),
            vec![
                (0, "one".to_string()),
                (4, "two".to_string()),
                (8, "three".to_string())
            ]
        );
    }

    #[test]
    fn find_targets_respect_first_occurrence() {
        // 'w' first occurs at the start of "was"; 't' of "the" first occurs
        // inside "It".
        let targets = find_targets("It was the best");
        assert!(targets.contains(&(3, 'w')));
        assert!(!targets.iter().any(|(_, c)| *c == 't'));
    }

    #[test]
    fn round_has_fixed_distribution() {
        let mut generator = TaskGenerator::with_seed(7);
        let tasks = generator.round(RoundType::Beginner);
        assert_eq!(tasks.len(), 30);
        for (category, expected) in DISTRIBUTION {
            let got = tasks.iter().filter(|t| t.category == category).count();
            assert_eq!(got, expected, "{category}");
        }
        assert!(tasks.iter().all(|t| t.difficulty >= 1));
    }

    #[test]
    fn seeded_rounds_are_reproducible() {
        let a = TaskGenerator::with_seed(42).round(RoundType::Mixed);
        let b = TaskGenerator::with_seed(42).round(RoundType::Mixed);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.initial, y.initial);
            assert_eq!(x.desired, y.desired);
            assert_eq!(x.cursor_start, y.cursor_start);
            assert_eq!(x.optimal_keys, y.optimal_keys);
        }
    }

    #[test]
    fn difficulty_band_respected() {
        let mut generator = TaskGenerator::with_seed(11);
        for task in generator.round(RoundType::Expert) {
            // Visual floors at 2 and complex at 3 regardless of the band.
            assert!(task.difficulty >= 2, "{} too easy", task.id);
            assert!(task.difficulty <= 4, "{} too hard", task.id);
        }
    }

    #[test]
    fn motion_tasks_have_reachable_targets() {
        let mut generator = TaskGenerator::with_seed(3);
        for _ in 0..50 {
            let task = generator.motion_task(1);
            assert!(task.is_motion_task(), "{}", task.id);
            assert!(task.cursor_end > 0, "{}", task.id);
            assert!(task.cursor_end < task.initial.chars().count());
        }
    }

    #[test]
    fn optimal_count_matches_key_string() {
        let mut generator = TaskGenerator::with_seed(5);
        for task in generator.round(RoundType::Mixed) {
            assert_eq!(task.optimal_count, key_count(&task.optimal_keys), "{}", task.id);
        }
    }
}
