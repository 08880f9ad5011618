//! Cursor motions.
//!
//! Every motion is a free function over `&mut Buffer` returning whether the
//! cursor moved. Motions never touch buffer content; operators layered above
//! combine them with deletions and yanks. Word motions partition characters
//! into three classes — whitespace, word (letter/digit/underscore) and
//! punctuation — and treat a maximal run of one non-whitespace class as a
//! word.

use crate::{Buffer, Mode};

/// Character classification for word motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

/// Classify a character for word-motion purposes.
pub fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

fn runes(buf: &Buffer) -> Vec<char> {
    buf.current_line().chars().collect()
}

/// `h`: move left, bounded by column zero.
pub fn left(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if buf.cursor_x > 0 {
            buf.cursor_x -= 1;
            moved = true;
        }
    }
    moved
}

/// `l`: move right, bounded by the mode-specific line end.
pub fn right(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    let len = buf.line_len(buf.cursor_y);
    let max_x = if buf.mode() == Mode::Insert {
        len
    } else {
        len.saturating_sub(1)
    };
    for _ in 0..count {
        if buf.cursor_x < max_x {
            buf.cursor_x += 1;
            moved = true;
        }
    }
    moved
}

/// `k`: move up, clamping the column to the destination line.
pub fn up(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if buf.cursor_y > 0 {
            buf.cursor_y -= 1;
            moved = true;
        }
    }
    buf.clamp_cursor();
    moved
}

/// `j`: move down, clamping the column to the destination line.
pub fn down(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if buf.cursor_y + 1 < buf.line_count() {
            buf.cursor_y += 1;
            moved = true;
        }
    }
    buf.clamp_cursor();
    moved
}

/// `0`: column zero.
pub fn line_start(buf: &mut Buffer) -> bool {
    if buf.cursor_x != 0 {
        buf.cursor_x = 0;
        true
    } else {
        false
    }
}

/// `$`: last character in Normal mode, one past it in Insert mode.
pub fn line_end(buf: &mut Buffer) -> bool {
    let len = buf.line_len(buf.cursor_y);
    let new_x = if buf.mode() == Mode::Insert {
        len
    } else {
        len.saturating_sub(1)
    };
    if buf.cursor_x != new_x {
        buf.cursor_x = new_x;
        true
    } else {
        false
    }
}

/// `^`: first non-whitespace column, falling back to column zero.
pub fn first_non_blank(buf: &mut Buffer) -> bool {
    let line = runes(buf);
    for (i, c) in line.iter().enumerate() {
        if !c.is_whitespace() {
            if buf.cursor_x != i {
                buf.cursor_x = i;
                return true;
            }
            return false;
        }
    }
    line_start(buf)
}

/// `w`: start of the next word, crossing line boundaries.
pub fn word_forward(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if word_forward_once(buf) {
            moved = true;
        }
    }
    moved
}

fn word_forward_once(buf: &mut Buffer) -> bool {
    let (start_x, start_y) = buf.cursor();
    let mut line = runes(buf);

    // Skip the run sharing the class under the cursor.
    if buf.cursor_x < line.len() {
        let class = classify(line[buf.cursor_x]);
        while buf.cursor_x < line.len() && classify(line[buf.cursor_x]) == class {
            buf.cursor_x += 1;
        }
    }
    // Then any whitespace.
    while buf.cursor_x < line.len() && line[buf.cursor_x].is_whitespace() {
        buf.cursor_x += 1;
    }
    // At end of line, continue on the next one past leading whitespace.
    if buf.cursor_x >= line.len() && buf.cursor_y + 1 < buf.line_count() {
        buf.cursor_y += 1;
        buf.cursor_x = 0;
        line = runes(buf);
        while buf.cursor_x < line.len() && line[buf.cursor_x].is_whitespace() {
            buf.cursor_x += 1;
        }
    }

    buf.clamp_cursor();
    buf.cursor() != (start_x, start_y)
}

/// `b`: start of the previous word, crossing line boundaries upward.
pub fn word_backward(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if word_backward_once(buf) {
            moved = true;
        }
    }
    moved
}

fn word_backward_once(buf: &mut Buffer) -> bool {
    let (start_x, start_y) = buf.cursor();

    if buf.cursor_x == 0 && buf.cursor_y > 0 {
        buf.cursor_y -= 1;
        buf.cursor_x = buf.line_len(buf.cursor_y);
    }

    let mut line = runes(buf);
    if buf.cursor_x > 0 {
        buf.cursor_x -= 1;
    }
    while buf.cursor_x > 0 && line.get(buf.cursor_x).is_some_and(|c| c.is_whitespace()) {
        buf.cursor_x -= 1;
    }
    // Wholly-blank prefix: keep climbing to the previous line.
    if buf.cursor_x == 0
        && line.first().is_some_and(|c| c.is_whitespace())
        && buf.cursor_y > 0
    {
        buf.cursor_y -= 1;
        line = runes(buf);
        buf.cursor_x = line.len().saturating_sub(1);
        while buf.cursor_x > 0 && line[buf.cursor_x].is_whitespace() {
            buf.cursor_x -= 1;
        }
    }

    if let Some(&c) = line.get(buf.cursor_x) {
        let class = classify(c);
        while buf.cursor_x > 0 && classify(line[buf.cursor_x - 1]) == class {
            buf.cursor_x -= 1;
        }
    }

    buf.cursor() != (start_x, start_y)
}

/// `e`: end of the current or next word.
pub fn word_end(buf: &mut Buffer, count: usize) -> bool {
    let mut moved = false;
    for _ in 0..count {
        if word_end_once(buf) {
            moved = true;
        }
    }
    moved
}

fn word_end_once(buf: &mut Buffer) -> bool {
    let (start_x, start_y) = buf.cursor();
    let mut line = runes(buf);

    // Always advance at least one character first.
    if buf.cursor_x + 1 < line.len() {
        buf.cursor_x += 1;
    } else if buf.cursor_y + 1 < buf.line_count() {
        buf.cursor_y += 1;
        buf.cursor_x = 0;
        line = runes(buf);
    }

    while buf.cursor_x < line.len() && line[buf.cursor_x].is_whitespace() {
        buf.cursor_x += 1;
    }
    if buf.cursor_x >= line.len() && buf.cursor_y + 1 < buf.line_count() {
        buf.cursor_y += 1;
        buf.cursor_x = 0;
        line = runes(buf);
        while buf.cursor_x < line.len() && line[buf.cursor_x].is_whitespace() {
            buf.cursor_x += 1;
        }
    }

    if let Some(&c) = line.get(buf.cursor_x) {
        let class = classify(c);
        while buf.cursor_x + 1 < line.len() && classify(line[buf.cursor_x + 1]) == class {
            buf.cursor_x += 1;
        }
    }

    buf.clamp_cursor();
    buf.cursor() != (start_x, start_y)
}

/// `f`/`t`: the count-th occurrence of `target` to the right on the current
/// line. With `before` the cursor stops one column short (`t`). The cursor is
/// untouched when the character is absent.
pub fn find_forward(buf: &mut Buffer, target: char, count: usize, before: bool) -> bool {
    let line = runes(buf);
    let mut found = 0;
    for i in buf.cursor_x + 1..line.len() {
        if line[i] == target {
            found += 1;
            if found == count {
                buf.cursor_x = if before { i - 1 } else { i };
                return true;
            }
        }
    }
    false
}

/// `F`/`T`: like [`find_forward`] but scanning left; `after` stops one column
/// past the target in the travel direction (`T`).
pub fn find_backward(buf: &mut Buffer, target: char, count: usize, after: bool) -> bool {
    let line = runes(buf);
    let mut found = 0;
    for i in (0..buf.cursor_x.min(line.len())).rev() {
        if line[i] == target {
            found += 1;
            if found == count {
                buf.cursor_x = if after { i + 1 } else { i };
                return true;
            }
        }
    }
    false
}

/// `gg`: origin of the buffer.
pub fn buffer_start(buf: &mut Buffer) -> bool {
    if buf.cursor() != (0, 0) {
        buf.cursor_x = 0;
        buf.cursor_y = 0;
        true
    } else {
        false
    }
}

/// `G`: first non-blank of the last line.
pub fn buffer_end(buf: &mut Buffer) -> bool {
    let last = buf.line_count().saturating_sub(1);
    if buf.cursor_y != last {
        buf.cursor_y = last;
        first_non_blank(buf);
        buf.clamp_cursor();
        true
    } else {
        false
    }
}

/// `{n}G`: first non-blank of the 1-based line `n`, clamped to the buffer.
pub fn to_line(buf: &mut Buffer, line_num: usize) -> bool {
    let target = line_num
        .saturating_sub(1)
        .min(buf.line_count().saturating_sub(1));
    if buf.cursor_y != target {
        buf.cursor_y = target;
        first_non_blank(buf);
        buf.clamp_cursor();
        true
    } else {
        false
    }
}

const BRACKET_PAIRS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

/// `%`: jump to the bracket matching the one under the cursor, tracking
/// nesting depth across lines. Returns false when the cursor is not on a
/// bracket or no match exists.
pub fn matching_bracket(buf: &mut Buffer) -> bool {
    let Some(current) = buf.char_under_cursor() else {
        return false;
    };
    let Some((open, close, forward)) = BRACKET_PAIRS.iter().find_map(|&(o, c)| {
        if current == o {
            Some((o, c, true))
        } else if current == c {
            Some((o, c, false))
        } else {
            None
        }
    }) else {
        return false;
    };

    let mut depth: usize = 1;
    if forward {
        for y in buf.cursor_y..buf.line_count() {
            let line: Vec<char> = buf.line(y).unwrap_or("").chars().collect();
            let from = if y == buf.cursor_y { buf.cursor_x + 1 } else { 0 };
            for (x, &c) in line.iter().enumerate().skip(from) {
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        buf.cursor_y = y;
                        buf.cursor_x = x;
                        return true;
                    }
                }
            }
        }
    } else {
        for y in (0..=buf.cursor_y).rev() {
            let line: Vec<char> = buf.line(y).unwrap_or("").chars().collect();
            let upto = if y == buf.cursor_y {
                buf.cursor_x
            } else {
                line.len()
            };
            for x in (0..upto.min(line.len())).rev() {
                let c = line[x];
                if c == close {
                    depth += 1;
                } else if c == open {
                    depth -= 1;
                    if depth == 0 {
                        buf.cursor_y = y;
                        buf.cursor_x = x;
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf_at(text: &str, x: usize, y: usize) -> Buffer {
        let mut b = Buffer::new(text);
        b.set_cursor(x, y);
        b
    }

    #[test]
    fn horizontal_motion_clamps_per_mode() {
        let mut b = Buffer::new("abc");
        assert!(right(&mut b, 10));
        assert_eq!(b.cursor(), (2, 0));
        b.set_mode(Mode::Insert);
        assert!(right(&mut b, 10));
        assert_eq!(b.cursor(), (3, 0));
        assert!(left(&mut b, 2));
        assert_eq!(b.cursor(), (1, 0));
        assert!(!left(&mut b, 0));
    }

    #[test]
    fn vertical_motion_clamps_column() {
        let mut b = buf_at("a long first line\nxy\nanother long line", 10, 0);
        down(&mut b, 1);
        assert_eq!(b.cursor(), (1, 1)); // clamped onto "xy"
        down(&mut b, 1);
        assert_eq!(b.cursor(), (1, 2));
        up(&mut b, 5);
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn first_non_blank_falls_back_to_zero() {
        let mut b = buf_at("   hello", 7, 0);
        assert!(first_non_blank(&mut b));
        assert_eq!(b.cursor(), (3, 0));

        let mut blank = buf_at("    ", 3, 0);
        assert!(first_non_blank(&mut blank));
        assert_eq!(blank.cursor(), (0, 0));
    }

    #[test]
    fn word_forward_walks_words_and_lines() {
        let mut b = Buffer::new("one two three\n  four");
        assert!(word_forward(&mut b, 1));
        assert_eq!(b.cursor(), (4, 0));
        assert!(word_forward(&mut b, 1));
        assert_eq!(b.cursor(), (8, 0));
        assert!(word_forward(&mut b, 1));
        assert_eq!(b.cursor(), (2, 1)); // lands past the indent on "four"
    }

    #[test]
    fn word_forward_treats_punctuation_as_word() {
        let mut b = Buffer::new("foo, bar");
        assert!(word_forward(&mut b, 1));
        assert_eq!(b.cursor(), (3, 0)); // comma is its own word
        assert!(word_forward(&mut b, 1));
        assert_eq!(b.cursor(), (5, 0));
    }

    #[test]
    fn word_backward_walks_words_and_lines() {
        let mut b = buf_at("one two\nthree four", 6, 1);
        assert!(word_backward(&mut b, 1));
        assert_eq!(b.cursor(), (0, 1));
        assert!(word_backward(&mut b, 1));
        assert_eq!(b.cursor(), (4, 0));
        assert!(word_backward(&mut b, 2));
        assert_eq!(b.cursor(), (0, 0));
        assert!(!word_backward(&mut b, 1));
    }

    #[test]
    fn word_end_stops_on_last_char_of_word() {
        let mut b = Buffer::new("one two three");
        assert!(word_end(&mut b, 1));
        assert_eq!(b.cursor(), (2, 0));
        assert!(word_end(&mut b, 1));
        assert_eq!(b.cursor(), (6, 0));
        assert!(word_end(&mut b, 2));
        assert_eq!(b.cursor(), (12, 0));
    }

    #[test]
    fn find_forward_counts_occurrences() {
        let mut b = Buffer::new("abcabcabc");
        assert!(find_forward(&mut b, 'c', 2, false));
        assert_eq!(b.cursor(), (5, 0));
        assert!(find_forward(&mut b, 'b', 1, true));
        assert_eq!(b.cursor(), (6, 0)); // one before the 'b' at 7
    }

    #[test]
    fn find_miss_leaves_cursor_unchanged() {
        let mut b = buf_at("find the letter", 3, 0);
        assert!(!find_forward(&mut b, 'z', 1, false));
        assert_eq!(b.cursor(), (3, 0));
        assert!(!find_backward(&mut b, 'z', 1, false));
        assert_eq!(b.cursor(), (3, 0));
    }

    #[test]
    fn find_backward_lands_on_and_after() {
        let mut b = buf_at("abcabc", 5, 0);
        assert!(find_backward(&mut b, 'a', 1, false));
        assert_eq!(b.cursor(), (3, 0));
        assert!(find_backward(&mut b, 'a', 1, true));
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn buffer_motions_land_on_first_non_blank() {
        let mut b = buf_at("one\n  two\n    three", 2, 0);
        assert!(buffer_end(&mut b));
        assert_eq!(b.cursor(), (4, 2));
        assert!(to_line(&mut b, 2));
        assert_eq!(b.cursor(), (2, 1));
        assert!(buffer_start(&mut b));
        assert_eq!(b.cursor(), (0, 0));
        assert!(to_line(&mut b, 99));
        assert_eq!(b.cursor(), (4, 2));
    }

    #[test]
    fn matching_bracket_tracks_depth() {
        let mut b = Buffer::new("fn call(a, (b), c)");
        b.set_cursor(7, 0);
        assert!(matching_bracket(&mut b));
        assert_eq!(b.cursor(), (17, 0));
        assert!(matching_bracket(&mut b));
        assert_eq!(b.cursor(), (7, 0));
    }

    #[test]
    fn matching_bracket_across_lines() {
        let mut b = Buffer::new("{\n  inner\n}");
        assert!(matching_bracket(&mut b));
        assert_eq!(b.cursor(), (0, 2));
        assert!(matching_bracket(&mut b));
        assert_eq!(b.cursor(), (0, 0));
    }

    #[test]
    fn matching_bracket_requires_bracket_under_cursor() {
        let mut b = Buffer::new("plain text");
        assert!(!matching_bracket(&mut b));
        let mut unmatched = Buffer::new("(open");
        assert!(!matching_bracket(&mut unmatched));
        assert_eq!(unmatched.cursor(), (0, 0));
    }
}
