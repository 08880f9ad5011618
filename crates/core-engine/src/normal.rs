//! Normal-mode command grammar.
//!
//! Commands follow `count? (operator motion-or-object | standalone)`. The
//! parser works on the whole pending string each pass: complete commands
//! execute and clear it, prefixes that can still grow (`2`, `d`, `d2`, `fi`…)
//! are kept verbatim, and sequences the grammar rejects are dropped.
//!
//! Counts multiply across an operator: `2d3w` operates on six words. A
//! leading `0` is never a count — it is the line-start motion, including in
//! operator position (`d0`).

use crate::{Engine, FindDirection, object};
use core_text::{Mode, motion};

/// Counts are clamped here; anything larger is a typo, not an intent.
const COUNT_MAX: usize = 999_999;

/// Split `chars` into a leading count and the rest. Returns `(count, rest)`
/// with `count == 1` when no digits lead.
fn split_count(chars: &[char]) -> (usize, &[char]) {
    if chars.first().is_none_or(|c| !c.is_ascii_digit() || *c == '0') {
        return (1, chars);
    }
    let digits = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    let count = chars[..digits]
        .iter()
        .fold(0usize, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(*c as usize - '0' as usize)
        })
        .clamp(1, COUNT_MAX);
    (count, &chars[digits..])
}

impl Engine {
    pub(crate) fn handle_normal(&mut self, keys: &str) -> (bool, String) {
        let chars: Vec<char> = keys.chars().collect();
        let (count, rest) = split_count(&chars);
        if rest.is_empty() {
            // Bare count so far; keep the digits pending.
            return (false, keys.to_string());
        }
        let rest_str: String = rest.iter().collect();
        let buf = &mut self.buffer;

        match rest_str.as_str() {
            // Mode changes. Entering insert snapshots so the whole insert run
            // undoes as one unit.
            "i" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                return (true, String::new());
            }
            "I" => {
                self.history.snapshot(buf);
                motion::first_non_blank(buf);
                buf.set_mode(Mode::Insert);
                return (true, String::new());
            }
            "a" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                motion::right(buf, 1);
                return (true, String::new());
            }
            "A" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                motion::line_end(buf);
                return (true, String::new());
            }
            "o" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                motion::line_end(buf);
                buf.insert("\n");
                return (true, String::new());
            }
            "O" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                motion::line_start(buf);
                buf.insert("\n");
                motion::up(buf, 1);
                return (true, String::new());
            }
            "v" => {
                buf.set_mode(Mode::Visual);
                return (true, String::new());
            }
            "V" => {
                buf.set_mode(Mode::VisualLine);
                return (true, String::new());
            }

            // Motions.
            "h" => {
                motion::left(buf, count);
                return (true, String::new());
            }
            "l" => {
                motion::right(buf, count);
                return (true, String::new());
            }
            "j" => {
                motion::down(buf, count);
                return (true, String::new());
            }
            "k" => {
                motion::up(buf, count);
                return (true, String::new());
            }
            "0" => {
                motion::line_start(buf);
                return (true, String::new());
            }
            "$" => {
                motion::line_end(buf);
                return (true, String::new());
            }
            "^" => {
                motion::first_non_blank(buf);
                return (true, String::new());
            }
            "w" => {
                motion::word_forward(buf, count);
                return (true, String::new());
            }
            "b" => {
                motion::word_backward(buf, count);
                return (true, String::new());
            }
            "e" => {
                motion::word_end(buf, count);
                return (true, String::new());
            }
            "gg" => {
                motion::buffer_start(buf);
                return (true, String::new());
            }
            "G" => {
                if count > 1 {
                    motion::to_line(buf, count);
                } else {
                    motion::buffer_end(buf);
                }
                return (true, String::new());
            }
            "%" => {
                motion::matching_bracket(buf);
                return (true, String::new());
            }
            ";" => {
                if let Some((target, dir)) = self.last_find {
                    match dir {
                        FindDirection::Forward => motion::find_forward(buf, target, count, false),
                        FindDirection::Backward => motion::find_backward(buf, target, count, false),
                    };
                }
                return (true, String::new());
            }
            "," => {
                if let Some((target, dir)) = self.last_find {
                    match dir {
                        FindDirection::Forward => motion::find_backward(buf, target, count, false),
                        FindDirection::Backward => motion::find_forward(buf, target, count, false),
                    };
                }
                return (true, String::new());
            }

            // Character deletes.
            "x" => {
                self.history.snapshot(buf);
                let deleted = buf.delete(count);
                buf.set_register(deleted);
                return (true, String::new());
            }
            "X" => {
                self.history.snapshot(buf);
                for _ in 0..count {
                    if buf.cursor().0 > 0 {
                        motion::left(buf, 1);
                        buf.delete(1);
                    }
                }
                return (true, String::new());
            }

            // Line operators.
            "dd" => {
                self.history.snapshot(buf);
                for _ in 0..count {
                    let deleted = buf.delete_line();
                    buf.set_register(format!("{deleted}\n"));
                }
                return (true, String::new());
            }
            "D" => {
                self.history.snapshot(buf);
                let deleted = buf.delete_to_eol();
                buf.set_register(deleted);
                return (true, String::new());
            }
            "cc" | "S" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                motion::line_start(buf);
                buf.delete_to_eol();
                return (true, String::new());
            }
            "C" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                buf.delete_to_eol();
                return (true, String::new());
            }
            "s" => {
                self.history.snapshot(buf);
                buf.set_mode(Mode::Insert);
                buf.delete(count);
                return (true, String::new());
            }
            "yy" | "Y" => {
                let line = buf.current_line().to_string();
                buf.set_register(format!("{line}\n"));
                return (true, String::new());
            }

            // Paste.
            "p" => {
                self.paste_after();
                return (true, String::new());
            }
            "P" => {
                self.paste_before();
                return (true, String::new());
            }

            // History.
            "u" => {
                self.history.undo(buf);
                return (true, String::new());
            }
            "\x12" => {
                self.history.redo(buf);
                return (true, String::new());
            }
            _ => {}
        }

        // Multi-key prefixes: find/replace targets and operators.
        match rest[0] {
            'f' | 'F' | 't' | 'T' if rest.len() >= 2 => {
                let target = rest[1];
                match rest[0] {
                    'f' => {
                        motion::find_forward(&mut self.buffer, target, count, false);
                        self.last_find = Some((target, FindDirection::Forward));
                    }
                    'F' => {
                        motion::find_backward(&mut self.buffer, target, count, false);
                        self.last_find = Some((target, FindDirection::Backward));
                    }
                    't' => {
                        motion::find_forward(&mut self.buffer, target, count, true);
                        self.last_find = Some((target, FindDirection::Forward));
                    }
                    _ => {
                        motion::find_backward(&mut self.buffer, target, count, true);
                        self.last_find = Some((target, FindDirection::Backward));
                    }
                }
                (true, rest[2..].iter().collect())
            }
            'r' if rest.len() >= 2 => {
                self.history.snapshot(&self.buffer);
                let replacement = rest[1];
                for i in 0..count {
                    self.buffer.replace_char(replacement);
                    if i + 1 < count {
                        motion::right(&mut self.buffer, 1);
                    }
                }
                (true, rest[2..].iter().collect())
            }
            'd' | 'c' | 'y' => {
                let motion_str: String = rest[1..].iter().collect();
                self.operator_pending(rest[0], &motion_str, count, keys)
            }
            // Prefixes that may still complete.
            'g' | 'f' | 'F' | 't' | 'T' | 'r' if rest.len() == 1 => (false, keys.to_string()),
            _ => (false, String::new()),
        }
    }

    /// Resolve the motion or text object following `d`/`c`/`y` and apply the
    /// operator over the resulting character range.
    fn operator_pending(
        &mut self,
        op: char,
        motion_str: &str,
        prefix_count: usize,
        full_keys: &str,
    ) -> (bool, String) {
        let m: Vec<char> = motion_str.chars().collect();
        let (post_count, m) = split_count(&m);
        let count = prefix_count.saturating_mul(post_count).clamp(1, COUNT_MAX);

        let Some(&head) = m.first() else {
            return (false, full_keys.to_string());
        };

        // Text objects.
        if head == 'i' || head == 'a' {
            if m.len() < 2 {
                return (false, full_keys.to_string());
            }
            let remaining: String = m[2..].iter().collect();
            return (self.apply_text_object(op, head == 'i', m[1]), remaining);
        }

        let (start_x, start_y) = self.buffer.cursor();
        let start_idx = self.buffer.cursor_index();
        let mut inclusive = false;
        let consumed;
        let moved;

        match head {
            'w' => {
                consumed = 1;
                // `cw` on a non-blank behaves like `ce`: the trailing
                // whitespace survives the change.
                if op == 'c' && self.buffer.char_under_cursor().is_some_and(|c| !c.is_whitespace())
                {
                    moved = motion::word_end(&mut self.buffer, count);
                    inclusive = true;
                } else {
                    moved = motion::word_forward(&mut self.buffer, count);
                }
            }
            'b' => {
                consumed = 1;
                moved = motion::word_backward(&mut self.buffer, count);
            }
            'e' => {
                consumed = 1;
                moved = motion::word_end(&mut self.buffer, count);
                inclusive = true;
            }
            '$' => {
                consumed = 1;
                motion::line_end(&mut self.buffer);
                inclusive = true;
                moved = true;
            }
            '0' => {
                consumed = 1;
                motion::line_start(&mut self.buffer);
                moved = true;
            }
            '^' => {
                consumed = 1;
                motion::first_non_blank(&mut self.buffer);
                moved = true;
            }
            'f' | 't' => {
                if m.len() < 2 {
                    return (false, full_keys.to_string());
                }
                consumed = 2;
                moved = motion::find_forward(&mut self.buffer, m[1], count, head == 't');
                inclusive = true;
            }
            'F' | 'T' => {
                if m.len() < 2 {
                    return (false, full_keys.to_string());
                }
                consumed = 2;
                moved = motion::find_backward(&mut self.buffer, m[1], count, head == 'T');
            }
            'G' => {
                consumed = 1;
                moved = if count > 1 {
                    motion::to_line(&mut self.buffer, count)
                } else {
                    motion::buffer_end(&mut self.buffer)
                };
            }
            'g' => {
                if m.len() < 2 {
                    return (false, full_keys.to_string());
                }
                if m[1] != 'g' {
                    return (false, String::new());
                }
                consumed = 2;
                moved = motion::buffer_start(&mut self.buffer);
            }
            _ => return (false, String::new()),
        }
        let remaining: String = m[consumed..].iter().collect();

        if !moved {
            self.buffer.set_cursor(start_x, start_y);
            return (true, remaining);
        }

        let mut end_idx = self.buffer.cursor_index();
        if inclusive {
            end_idx += 1;
        }
        let (lo, hi) = (start_idx.min(end_idx), start_idx.max(end_idx));
        if lo == hi {
            self.buffer.set_cursor(start_x, start_y);
            return (true, remaining);
        }

        match op {
            'd' => {
                self.history.snapshot(&self.buffer);
                self.buffer.set_cursor_index(lo);
                let deleted = self.buffer.delete(hi - lo);
                self.buffer.set_register(deleted);
            }
            'c' => {
                self.history.snapshot(&self.buffer);
                self.buffer.set_mode(Mode::Insert);
                self.buffer.set_cursor_index(lo);
                let deleted = self.buffer.delete(hi - lo);
                self.buffer.set_register(deleted);
            }
            _ => {
                let text: Vec<char> = self.buffer.text().chars().collect();
                let hi = hi.min(text.len());
                if lo < hi {
                    let yanked: String = text[lo..hi].iter().collect();
                    self.buffer.set_register(yanked);
                }
                self.buffer.set_cursor(start_x, start_y);
            }
        }
        (true, remaining)
    }

    /// Apply `d`/`c`/`y` over a resolved text object span. Consumes the object
    /// keys even when no object exists at the cursor.
    fn apply_text_object(&mut self, op: char, inner: bool, object_key: char) -> bool {
        let (start_x, start_y) = self.buffer.cursor();
        let Some((lo, hi)) = object::resolve(&self.buffer, inner, object_key) else {
            return true;
        };

        match op {
            'd' => {
                self.history.snapshot(&self.buffer);
                self.buffer.set_cursor_index(lo);
                let deleted = self.buffer.delete(hi - lo);
                self.buffer.set_register(deleted);
            }
            'c' => {
                self.history.snapshot(&self.buffer);
                self.buffer.set_mode(Mode::Insert);
                self.buffer.set_cursor_index(lo);
                let deleted = self.buffer.delete(hi - lo);
                self.buffer.set_register(deleted);
            }
            _ => {
                let text: Vec<char> = self.buffer.text().chars().collect();
                let hi = hi.min(text.len());
                if lo < hi {
                    let yanked: String = text[lo..hi].iter().collect();
                    self.buffer.set_register(yanked);
                }
                self.buffer.set_cursor(start_x, start_y);
                if object_key != 'w' && !matches!(object_key, '"' | '\'' | '`') {
                    // Bracket yanks leave the cursor at the span start.
                    self.buffer.set_cursor_index(lo);
                }
            }
        }
        true
    }
}
