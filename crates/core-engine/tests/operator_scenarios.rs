//! End-to-end operator scenarios at the keystroke level.

mod common;

use common::{engine_at, feed};
use core_engine::Engine;
use core_text::Mode;

#[test]
fn dw_mid_word_scenario() {
    // initial="hello extra world", cursor 6, keys d,w
    let mut e = engine_at("hello extra world", 6);
    feed(&mut e, "dw");
    assert_eq!(e.text(), "hello world");
    assert_eq!(e.cursor_index(), 6);
}

#[test]
fn motion_3w_scenario() {
    let mut e = engine_at("one two three four five", 0);
    feed(&mut e, "3w");
    assert_eq!(e.cursor_index(), 14);
}

#[test]
fn find_x_scenario() {
    let mut e = engine_at("find the letter x here", 0);
    feed(&mut e, "fx");
    assert_eq!(e.cursor_index(), 16);
}

#[test]
fn find_miss_is_idempotent() {
    let mut e = engine_at("find the letter x here", 5);
    feed(&mut e, "fq");
    assert_eq!(e.cursor_index(), 5);
}

#[test]
fn d_dollar_mirrors_capital_d() {
    let mut via_d = engine_at("keep this delete rest", 9);
    feed(&mut via_d, "d$");
    let mut via_cap = engine_at("keep this delete rest", 9);
    feed(&mut via_cap, "D");
    assert_eq!(via_d.text(), via_cap.text());
    assert_eq!(via_d.text(), "keep this");
}

#[test]
fn dd_with_count_removes_lines() {
    let mut e = engine_at("one\ntwo\nthree\nfour", 4);
    feed(&mut e, "2dd");
    assert_eq!(e.text(), "one\nfour");
}

#[test]
fn db_deletes_backward() {
    let mut e = engine_at("alpha beta", 6);
    feed(&mut e, "db");
    assert_eq!(e.text(), "beta");
    assert_eq!(e.cursor_index(), 0);
}

#[test]
fn de_includes_word_end() {
    let mut e = engine_at("hello there", 0);
    feed(&mut e, "de");
    assert_eq!(e.text(), " there");
}

#[test]
fn x_with_count() {
    let mut e = engine_at("hellooo world", 5);
    feed(&mut e, "2x");
    assert_eq!(e.text(), "hello world");
}

#[test]
fn capital_x_deletes_backward_only_to_line_start() {
    let mut e = engine_at("abcdef", 2);
    feed(&mut e, "5X");
    assert_eq!(e.text(), "cdef");
    assert_eq!(e.cursor_index(), 0);
}

#[test]
fn change_enters_insert_and_finishes_clean() {
    // ciw replace scenario: "change inside word" -> "change outside word"
    let mut e = engine_at("change inside word", 10);
    feed(&mut e, "ciw");
    assert_eq!(e.mode(), Mode::Insert);
    feed(&mut e, "outside");
    e.process_key("esc");
    assert_eq!(e.text(), "change outside word");
    assert_eq!(e.mode(), Mode::Normal);
}

#[test]
fn cf_changes_through_target() {
    let mut e = engine_at("one,two", 0);
    feed(&mut e, "cf,1,");
    e.process_key("esc");
    assert_eq!(e.text(), "1,two");
}

#[test]
fn swap_words_with_dw_w_capital_p() {
    let mut e = engine_at("second first rest", 0);
    feed(&mut e, "dwwP");
    assert_eq!(e.text(), "first second rest");
}

#[test]
fn yank_then_paste_at_line_end() {
    let mut e = engine_at("func(old)", 5);
    feed(&mut e, "yi)$p");
    assert_eq!(e.text(), "func(old)old");
}

#[test]
fn operator_waits_for_motion_without_committing() {
    let mut e = Engine::new("stay put");
    e.process_key("d");
    assert_eq!(e.text(), "stay put");
    assert_eq!(e.pending_keys(), "d");
    e.process_key("i");
    assert_eq!(e.pending_keys(), "di");
    assert_eq!(e.text(), "stay put");
    e.process_key("w");
    assert_eq!(e.text(), " put");
}

#[test]
fn keystrokes_equal_two_for_dw() {
    // The wire contract counts every accepted key; dw is two keys.
    let mut e = engine_at("hello extra world", 6);
    let mut accepted = 0;
    for key in ["d", "w"] {
        e.process_key(key);
        accepted += 1;
    }
    assert_eq!(accepted, 2);
    assert_eq!(e.text(), "hello world");
}
