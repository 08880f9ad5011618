//! Undo/redo behaviour across command kinds.

mod common;

use common::{engine_at, feed};
use core_engine::Engine;

#[test]
fn undo_restores_text_and_cursor() {
    let mut e = Engine::new("hello");
    feed(&mut e, "x");
    assert_eq!(e.text(), "ello");
    feed(&mut e, "u");
    assert_eq!(e.text(), "hello");
    assert_eq!(e.cursor_index(), 0);
}

#[test]
fn each_mutation_gets_its_own_undo_step() {
    let mut e = engine_at("one two three", 0);
    feed(&mut e, "dw");
    feed(&mut e, "dw");
    assert_eq!(e.text(), "three");
    feed(&mut e, "u");
    assert_eq!(e.text(), "two three");
    feed(&mut e, "u");
    assert_eq!(e.text(), "one two three");
    assert_eq!(e.cursor_index(), 0);
}

#[test]
fn insert_run_undoes_as_one_unit() {
    let mut e = engine_at("world", 0);
    feed(&mut e, "ihello ");
    e.process_key("esc");
    assert_eq!(e.text(), "hello world");
    feed(&mut e, "u");
    assert_eq!(e.text(), "world");
}

#[test]
fn redo_via_ctrl_r() {
    let mut e = Engine::new("hello");
    feed(&mut e, "x");
    feed(&mut e, "u");
    assert_eq!(e.text(), "hello");
    e.process_key("\u{12}");
    assert_eq!(e.text(), "ello");
}

#[test]
fn new_mutation_clears_redo() {
    let mut e = Engine::new("ab cd");
    feed(&mut e, "x");
    feed(&mut e, "u");
    feed(&mut e, "dw"); // new mutation invalidates the redo entry
    assert_eq!(e.text(), "cd");
    e.process_key("\u{12}");
    assert_eq!(e.text(), "cd");
}

#[test]
fn undo_on_empty_stack_is_noop() {
    let mut e = engine_at("stable", 3);
    feed(&mut e, "u");
    feed(&mut e, "u");
    assert_eq!(e.text(), "stable");
    assert_eq!(e.cursor_index(), 3);
}

#[test]
fn undo_restores_register_too() {
    let mut e = Engine::new("one two three");
    feed(&mut e, "dw");
    assert_eq!(e.buffer().register(), "one ");
    feed(&mut e, "u");
    assert_eq!(e.text(), "one two three");
    assert_eq!(e.buffer().register(), "");
}

#[test]
fn paste_participates_in_history() {
    let mut e = Engine::new("copy\nrest");
    feed(&mut e, "yyp");
    assert_eq!(e.text(), "copy\ncopy\nrest");
    feed(&mut e, "u");
    assert_eq!(e.text(), "copy\nrest");
}

#[test]
fn mutation_sequence_fully_unwinds() {
    let mut e = engine_at("alpha beta gamma", 0);
    feed(&mut e, "dw");
    feed(&mut e, "x");
    feed(&mut e, "rZ");
    assert_eq!(e.text(), "Zta gamma");
    feed(&mut e, "uuu");
    assert_eq!(e.text(), "alpha beta gamma");
    assert_eq!(e.cursor_index(), 0);
}
