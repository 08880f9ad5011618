use core_engine::Engine;

/// Engine over `text` with the cursor placed at an absolute character index.
pub fn engine_at(text: &str, cursor: usize) -> Engine {
    let mut engine = Engine::new(text);
    engine.set_cursor_index(cursor);
    engine
}

/// Feed literal characters one keystroke at a time.
pub fn feed(engine: &mut Engine, keys: &str) {
    for c in keys.chars() {
        engine.process_key(&c.to_string());
    }
}
