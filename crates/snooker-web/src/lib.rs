//! Browser exports for the snooker game.
//!
//! The host drives everything through free functions: one `game_init*` call,
//! then `game_tick` per animation frame, input forwarded as it happens, and
//! the HUD and ball buffers read back through raw pointers into wasm memory.

use std::cell::RefCell;

use snooker_engine::{InputEvent, SnookerConfig};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::GameRunner;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
}

/// Run `f` on the live runner, or return `fallback` before `game_init`.
fn with_runner<R>(fallback: R, f: impl FnOnce(&mut GameRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("game not initialized, call game_init() first");
            fallback
        }
    })
}

fn install(config: SnookerConfig) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match GameRunner::new(config) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("snooker: initialized");
            true
        }
        Err(e) => {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
            false
        }
    }
}

#[wasm_bindgen]
pub fn game_init() {
    install(SnookerConfig::default());
}

/// Start with a JSON config. Missing fields take their defaults. Returns
/// false, leaving any previous game in place, if the config is rejected.
#[wasm_bindgen]
pub fn game_init_with_config(json: &str) -> bool {
    match SnookerConfig::from_json(json) {
        Ok(config) => install(config),
        Err(e) => {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
            false
        }
    }
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner((), |r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_click(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::Click { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner((), |r| r.push_input(InputEvent::KeyPress { key_code }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner((), |r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(0, |r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_ball_data_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.ball_data_ptr())
}

#[wasm_bindgen]
pub fn get_ball_data_len() -> u32 {
    with_runner(0, |r| r.ball_data_len())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(0.0, |r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(0.0, |r| r.world_height())
}
