/// Input event types the game understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A click/tap at world coordinates (x, y).
    Click { x: f32, y: f32 },
    /// A key was pressed.
    KeyPress { key_code: u32 },
    /// A custom event from the UI layer (buttons, sliders).
    /// `kind` is one of the `CUSTOM_*` codes; `a`, `b`, `c` carry data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Start button: enables play.
pub const CUSTOM_START: u32 = 1;
/// Confirm the cue-ball placement.
pub const CUSTOM_CONFIRM: u32 = 2;
/// Power slider; `a` is the new power level.
pub const CUSTOM_SET_POWER: u32 = 3;
/// Reset with a layout; `a` is the mode number (1..=3).
pub const CUSTOM_RESET: u32 = 4;

pub const KEY_ENTER: u32 = 13;
pub const KEY_ARROW_UP: u32 = 38;
pub const KEY_ARROW_DOWN: u32 = 40;
/// Keys '1', '2', '3' select the layout mode.
pub const KEY_DIGIT_1: u32 = 49;
pub const KEY_DIGIT_3: u32 = 51;

/// A queue of input events.
/// The host writes events into the queue; the game drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
