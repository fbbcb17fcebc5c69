/// Host wire format.
/// Must stay in sync with the page script that draws the table and HUD.
///
/// Two flat f32 buffers are exposed every frame:
/// ```text
/// [Balls:  active_balls × BALL_FLOATS]   x, y, role code, radius
/// [Events: events × EVENT_FLOATS]        kind, a, b, c
/// ```
/// Both are rebuilt from scratch after each tick.

use crate::api::types::{GameEvent, Player};
use crate::core::registry::BallRegistry;
use crate::rules::outcome::FoulReason;
use crate::rules::turn::TurnState;

/// Protocol version, readable through `EVENT_HELLO`.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball: x, y, role code, radius (wire format; never changes).
pub const BALL_FLOATS: usize = 4;

/// Floats per game event: kind, a, b, c (wire format; never changes).
pub const EVENT_FLOATS: usize = 4;

/// Event kinds.
/// a = protocol version, b = world width, c = world height. Sent every frame.
pub const EVENT_HELLO: f32 = 0.0;
/// a = player one score, b = player two score, c = current player (1 or 2).
pub const EVENT_SCORE: f32 = 1.0;
/// a = phase code, b = reds remaining, c = flags (`FLAG_*`).
pub const EVENT_PHASE: f32 = 2.0;
/// a = seconds left on the shot clock, b = shot power, c = layout mode (1..=3).
pub const EVENT_CLOCK: f32 = 3.0;
/// a = foul reason code, b = seconds the notice has left. Only while shown.
pub const EVENT_NOTICE: f32 = 4.0;

/// `EVENT_PHASE` flag: the shooter is on a color.
pub const FLAG_ON_COLOR: u32 = 1;
/// `EVENT_PHASE` flag: no reds remain.
pub const FLAG_ONLY_COLORED: u32 = 2;
/// `EVENT_PHASE` flag: the start button has been pressed.
pub const FLAG_STARTED: u32 = 4;
/// `EVENT_PHASE` flag: every object ball is gone.
pub const FLAG_FRAME_OVER: u32 = 8;

/// Append one entry per active ball to `out`.
pub fn write_balls(registry: &BallRegistry, radius: f32, out: &mut Vec<f32>) {
    for ball in registry.all_active() {
        out.extend_from_slice(&[ball.pos.x, ball.pos.y, ball.role.as_u8() as f32, radius]);
    }
}

/// Score and phase events for the current turn state.
pub fn state_events(state: &TurnState, started: bool) -> [GameEvent; 2] {
    let mut flags = 0;
    if state.on_color {
        flags |= FLAG_ON_COLOR;
    }
    if state.only_colored {
        flags |= FLAG_ONLY_COLORED;
    }
    if started {
        flags |= FLAG_STARTED;
    }
    [
        GameEvent::new(
            EVENT_SCORE,
            state.score(Player::One) as f32,
            state.score(Player::Two) as f32,
            state.current_player.number() as f32,
        ),
        GameEvent::new(
            EVENT_PHASE,
            state.phase.as_u8() as f32,
            state.reds_remaining as f32,
            flags as f32,
        ),
    ]
}

pub fn notice_event(reason: FoulReason, remaining: f32) -> GameEvent {
    GameEvent::new(EVENT_NOTICE, reason.as_u8() as f32, remaining, 0.0)
}
