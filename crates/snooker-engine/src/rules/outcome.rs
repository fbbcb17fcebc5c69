use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, Player};

/// Where a turn is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The shooter is placing the cue ball in the D.
    BallInHand,
    /// Cue ball is down, waiting for the shot. The shot clock runs here only.
    AwaitingShot,
    /// Balls are moving; collision events are being scored.
    ShotInFlight,
    /// Everything settled; the turn decision is being made.
    TurnResolved,
}

impl Phase {
    /// Numeric code for the host protocol.
    pub fn as_u8(self) -> u8 {
        match self {
            Phase::BallInHand => 0,
            Phase::AwaitingShot => 1,
            Phase::ShotInFlight => 2,
            Phase::TurnResolved => 3,
        }
    }
}

/// Why a foul was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoulReason {
    CuePotted,
    /// A color potted while not on a color.
    WrongBallPotted,
    /// The cue ball's first contact was the wrong kind of ball.
    WrongBallFirst,
    /// Cue ball placed outside the D. Advisory, no points.
    InvalidPlacement,
    TimeViolation,
    /// The cue ball touched no object ball.
    Miss,
}

impl FoulReason {
    /// Text for the on-screen notice.
    pub fn message(self) -> &'static str {
        match self {
            FoulReason::CuePotted => "Foul: cue ball potted",
            FoulReason::WrongBallPotted => "Foul: wrong ball potted",
            FoulReason::WrongBallFirst => "Foul: wrong ball hit first",
            FoulReason::InvalidPlacement => "Place the cue ball inside the D",
            FoulReason::TimeViolation => "Foul: time violation",
            FoulReason::Miss => "Foul: missed every ball",
        }
    }

    /// Numeric code for the host protocol.
    pub fn as_u8(self) -> u8 {
        match self {
            FoulReason::CuePotted => 1,
            FoulReason::WrongBallPotted => 2,
            FoulReason::WrongBallFirst => 3,
            FoulReason::InvalidPlacement => 4,
            FoulReason::TimeViolation => 5,
            FoulReason::Miss => 6,
        }
    }
}

/// A consequence the rule engine asks the turn controller to apply.
/// Outcomes are applied in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Add `amount` (possibly negative) to a player's score.
    ScoreDelta { player: Player, amount: i32 },
    /// Take a ball off the table for good.
    RemoveBall { ball: BodyId },
    /// Put a ball back at `position` with zero velocity.
    RespotBall { ball: BodyId, position: Vec2 },
    SwitchTurn,
    RetainTurn,
    SetPhase { phase: Phase },
    /// Set or clear the "on a color" flag.
    SetOnColor { on_color: bool },
    FoulSignal { reason: FoulReason },
}

impl Outcome {
    pub fn is_turn_directive(&self) -> bool {
        matches!(self, Outcome::SwitchTurn | Outcome::RetainTurn)
    }

    pub fn is_foul(&self) -> bool {
        matches!(self, Outcome::FoulSignal { .. })
    }
}
