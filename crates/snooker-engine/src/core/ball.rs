//! Ball roles, values, labels and the per-ball record.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::BodyId;

/// Suffix shared by every ball label (`redBall`, `cueBall`, ...).
pub const BALL_LABEL_SUFFIX: &str = "Ball";

/// Ball role: what the ball is worth and how the rules treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallRole {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
    Cue,
}

impl BallRole {
    /// The six colors in ascending value order.
    pub const COLORS: [BallRole; 6] = [
        BallRole::Yellow,
        BallRole::Green,
        BallRole::Brown,
        BallRole::Blue,
        BallRole::Pink,
        BallRole::Black,
    ];

    /// Nominal point value. The cue's value is the penalty for potting it.
    pub fn value(self) -> i32 {
        match self {
            BallRole::Red => 1,
            BallRole::Yellow => 2,
            BallRole::Green => 3,
            BallRole::Brown => 4,
            BallRole::Blue => 5,
            BallRole::Pink => 6,
            BallRole::Black => 7,
            BallRole::Cue => 4,
        }
    }

    /// True for the six colors (not Red, not Cue).
    pub fn is_color(self) -> bool {
        !matches!(self, BallRole::Red | BallRole::Cue)
    }

    /// Physics body label for this role.
    pub fn label(self) -> &'static str {
        match self {
            BallRole::Red => "redBall",
            BallRole::Yellow => "yellowBall",
            BallRole::Green => "greenBall",
            BallRole::Brown => "brownBall",
            BallRole::Blue => "blueBall",
            BallRole::Pink => "pinkBall",
            BallRole::Black => "blackBall",
            BallRole::Cue => "cueBall",
        }
    }

    /// Parse a physics body label. Returns None for anything that is not a ball role.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "redBall" => Some(BallRole::Red),
            "yellowBall" => Some(BallRole::Yellow),
            "greenBall" => Some(BallRole::Green),
            "brownBall" => Some(BallRole::Brown),
            "blueBall" => Some(BallRole::Blue),
            "pinkBall" => Some(BallRole::Pink),
            "blackBall" => Some(BallRole::Black),
            "cueBall" => Some(BallRole::Cue),
            _ => None,
        }
    }

    /// Numeric code for the host protocol (0 = cue, 1 = red, 2..=7 = colors by value).
    pub fn as_u8(self) -> u8 {
        match self {
            BallRole::Cue => 0,
            BallRole::Red => 1,
            other => other.value() as u8,
        }
    }
}

/// A ball on (or removed from) the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Physics body id, unique across the table.
    pub id: BodyId,
    pub role: BallRole,
    /// Position in table space.
    pub pos: Vec2,
    pub vel: Vec2,
    /// False once permanently removed (potted reds, colors in the final phase).
    pub active: bool,
}

impl Ball {
    pub fn new(id: BodyId, role: BallRole) -> Self {
        Self {
            id,
            role,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            active: true,
        }
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn label(&self) -> &'static str {
        self.role.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_for_every_role() {
        let mut roles = BallRole::COLORS.to_vec();
        roles.push(BallRole::Red);
        roles.push(BallRole::Cue);
        for role in roles {
            assert_eq!(BallRole::from_label(role.label()), Some(role));
            assert!(role.label().ends_with(BALL_LABEL_SUFFIX));
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(BallRole::from_label("purpleBall"), None);
        assert_eq!(BallRole::from_label("pocket"), None);
        assert_eq!(BallRole::from_label(""), None);
    }

    #[test]
    fn colors_ascend_in_value() {
        let values: Vec<i32> = BallRole::COLORS.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![2, 3, 4, 5, 6, 7]);
        assert!(BallRole::COLORS.iter().all(|r| r.is_color()));
        assert!(!BallRole::Red.is_color());
        assert!(!BallRole::Cue.is_color());
    }
}
