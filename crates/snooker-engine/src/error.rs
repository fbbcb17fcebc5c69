use crate::api::types::BodyId;

/// Errors surfaced by the ball registry, placement checks and configuration.
///
/// None of these are fatal to the turn state machine: the caller logs or
/// reports them and the game keeps its previous state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnookerError {
    #[error("no ball with id {0:?}")]
    NotFound(BodyId),

    #[error("ball {0:?} is already registered (duplicate id, cue or color)")]
    DuplicateBall(BodyId),

    #[error("cue ball at ({x}, {y}) is outside the D")]
    InvalidPlacement { x: f32, y: f32 },

    #[error("unknown ball label `{0}`")]
    UnknownBallLabel(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SnookerError>;
