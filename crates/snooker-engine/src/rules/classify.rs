//! Turns raw collision pairs into rule-relevant events.
//!
//! Stateless: every pair is classified on its own. Pairs reported in the same
//! step are classified independently, in the order they arrived.

use crate::api::types::BodyId;
use crate::core::ball::{BallRole, BALL_LABEL_SUFFIX};
use crate::core::bodies::CollisionPair;
use crate::error::{Result, SnookerError};

/// Label of the pocket sensors.
pub const POCKET_LABEL: &str = "pocket";
/// Label of the cushion segments.
pub const CUSHION_LABEL: &str = "cushion";

/// What a collision means to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedEvent {
    /// A ball dropped into a pocket.
    Potting { ball: BodyId, role: BallRole },
    /// A ball touched a cushion.
    CushionContact,
    /// The cue ball touched an object ball.
    CueFirstContact { object: BodyId, role: BallRole },
    /// Two object balls touched.
    BallContact,
    Ignored,
}

/// Resolve a label to a ball role. `Ok(None)` for labels that are not balls.
fn ball_role(label: &str) -> Result<Option<BallRole>> {
    match BallRole::from_label(label) {
        Some(role) => Ok(Some(role)),
        None if label.ends_with(BALL_LABEL_SUFFIX) => {
            Err(SnookerError::UnknownBallLabel(label.to_string()))
        }
        None => Ok(None),
    }
}

/// Classify one pair, reporting a malformed ball label as an error.
pub fn try_classify(pair: &CollisionPair) -> Result<ClassifiedEvent> {
    let role_a = ball_role(&pair.label_a)?;
    let role_b = ball_role(&pair.label_b)?;

    // Pocket
    if pair.label_a == POCKET_LABEL {
        if let Some(role) = role_b {
            return Ok(ClassifiedEvent::Potting { ball: pair.body_b, role });
        }
    }
    if pair.label_b == POCKET_LABEL {
        if let Some(role) = role_a {
            return Ok(ClassifiedEvent::Potting { ball: pair.body_a, role });
        }
    }

    // Cushion
    if pair.label_a == CUSHION_LABEL || pair.label_b == CUSHION_LABEL {
        return Ok(ClassifiedEvent::CushionContact);
    }

    // Ball against ball
    Ok(match (role_a, role_b) {
        (Some(BallRole::Cue), Some(role)) if role != BallRole::Cue => {
            ClassifiedEvent::CueFirstContact { object: pair.body_b, role }
        }
        (Some(role), Some(BallRole::Cue)) if role != BallRole::Cue => {
            ClassifiedEvent::CueFirstContact { object: pair.body_a, role }
        }
        (Some(_), Some(_)) => ClassifiedEvent::BallContact,
        _ => ClassifiedEvent::Ignored,
    })
}

/// Classify one pair. Unknown ball labels are logged and ignored.
pub fn classify(pair: &CollisionPair) -> ClassifiedEvent {
    match try_classify(pair) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("ignoring collision {:?}/{:?}: {}", pair.body_a, pair.body_b, e);
            ClassifiedEvent::Ignored
        }
    }
}
