//! The seam between the game and whatever simulates the table.

use glam::Vec2;

use crate::api::types::BodyId;

/// Collider shape for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Material and damping for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProps {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyProps {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}

/// Two bodies that started touching during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionPair {
    pub body_a: BodyId,
    pub label_a: String,
    pub body_b: BodyId,
    pub label_b: String,
}

impl CollisionPair {
    pub fn new(body_a: BodyId, label_a: &str, body_b: BodyId, label_b: &str) -> Self {
        Self {
            body_a,
            label_a: label_a.to_string(),
            body_b,
            label_b: label_b.to_string(),
        }
    }
}

/// Physics body provider.
///
/// Every body carries a label (`redBall`, `pocket`, ...) that comes back with
/// each collision. Operations on unknown ids are ignored; queries return `None`.
pub trait PhysicsBodies {
    /// Create a dynamic circle.
    fn create_circle_body(&mut self, label: &str, pos: Vec2, radius: f32, props: BodyProps)
        -> BodyId;

    /// Create a fixed body. Sensors report contacts without pushing back.
    fn create_static_body(
        &mut self,
        label: &str,
        pos: Vec2,
        shape: BodyShape,
        sensor: bool,
        props: BodyProps,
    ) -> BodyId;

    fn set_velocity(&mut self, id: BodyId, vel: Vec2);

    /// Teleport a body. Velocity is left alone.
    fn set_position(&mut self, id: BodyId, pos: Vec2);

    fn remove_body(&mut self, id: BodyId);

    /// Take a body out of the simulation without forgetting it, or put it
    /// back. Disabled bodies neither move nor report contacts.
    fn set_enabled(&mut self, id: BodyId, enabled: bool);

    /// Instantaneous push applied at `origin` (world space).
    fn apply_force(&mut self, id: BodyId, origin: Vec2, force: Vec2);

    fn position(&self, id: BodyId) -> Option<Vec2>;

    fn velocity(&self, id: BodyId) -> Option<Vec2>;

    /// Advance one fixed step and append contacts that started during it,
    /// in the order the simulation reported them.
    fn step(&mut self, events: &mut Vec<CollisionPair>);

    /// Drop every body.
    fn clear(&mut self);
}
