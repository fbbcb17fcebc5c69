use glam::Vec2;

use crate::api::types::BodyId;
use crate::core::ball::{Ball, BallRole};
use crate::error::{Result, SnookerError};

/// A mutation the physics collaborator must mirror.
/// Queued by the registry, drained by the game once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    /// Drop the body from the simulation.
    Remove(BodyId),
    /// Teleport the body, zero its velocity and enable it.
    Place(BodyId, Vec2),
    /// Stop the body and take it out of the simulation until it is placed again.
    Park(BodyId),
}

/// Ball storage using a flat Vec.
/// A snooker table never holds more than 22 balls, so linear lookups are fine.
pub struct BallRegistry {
    balls: Vec<Ball>,
    commands: Vec<BodyCommand>,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(22),
            commands: Vec::new(),
        }
    }

    /// Register a ball. Rejects a reused id, a second cue ball and a second
    /// instance of any color.
    pub fn add(&mut self, ball: Ball) -> Result<()> {
        let clash = self.balls.iter().any(|b| {
            b.id == ball.id || (ball.role != BallRole::Red && b.role == ball.role)
        });
        if clash {
            return Err(SnookerError::DuplicateBall(ball.id));
        }
        self.balls.push(ball);
        Ok(())
    }

    /// Mark a ball as permanently removed and ask physics to drop its body.
    /// The registry does not care about the role; keeping colors and the cue
    /// on the table is the rule engine's job.
    pub fn remove(&mut self, id: BodyId) -> Result<()> {
        let ball = self.find_mut(id)?;
        ball.active = false;
        ball.vel = Vec2::ZERO;
        self.commands.push(BodyCommand::Remove(id));
        Ok(())
    }

    /// Take a potted ball off the table until it is respotted. Unlike
    /// [`BallRegistry::remove`] the physics body is kept.
    pub fn park(&mut self, id: BodyId) -> Result<()> {
        let ball = self.find_mut(id)?;
        ball.active = false;
        ball.vel = Vec2::ZERO;
        self.commands.push(BodyCommand::Park(id));
        Ok(())
    }

    /// Put a ball back on the table at `pos` with zero velocity.
    pub fn respot(&mut self, id: BodyId, pos: Vec2) -> Result<()> {
        let ball = self.find_mut(id)?;
        ball.pos = pos;
        ball.vel = Vec2::ZERO;
        ball.active = true;
        self.commands.push(BodyCommand::Place(id, pos));
        Ok(())
    }

    pub fn find(&self, id: BodyId) -> Result<&Ball> {
        self.balls
            .iter()
            .find(|b| b.id == id)
            .ok_or(SnookerError::NotFound(id))
    }

    pub fn find_mut(&mut self, id: BodyId) -> Result<&mut Ball> {
        self.balls
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(SnookerError::NotFound(id))
    }

    /// First ball with the given role, active or not.
    pub fn find_role(&self, role: BallRole) -> Option<&Ball> {
        self.balls.iter().find(|b| b.role == role)
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.find_role(BallRole::Cue)
    }

    /// Iterate over balls still on the table.
    pub fn all_active(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.active)
    }

    /// Iterate over every registered ball, removed ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn active_reds(&self) -> usize {
        self.all_active().filter(|b| b.role == BallRole::Red).count()
    }

    /// Physics label of a registered ball (`redBall`, `blackBall`, ...).
    pub fn color_label_of(&self, id: BodyId) -> Result<&'static str> {
        self.find(id).map(Ball::label)
    }

    /// Copy the simulated position and velocity back onto an active ball.
    /// Does not queue a command; physics is the source of this data.
    pub fn sync_position(&mut self, id: BodyId, pos: Vec2, vel: Vec2) {
        if let Ok(ball) = self.find_mut(id) {
            if ball.active {
                ball.pos = pos;
                ball.vel = vel;
            }
        }
    }

    /// Take all queued body commands, in the order they were issued.
    pub fn drain_commands(&mut self) -> Vec<BodyCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Forget every ball and any pending commands.
    pub fn clear(&mut self) {
        self.balls.clear();
        self.commands.clear();
    }
}

impl Default for BallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
