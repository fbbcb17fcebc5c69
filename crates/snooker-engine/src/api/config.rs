use serde::{Deserialize, Serialize};

use crate::core::layout::LayoutMode;
use crate::error::{Result, SnookerError};

/// Game configuration. Every field has a default, so a host can pass a
/// partial JSON object (or none at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnookerConfig {
    /// Playing-surface width in world units. Height is always half of it.
    pub table_width: f32,
    /// Horizontal offset of the table within the world.
    pub table_offset_x: f32,
    /// Vertical offset of the table within the world.
    pub table_offset_y: f32,
    /// Seconds a player has to take each shot.
    pub shot_clock_secs: u32,
    /// How balls are arranged on reset.
    pub layout: LayoutMode,
    /// Seed for the random layouts.
    pub seed: u64,
    /// Speed under which every ball counts as settled.
    pub rest_speed: f32,
    /// How long a foul notice stays on screen, in seconds.
    pub notice_secs: f32,
    /// Simulation step in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub rules: RuleConfig,
    pub physics: PhysicsTuning,
}

impl Default for SnookerConfig {
    fn default() -> Self {
        Self {
            table_width: 800.0,
            table_offset_x: 150.0,
            table_offset_y: 150.0,
            shot_clock_secs: 60,
            layout: LayoutMode::Standard,
            seed: 42,
            rest_speed: 5.0,
            notice_secs: 2.0,
            fixed_dt: 1.0 / 60.0,
            rules: RuleConfig::default(),
            physics: PhysicsTuning::default(),
        }
    }
}

impl SnookerConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SnookerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.table_width > 0.0) {
            return Err(SnookerError::InvalidConfig(format!(
                "table_width must be positive, got {}",
                self.table_width
            )));
        }
        if self.shot_clock_secs == 0 {
            return Err(SnookerError::InvalidConfig(
                "shot_clock_secs must be at least 1".into(),
            ));
        }
        if !(self.fixed_dt > 0.0) {
            return Err(SnookerError::InvalidConfig(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if self.rules.foul_minimum < 0 {
            return Err(SnookerError::InvalidConfig(
                "foul_minimum cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// World width: the table plus its offset on both sides.
    pub fn world_width(&self) -> f32 {
        self.table_width + 2.0 * self.table_offset_x
    }

    /// World height: the table plus its offset on both sides.
    pub fn world_height(&self) -> f32 {
        self.table_width / 2.0 + 2.0 * self.table_offset_y
    }
}

/// Scoring knobs. The defaults reproduce the base game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Floor applied to every foul award.
    pub foul_minimum: i32,
    /// Call a foul when the cue ball touches no object ball at all.
    pub penalize_miss: bool,
    /// Points given to the opponent when the shot clock runs out. 0 in the base game.
    pub time_violation_penalty: i32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            foul_minimum: 4,
            penalize_miss: true,
            time_violation_penalty: 0,
        }
    }
}

impl RuleConfig {
    /// A foul award for a ball of the given nominal value.
    pub fn foul_value(&self, nominal: i32) -> i32 {
        nominal.max(self.foul_minimum)
    }
}

/// Material constants handed to the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub ball_restitution: f32,
    pub ball_friction: f32,
    /// Very low density so a shot impulse maps almost directly to speed.
    pub ball_density: f32,
    /// Felt friction (higher = stops faster).
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub cushion_restitution: f32,
    pub cushion_friction: f32,
    /// Impulse per power level (power runs 1..=20). With the default ball
    /// size and density this is roughly 190 units/s of cue-ball speed per level.
    pub shot_impulse_per_level: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            ball_restitution: 0.9,
            ball_friction: 0.1,
            ball_density: 0.01,
            linear_damping: 1.75,
            angular_damping: 1.0,
            cushion_restitution: 0.95,
            cushion_friction: 0.2,
            shot_impulse_per_level: 750.0,
        }
    }
}
