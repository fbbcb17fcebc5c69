pub mod api;
pub mod bridge;
pub mod core;
pub mod error;
pub mod input;
pub mod rules;

// Re-export key types at crate root for convenience
pub use api::config::{PhysicsTuning, RuleConfig, SnookerConfig};
pub use api::game::{Notice, SnookerGame};
pub use api::types::{BodyId, GameEvent, Player};
pub use bridge::protocol::{BALL_FLOATS, EVENT_FLOATS};
pub use core::ball::{Ball, BallRole};
pub use core::bodies::{BodyProps, BodyShape, CollisionPair, PhysicsBodies};
pub use core::layout::{Layout, LayoutMode};
pub use core::registry::{BallRegistry, BodyCommand};
pub use core::table::TableGeometry;
pub use core::time::{FixedTimestep, ShotClock};
pub use error::{Result, SnookerError};
pub use input::queue::{InputEvent, InputQueue};
pub use rules::classify::{classify, ClassifiedEvent};
pub use rules::engine::RuleEngine;
pub use rules::outcome::{FoulReason, Outcome, Phase};
pub use rules::turn::{TurnController, TurnDirective, TurnState};

#[cfg(feature = "physics")]
pub use core::physics::PhysicsWorld;
