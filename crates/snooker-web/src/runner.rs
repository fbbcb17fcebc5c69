use snooker_engine::{
    FixedTimestep, GameEvent, InputEvent, PhysicsWorld, SnookerConfig, SnookerGame, Result,
};

/// Drives a snooker game from the browser's frame callback.
///
/// The host calls [`GameRunner::tick`] with the real frame time; the runner
/// turns it into fixed simulation steps. wasm-bindgen cannot export generic
/// structs, so the runner is concrete over the Rapier table.
pub struct GameRunner {
    game: SnookerGame<PhysicsWorld>,
    timestep: FixedTimestep,
}

impl GameRunner {
    pub fn new(config: SnookerConfig) -> Result<Self> {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let physics = PhysicsWorld::new(config.fixed_dt);
        let game = SnookerGame::new(config, physics)?;
        Ok(Self { game, timestep })
    }

    /// Queue an input event; it is handled at the start of the next step.
    pub fn push_input(&mut self, event: InputEvent) {
        self.game.push_input(event);
    }

    /// Run as many fixed steps as `dt` seconds of frame time allow.
    pub fn tick(&mut self, dt: f32) {
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.frame(self.timestep.dt());
        }
    }

    pub fn game(&self) -> &SnookerGame<PhysicsWorld> {
        &self.game
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn game_events_ptr(&self) -> *const f32 {
        self.game.events().as_ptr() as *const f32
    }

    /// Number of events; each is `GameEvent::FLOATS` floats.
    pub fn game_events_len(&self) -> u32 {
        self.game.events().len() as u32
    }

    pub fn ball_data_ptr(&self) -> *const f32 {
        self.game.ball_data().as_ptr()
    }

    /// Number of floats in the ball snapshot.
    pub fn ball_data_len(&self) -> u32 {
        self.game.ball_data().len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.game.config().world_width()
    }

    pub fn world_height(&self) -> f32 {
        self.game.config().world_height()
    }

    /// Events as seen by the host, for native callers and tests.
    pub fn events(&self) -> &[GameEvent] {
        self.game.events()
    }
}
