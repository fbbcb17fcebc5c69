use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::api::config::SnookerConfig;
use crate::api::types::{BodyId, GameEvent};
use crate::bridge::protocol;
use crate::core::ball::{Ball, BallRole};
use crate::core::bodies::{BodyProps, BodyShape, CollisionPair, PhysicsBodies};
use crate::core::layout::{self, LayoutMode};
use crate::core::registry::{BallRegistry, BodyCommand};
use crate::core::table::TableGeometry;
use crate::error::{Result, SnookerError};
use crate::input::queue::*;
use crate::rules::classify::{classify, ClassifiedEvent, CUSHION_LABEL, POCKET_LABEL};
use crate::rules::engine::RuleEngine;
use crate::rules::outcome::{FoulReason, Outcome, Phase};
use crate::rules::turn::{TurnController, TurnDirective, TurnState};

pub const MIN_POWER: u32 = 1;
pub const MAX_POWER: u32 = 20;
pub const DEFAULT_POWER: u32 = 10;

/// Steps after a shot before the settle check starts, so the cue ball has
/// picked up speed.
const SETTLE_GRACE_STEPS: u32 = 5;

/// A foul message on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notice {
    pub reason: FoulReason,
    /// Seconds until it disappears.
    pub remaining: f32,
}

/// A frame of snooker between two players.
///
/// Owns the registry, the turn state and the physics collaborator, and is the
/// only place they meet: physics contacts are classified, scored by the rule
/// engine and applied by the turn controller, and the resulting ball commands
/// are forwarded back to physics.
pub struct SnookerGame<P: PhysicsBodies> {
    config: SnookerConfig,
    geometry: TableGeometry,
    registry: BallRegistry,
    physics: P,
    engine: RuleEngine,
    turn: TurnController,
    rng: ChaCha8Rng,
    layout_mode: LayoutMode,
    input: InputQueue,
    started: bool,
    power: u32,
    settle_grace: u32,
    notice: Option<Notice>,
    collisions: Vec<CollisionPair>,
    events: Vec<GameEvent>,
    ball_data: Vec<f32>,
}

impl<P: PhysicsBodies> SnookerGame<P> {
    /// Build a game and rack the first frame with the configured layout.
    pub fn new(config: SnookerConfig, physics: P) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            geometry: TableGeometry::from_config(&config),
            registry: BallRegistry::new(),
            physics,
            engine: RuleEngine::new(config.rules),
            turn: TurnController::new(config.shot_clock_secs),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            layout_mode: config.layout,
            input: InputQueue::new(),
            started: false,
            power: DEFAULT_POWER,
            settle_grace: 0,
            notice: None,
            collisions: Vec::with_capacity(32),
            events: Vec::with_capacity(8),
            ball_data: Vec::new(),
            config,
        };
        game.reset(game.layout_mode)?;
        Ok(game)
    }

    /// Clear the table and start a new frame with `mode`.
    /// Scores are zeroed and player one has the cue ball in hand.
    pub fn reset(&mut self, mode: LayoutMode) -> Result<()> {
        self.physics.clear();
        self.registry.clear();
        self.turn.reset();
        self.engine.begin_shot();
        self.notice = None;
        self.settle_grace = 0;
        self.layout_mode = mode;

        self.build_table();
        let layout = layout::arrange(mode, &self.geometry, &mut self.rng);
        self.spawn_ball(BallRole::Cue, layout.cue)?;
        for pos in layout.reds {
            self.spawn_ball(BallRole::Red, pos)?;
        }
        for (role, pos) in layout.colors {
            self.spawn_ball(role, pos)?;
        }
        self.turn.set_reds_remaining(self.registry.active_reds() as u32);
        self.rebuild_hud();
        log::info!("new frame, layout {:?}", mode);
        Ok(())
    }

    fn build_table(&mut self) {
        let tuning = self.config.physics;
        let cushion = BodyProps {
            restitution: tuning.cushion_restitution,
            friction: tuning.cushion_friction,
            ..BodyProps::default()
        };
        for rect in self.geometry.cushion_rects() {
            self.physics.create_static_body(
                CUSHION_LABEL,
                rect.center,
                BodyShape::Rect { half_extents: rect.half_extents },
                false,
                cushion,
            );
        }
        let sensor = BodyShape::Circle { radius: self.geometry.pocket_sensor_radius };
        for pocket in self.geometry.pockets {
            self.physics
                .create_static_body(POCKET_LABEL, pocket, sensor, true, BodyProps::default());
        }
    }

    fn spawn_ball(&mut self, role: BallRole, pos: Vec2) -> Result<BodyId> {
        let tuning = self.config.physics;
        let props = BodyProps {
            restitution: tuning.ball_restitution,
            friction: tuning.ball_friction,
            density: tuning.ball_density,
            linear_damping: tuning.linear_damping,
            angular_damping: tuning.angular_damping,
        };
        let id = self
            .physics
            .create_circle_body(role.label(), pos, self.geometry.ball_radius, props);
        self.registry.add(Ball::new(id, role).with_pos(pos))?;
        Ok(id)
    }

    // -- Input --

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Act on one input event right away. Returns the outcomes it produced.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<Outcome> {
        match event {
            InputEvent::Custom { kind: CUSTOM_START, .. } => {
                if !self.started {
                    self.started = true;
                    log::info!("game started");
                }
                Vec::new()
            }
            InputEvent::Custom { kind: CUSTOM_RESET, a, .. } => {
                let mode = LayoutMode::from_index(a as u32).unwrap_or(self.layout_mode);
                self.reset_logged(mode);
                Vec::new()
            }
            InputEvent::KeyPress { key_code } if (KEY_DIGIT_1..=KEY_DIGIT_3).contains(&key_code) => {
                if let Some(mode) = LayoutMode::from_index(key_code - KEY_DIGIT_1 + 1) {
                    self.reset_logged(mode);
                }
                Vec::new()
            }
            _ if !self.started => {
                log::debug!("input before start ignored: {:?}", event);
                Vec::new()
            }
            InputEvent::Custom { kind: CUSTOM_CONFIRM, .. }
            | InputEvent::KeyPress { key_code: KEY_ENTER } => self.confirm_placement(),
            InputEvent::Custom { kind: CUSTOM_SET_POWER, a, .. } => {
                self.set_power(a.max(0.0) as u32);
                Vec::new()
            }
            InputEvent::KeyPress { key_code: KEY_ARROW_UP } => {
                self.set_power(self.power + 1);
                Vec::new()
            }
            InputEvent::KeyPress { key_code: KEY_ARROW_DOWN } => {
                self.set_power(self.power.saturating_sub(1));
                Vec::new()
            }
            InputEvent::Click { x, y } => {
                let target = Vec2::new(x, y);
                let phase = self.turn.state().phase;
                match phase {
                    Phase::BallInHand => match self.place_cue_ball(target) {
                        Ok(placed) => vec![placed],
                        Err(e) => {
                            log::debug!("{}", e);
                            let outcomes = self.engine.invalid_placement();
                            self.apply(&outcomes);
                            outcomes
                        }
                    },
                    Phase::AwaitingShot if self.shoot(target) => {
                        vec![Outcome::SetPhase { phase: Phase::ShotInFlight }]
                    }
                    _ => Vec::new(),
                }
            }
            InputEvent::Custom { .. } | InputEvent::KeyPress { .. } => Vec::new(),
        }
    }

    fn reset_logged(&mut self, mode: LayoutMode) {
        if let Err(e) = self.reset(mode) {
            log::error!("reset failed: {}", e);
        }
    }

    pub fn set_power(&mut self, power: u32) {
        self.power = power.clamp(MIN_POWER, MAX_POWER);
    }

    /// Move the cue ball while it is in hand. Rejects spots outside the D or
    /// on top of another ball. Returns the applied respot.
    pub fn place_cue_ball(&mut self, pos: Vec2) -> Result<Outcome> {
        let invalid = SnookerError::InvalidPlacement { x: pos.x, y: pos.y };
        if self.turn.state().phase != Phase::BallInHand || !self.geometry.in_d(pos) {
            return Err(invalid);
        }
        let cue = self
            .registry
            .cue_ball()
            .map(|b| b.id)
            .ok_or(SnookerError::InvalidPlacement { x: pos.x, y: pos.y })?;
        let min_dist = self.geometry.ball_radius * 2.0;
        let blocked = self
            .registry
            .all_active()
            .any(|b| b.id != cue && b.pos.distance(pos) < min_dist);
        if blocked {
            return Err(invalid);
        }
        let placed = Outcome::RespotBall { ball: cue, position: pos };
        self.apply(&[placed]);
        Ok(placed)
    }

    /// Accept the cue ball where it lies. Outside the D this only raises an
    /// advisory notice.
    pub fn confirm_placement(&mut self) -> Vec<Outcome> {
        if self.turn.state().phase != Phase::BallInHand {
            return Vec::new();
        }
        let Some(pos) = self.registry.cue_ball().map(|b| b.pos) else {
            return Vec::new();
        };
        let outcomes = self.engine.confirm_placement(pos, &self.registry, &self.geometry);
        self.apply(&outcomes);
        outcomes
    }

    /// Strike the cue ball toward `target` at the current power.
    /// Returns false if no shot could be taken.
    pub fn shoot(&mut self, target: Vec2) -> bool {
        if !self.started || self.turn.state().phase != Phase::AwaitingShot {
            return false;
        }
        let Some(cue) = self.registry.cue_ball().filter(|b| b.active) else {
            return false;
        };
        let (id, origin) = (cue.id, cue.pos);
        let dir = (target - origin).normalize_or_zero();
        if dir == Vec2::ZERO {
            return false;
        }

        let impulse = dir * self.power as f32 * self.config.physics.shot_impulse_per_level;
        self.physics.apply_force(id, origin, impulse);
        self.engine.begin_shot();
        self.turn.begin_shot();
        self.settle_grace = SETTLE_GRACE_STEPS;
        log::info!(
            "player {} shoots at power {}",
            self.turn.state().current_player.number(),
            self.power
        );
        true
    }

    // -- Frame loop --

    /// Run one fixed step of `dt` seconds: input, physics, rules, clock, HUD.
    pub fn frame(&mut self, dt: f32) {
        for event in self.input.drain() {
            self.handle_input(event);
        }

        self.step_physics();

        if self.turn.in_shot() {
            if self.settle_grace > 0 {
                self.settle_grace -= 1;
            } else if self.all_balls_stopped() {
                self.resolve_shot();
            }
        }

        if self.started {
            let ticks = self.turn.advance_clock(dt);
            for _ in 0..ticks {
                self.on_tick();
            }
        }

        if let Some(notice) = &mut self.notice {
            notice.remaining -= dt;
            if notice.remaining <= 0.0 {
                self.notice = None;
            }
        }

        self.rebuild_hud();
    }

    /// One second of the shot clock. Returns the outcomes of a time violation.
    pub fn on_tick(&mut self) -> Vec<Outcome> {
        if !self.started || !self.turn.tick() {
            return Vec::new();
        }
        let outcomes = self.engine.shot_clock_expired(self.turn.state());
        self.apply(&outcomes);
        outcomes
    }

    fn step_physics(&mut self) {
        self.collisions.clear();
        self.physics.step(&mut self.collisions);

        let pairs = std::mem::take(&mut self.collisions);
        for pair in &pairs {
            let event = classify(pair);
            self.process_event(event);
        }
        self.collisions = pairs;

        self.sync_balls();
        self.check_escaped_balls();
    }

    fn process_event(&mut self, event: ClassifiedEvent) {
        let outcomes = self
            .engine
            .process(&event, self.turn.state(), &self.registry, &self.geometry);
        self.apply(&outcomes);
    }

    /// Hand outcomes to the turn controller and mirror ball changes into physics.
    fn apply(&mut self, outcomes: &[Outcome]) {
        if outcomes.is_empty() {
            return;
        }
        self.turn.apply(outcomes, &mut self.registry);
        for outcome in outcomes {
            if let Outcome::FoulSignal { reason } = *outcome {
                self.notice = Some(Notice {
                    reason,
                    remaining: self.config.notice_secs,
                });
            }
        }
        self.flush_commands();
    }

    fn flush_commands(&mut self) {
        for command in self.registry.drain_commands() {
            match command {
                BodyCommand::Remove(id) => self.physics.remove_body(id),
                BodyCommand::Place(id, pos) => {
                    self.physics.set_position(id, pos);
                    self.physics.set_velocity(id, Vec2::ZERO);
                    self.physics.set_enabled(id, true);
                }
                BodyCommand::Park(id) => {
                    self.physics.set_velocity(id, Vec2::ZERO);
                    self.physics.set_enabled(id, false);
                }
            }
        }
    }

    fn sync_balls(&mut self) {
        let ids: Vec<BodyId> = self.registry.all_active().map(|b| b.id).collect();
        for id in ids {
            if let (Some(pos), Some(vel)) = (self.physics.position(id), self.physics.velocity(id)) {
                self.registry.sync_position(id, pos, vel);
            }
        }
    }

    /// A ball that tunnelled off the table counts as potted.
    fn check_escaped_balls(&mut self) {
        let escaped: Vec<(BodyId, BallRole)> = self
            .registry
            .all_active()
            .filter(|b| !self.geometry.contains(b.pos))
            .map(|b| (b.id, b.role))
            .collect();
        for (ball, role) in escaped {
            log::warn!("{:?} {:?} left the table, treating as potted", role, ball);
            self.process_event(ClassifiedEvent::Potting { ball, role });
        }
    }

    fn all_balls_stopped(&self) -> bool {
        let threshold = self.config.rest_speed;
        self.registry.all_active().all(|b| b.vel.length() <= threshold)
    }

    fn resolve_shot(&mut self) -> TurnDirective {
        let outcomes = self.engine.resolve_shot(self.turn.state());
        self.apply(&outcomes);

        // Kill the residual crawl so the next shot starts from rest.
        let ids: Vec<BodyId> = self.registry.all_active().map(|b| b.id).collect();
        for id in ids {
            self.physics.set_velocity(id, Vec2::ZERO);
            if let Ok(ball) = self.registry.find_mut(id) {
                ball.vel = Vec2::ZERO;
            }
        }

        let directive = self.turn.resolve(&mut self.registry);
        self.flush_commands();
        if self.is_frame_over() {
            let state = self.turn.state();
            log::info!("frame over: {} - {}", state.scores[0], state.scores[1]);
        }
        directive
    }

    // -- HUD --

    fn rebuild_hud(&mut self) {
        self.events.clear();
        self.events.push(GameEvent::new(
            protocol::EVENT_HELLO,
            protocol::PROTOCOL_VERSION,
            self.config.world_width(),
            self.config.world_height(),
        ));
        let mut state_events = protocol::state_events(self.turn.state(), self.started);
        if self.is_frame_over() {
            let flags = state_events[1].c as u32 | protocol::FLAG_FRAME_OVER;
            state_events[1].c = flags as f32;
        }
        self.events.extend_from_slice(&state_events);
        self.events.push(GameEvent::new(
            protocol::EVENT_CLOCK,
            self.turn.state().clock() as f32,
            self.power as f32,
            self.layout_mode.index() as f32,
        ));
        if let Some(notice) = self.notice {
            self.events.push(protocol::notice_event(notice.reason, notice.remaining));
        }

        self.ball_data.clear();
        protocol::write_balls(&self.registry, self.geometry.ball_radius, &mut self.ball_data);
    }

    // -- Accessors --

    /// True once no object ball is left on the table.
    pub fn is_frame_over(&self) -> bool {
        self.turn.state().only_colored
            && !self.registry.all_active().any(|b| b.role.is_color())
    }

    pub fn state(&self) -> &TurnState {
        self.turn.state()
    }

    pub fn registry(&self) -> &BallRegistry {
        &self.registry
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &SnookerConfig {
        &self.config
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// HUD events from the last frame.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Flat ball snapshot from the last frame, `BALL_FLOATS` per ball.
    pub fn ball_data(&self) -> &[f32] {
        &self.ball_data
    }

    /// Contacts reported by the last physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Player;
    use std::collections::{HashMap, HashSet};

    /// Balls never move on their own; velocities are set by hand.
    #[derive(Default)]
    struct StillTable {
        next_id: u32,
        bodies: HashMap<BodyId, (String, Vec2, Vec2)>,
        scripted: Vec<Vec<(BodyId, BodyId)>>,
        impulses: Vec<(BodyId, Vec2)>,
        disabled: HashSet<BodyId>,
    }

    impl StillTable {
        fn pair(&self, a: BodyId, b: BodyId) -> Option<CollisionPair> {
            let (la, _, _) = self.bodies.get(&a)?;
            let (lb, _, _) = self.bodies.get(&b)?;
            Some(CollisionPair::new(a, la, b, lb))
        }

        fn add(&mut self, label: &str, pos: Vec2) -> BodyId {
            self.next_id += 1;
            let id = BodyId(self.next_id);
            self.bodies.insert(id, (label.to_string(), pos, Vec2::ZERO));
            id
        }
    }

    impl PhysicsBodies for StillTable {
        fn create_circle_body(&mut self, label: &str, pos: Vec2, _r: f32, _p: BodyProps) -> BodyId {
            self.add(label, pos)
        }
        fn create_static_body(
            &mut self,
            label: &str,
            pos: Vec2,
            _shape: BodyShape,
            _sensor: bool,
            _props: BodyProps,
        ) -> BodyId {
            self.add(label, pos)
        }
        fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
            if let Some(body) = self.bodies.get_mut(&id) {
                body.2 = vel;
            }
        }
        fn set_position(&mut self, id: BodyId, pos: Vec2) {
            if let Some(body) = self.bodies.get_mut(&id) {
                body.1 = pos;
            }
        }
        fn remove_body(&mut self, id: BodyId) {
            self.bodies.remove(&id);
        }
        fn set_enabled(&mut self, id: BodyId, enabled: bool) {
            if enabled {
                self.disabled.remove(&id);
            } else {
                self.disabled.insert(id);
            }
        }
        fn apply_force(&mut self, id: BodyId, _origin: Vec2, force: Vec2) {
            self.impulses.push((id, force));
        }
        fn position(&self, id: BodyId) -> Option<Vec2> {
            self.bodies.get(&id).map(|b| b.1)
        }
        fn velocity(&self, id: BodyId) -> Option<Vec2> {
            self.bodies.get(&id).map(|b| b.2)
        }
        fn step(&mut self, events: &mut Vec<CollisionPair>) {
            if self.scripted.is_empty() {
                return;
            }
            for (a, b) in self.scripted.remove(0) {
                if let Some(pair) = self.pair(a, b) {
                    events.push(pair);
                }
            }
        }
        fn clear(&mut self) {
            self.bodies.clear();
            self.disabled.clear();
        }
    }

    fn started_game() -> SnookerGame<StillTable> {
        let mut game = SnookerGame::new(SnookerConfig::default(), StillTable::default()).unwrap();
        game.handle_input(InputEvent::Custom { kind: CUSTOM_START, a: 0.0, b: 0.0, c: 0.0 });
        game
    }

    fn id_of(game: &SnookerGame<StillTable>, role: BallRole) -> BodyId {
        game.registry().find_role(role).unwrap().id
    }

    fn pocket(game: &SnookerGame<StillTable>) -> BodyId {
        *game
            .physics()
            .bodies
            .iter()
            .find(|(_, b)| b.0 == POCKET_LABEL)
            .unwrap()
            .0
    }

    fn confirm(game: &mut SnookerGame<StillTable>) {
        game.handle_input(InputEvent::KeyPress { key_code: KEY_ENTER });
        assert_eq!(game.state().phase, Phase::AwaitingShot);
    }

    fn run_until_settled(game: &mut SnookerGame<StillTable>) {
        for _ in 0..(SETTLE_GRACE_STEPS + 2) {
            game.frame(1.0 / 60.0);
        }
    }

    #[test]
    fn new_game_racks_twenty_two_balls() {
        let game = SnookerGame::new(SnookerConfig::default(), StillTable::default()).unwrap();
        assert_eq!(game.registry().len(), 22);
        assert_eq!(game.registry().active_reds(), 15);
        assert_eq!(game.state().phase, Phase::BallInHand);
        // 6 cushions + 6 pockets + 22 balls
        assert_eq!(game.physics().bodies.len(), 34);
        assert!(!game.started());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SnookerConfig { table_width: -1.0, ..SnookerConfig::default() };
        assert!(SnookerGame::new(config, StillTable::default()).is_err());
    }

    #[test]
    fn input_is_ignored_until_start() {
        let mut game = SnookerGame::new(SnookerConfig::default(), StillTable::default()).unwrap();
        game.handle_input(InputEvent::KeyPress { key_code: KEY_ENTER });
        assert_eq!(game.state().phase, Phase::BallInHand);
        game.handle_input(InputEvent::KeyPress { key_code: KEY_ARROW_UP });
        assert_eq!(game.power(), DEFAULT_POWER);
    }

    #[test]
    fn power_is_clamped() {
        let mut game = started_game();
        game.handle_input(InputEvent::Custom { kind: CUSTOM_SET_POWER, a: 50.0, b: 0.0, c: 0.0 });
        assert_eq!(game.power(), MAX_POWER);
        game.handle_input(InputEvent::KeyPress { key_code: KEY_ARROW_UP });
        assert_eq!(game.power(), MAX_POWER);
        game.set_power(0);
        assert_eq!(game.power(), MIN_POWER);
        game.handle_input(InputEvent::KeyPress { key_code: KEY_ARROW_DOWN });
        assert_eq!(game.power(), MIN_POWER);
    }

    #[test]
    fn placement_must_be_inside_the_d_and_clear() {
        let mut game = started_game();
        let center = game.geometry().center();
        assert!(matches!(
            game.place_cue_ball(center),
            Err(SnookerError::InvalidPlacement { .. })
        ));
        // The brown sits on the D's straight edge.
        let brown = game.geometry().spot(BallRole::Brown);
        assert!(game.place_cue_ball(brown).is_err());

        let spot = game.geometry().spot(BallRole::Cue) + Vec2::new(-10.0, 5.0);
        game.place_cue_ball(spot).unwrap();
        let cue = id_of(&game, BallRole::Cue);
        assert_eq!(game.physics().position(cue), Some(spot));
        assert_eq!(game.registry().find(cue).unwrap().pos, spot);
    }

    #[test]
    fn shot_needs_awaiting_phase() {
        let mut game = started_game();
        assert!(!game.shoot(game.geometry().center()));
        confirm(&mut game);
        let cue = id_of(&game, BallRole::Cue);
        assert!(game.shoot(game.geometry().center()));
        assert_eq!(game.state().phase, Phase::ShotInFlight);
        let (id, impulse) = game.physics().impulses[0];
        assert_eq!(id, cue);
        assert!((impulse.length() - 10.0 * 750.0).abs() < 0.01);
        assert!(impulse.x > 0.0);
    }

    #[test]
    fn potted_red_is_scored_and_removed_from_physics() {
        let mut game = started_game();
        confirm(&mut game);
        let cue = id_of(&game, BallRole::Cue);
        let red = id_of(&game, BallRole::Red);
        let pocket = pocket(&game);
        game.physics_mut().scripted = vec![vec![(cue, red)], vec![(pocket, red)]];
        assert!(game.shoot(game.geometry().center()));
        run_until_settled(&mut game);

        assert_eq!(game.state().scores, [1, 0]);
        assert_eq!(game.state().reds_remaining, 14);
        assert!(game.state().on_color);
        assert_eq!(game.physics().position(red), None);
        assert_eq!(game.state().current_player, Player::One);
        assert_eq!(game.state().phase, Phase::AwaitingShot);
    }

    #[test]
    fn potted_cue_sits_out_the_rest_of_the_shot() {
        let mut game = started_game();
        confirm(&mut game);
        let cue = id_of(&game, BallRole::Cue);
        let black = id_of(&game, BallRole::Black);
        let pocket = pocket(&game);
        game.physics_mut().scripted = vec![vec![(pocket, cue)], vec![(black, cue)]];
        assert!(game.shoot(game.geometry().center()));

        game.frame(1.0 / 60.0);
        assert!(game.physics().disabled.contains(&cue));
        assert!(!game.registry().find(cue).unwrap().active);
        game.frame(1.0 / 60.0);
        run_until_settled(&mut game);

        // Only the in-off: the later touch on the black costs nothing.
        assert_eq!(game.state().scores, [0, 4]);
        assert_eq!(game.state().current_player, Player::Two);
        assert_eq!(game.state().phase, Phase::BallInHand);
        assert_eq!(game.notice().map(|n| n.reason), Some(FoulReason::CuePotted));
        let spot = game.geometry().spot(BallRole::Cue);
        assert!(!game.physics().disabled.contains(&cue));
        assert_eq!(game.physics().position(cue), Some(spot));
        assert_eq!(game.registry().find(cue).unwrap().pos, spot);
        assert!(game.registry().find(cue).unwrap().active);
    }

    #[test]
    fn potted_color_is_respotted_once_the_table_settles() {
        let mut game = started_game();
        confirm(&mut game);
        let cue = id_of(&game, BallRole::Cue);
        let pink = id_of(&game, BallRole::Pink);
        let pocket = pocket(&game);
        // Pink first while on a red, then the pink drops.
        game.physics_mut().scripted = vec![vec![(cue, pink)], vec![(pink, pocket)]];
        assert!(game.shoot(game.geometry().center()));
        game.frame(1.0 / 60.0);
        game.frame(1.0 / 60.0);
        assert!(game.physics().disabled.contains(&pink));

        run_until_settled(&mut game);
        assert_eq!(game.state().scores, [-6, 6]);
        assert!(!game.physics().disabled.contains(&pink));
        assert_eq!(game.physics().position(pink), Some(game.geometry().spot(BallRole::Pink)));
    }

    #[test]
    fn settle_check_waits_out_the_grace_steps() {
        let mut game = started_game();
        confirm(&mut game);
        assert!(game.shoot(game.geometry().center()));
        for _ in 0..SETTLE_GRACE_STEPS {
            game.frame(1.0 / 60.0);
            assert_eq!(game.state().phase, Phase::ShotInFlight);
        }
        game.frame(1.0 / 60.0);
        assert_eq!(game.state().phase, Phase::AwaitingShot);
        assert_eq!(game.state().current_player, Player::Two);
    }

    #[test]
    fn shot_resolves_only_when_every_ball_is_at_rest_speed() {
        let mut game = started_game();
        confirm(&mut game);
        let red = id_of(&game, BallRole::Red);
        let rest = game.config().rest_speed;
        assert!(game.shoot(game.geometry().center()));
        game.physics_mut().set_velocity(red, Vec2::new(rest * 2.0, 0.0));
        for _ in 0..30 {
            game.frame(1.0 / 60.0);
        }
        assert_eq!(game.state().phase, Phase::ShotInFlight);

        // At the threshold counts as stopped.
        game.physics_mut().set_velocity(red, Vec2::new(0.0, rest));
        game.frame(1.0 / 60.0);
        assert_eq!(game.state().phase, Phase::AwaitingShot);
        assert_eq!(game.physics().velocity(red), Some(Vec2::ZERO));
    }

    #[test]
    fn ball_leaving_the_table_counts_as_potted() {
        let mut game = started_game();
        confirm(&mut game);
        let cue = id_of(&game, BallRole::Cue);
        let red = id_of(&game, BallRole::Red);
        game.physics_mut().scripted = vec![vec![(cue, red)]];
        assert!(game.shoot(game.geometry().center()));
        game.frame(1.0 / 60.0);

        game.physics_mut().set_position(red, Vec2::new(-100.0, -100.0));
        game.frame(1.0 / 60.0);
        assert_eq!(game.state().scores, [1, 0]);
        assert_eq!(game.state().reds_remaining, 14);
        assert_eq!(game.physics().position(red), None);

        run_until_settled(&mut game);
        assert_eq!(game.state().current_player, Player::One);
        assert!(game.state().on_color);
        assert_eq!(game.state().phase, Phase::AwaitingShot);
    }

    #[test]
    fn shot_touching_nothing_is_a_miss() {
        let mut game = started_game();
        confirm(&mut game);
        assert!(game.shoot(game.geometry().center()));
        run_until_settled(&mut game);

        assert_eq!(game.state().scores, [0, 4]);
        assert_eq!(game.state().current_player, Player::Two);
        assert_eq!(game.notice().map(|n| n.reason), Some(FoulReason::Miss));
    }

    #[test]
    fn clicks_report_what_they_did() {
        let mut game = started_game();
        let center = game.geometry().center();
        assert_eq!(
            game.handle_input(InputEvent::Click { x: center.x, y: center.y }),
            vec![Outcome::FoulSignal { reason: FoulReason::InvalidPlacement }]
        );
        assert_eq!(game.notice().map(|n| n.reason), Some(FoulReason::InvalidPlacement));
        assert_eq!(game.state().phase, Phase::BallInHand);
        assert_eq!(game.state().scores, [0, 0]);

        let cue = id_of(&game, BallRole::Cue);
        let spot = game.geometry().spot(BallRole::Cue) + Vec2::new(-10.0, 5.0);
        assert_eq!(
            game.handle_input(InputEvent::Click { x: spot.x, y: spot.y }),
            vec![Outcome::RespotBall { ball: cue, position: spot }]
        );
        assert_eq!(game.physics().position(cue), Some(spot));
        confirm(&mut game);

        assert_eq!(
            game.handle_input(InputEvent::Click { x: center.x, y: center.y }),
            vec![Outcome::SetPhase { phase: Phase::ShotInFlight }]
        );
        assert_eq!(game.state().phase, Phase::ShotInFlight);
        // Mid-shot clicks do nothing.
        assert!(game.handle_input(InputEvent::Click { x: center.x, y: center.y }).is_empty());
    }

    #[test]
    fn notice_clears_after_its_time() {
        let mut game = started_game();
        game.place_cue_ball(game.geometry().spot(BallRole::Cue)).unwrap();
        // Drag the cue ball out of the D behind the game's back, then confirm.
        let cue = id_of(&game, BallRole::Cue);
        game.registry.sync_position(cue, game.geometry().center(), Vec2::ZERO);
        game.confirm_placement();
        assert_eq!(game.notice().map(|n| n.reason), Some(FoulReason::InvalidPlacement));
        assert_eq!(game.state().phase, Phase::BallInHand);

        for _ in 0..60 {
            game.frame(1.0 / 60.0);
        }
        assert!(game.notice().is_some());
        for _ in 0..61 {
            game.frame(1.0 / 60.0);
        }
        assert!(game.notice().is_none());
    }

    #[test]
    fn clock_expiry_through_frames() {
        let mut game = started_game();
        confirm(&mut game);
        for _ in 0..(60 * 60 + 5) {
            game.frame(1.0 / 60.0);
        }
        assert_eq!(game.state().current_player, Player::Two);
        assert_eq!(game.state().scores, [0, 0]);
        assert_eq!(game.notice().map(|n| n.reason), Some(FoulReason::TimeViolation));
    }

    #[test]
    fn number_keys_reset_with_a_new_layout() {
        let mut game = started_game();
        confirm(&mut game);
        game.handle_input(InputEvent::KeyPress { key_code: KEY_DIGIT_1 + 2 });
        assert_eq!(game.layout_mode(), LayoutMode::RandomAll);
        assert_eq!(game.state().phase, Phase::BallInHand);
        assert_eq!(game.registry().len(), 22);
        assert_eq!(game.physics().bodies.len(), 34);
        // Starting survives a reset.
        assert!(game.started());
    }

    #[test]
    fn hud_reports_state_and_balls() {
        let mut game = started_game();
        game.frame(1.0 / 60.0);
        let kinds: Vec<f32> = game.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                protocol::EVENT_HELLO,
                protocol::EVENT_SCORE,
                protocol::EVENT_PHASE,
                protocol::EVENT_CLOCK,
            ]
        );
        assert_eq!(game.ball_data().len(), 22 * protocol::BALL_FLOATS);
        assert_eq!(game.events()[3].b, DEFAULT_POWER as f32);
    }
}
