//! Turn state and the only code that writes it.

use glam::Vec2;
use serde::Serialize;

use crate::api::types::{BodyId, Player};
use crate::core::ball::BallRole;
use crate::core::layout::RED_COUNT;
use crate::core::registry::BallRegistry;
use crate::core::time::ShotClock;
use crate::rules::outcome::{Outcome, Phase};

/// Scores, phase and flags for the frame in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnState {
    pub current_player: Player,
    /// Indexed by player (One, Two). Scores may go negative.
    pub scores: [i32; 2],
    pub phase: Phase,
    pub reds_remaining: u32,
    /// True exactly when no reds remain.
    pub only_colored: bool,
    /// The shooter potted a red and must now play a color.
    pub on_color: bool,
    pub shot_clock: ShotClock,
}

impl TurnState {
    pub fn new(shot_clock_secs: u32) -> Self {
        Self {
            current_player: Player::One,
            scores: [0, 0],
            phase: Phase::BallInHand,
            reds_remaining: RED_COUNT as u32,
            only_colored: false,
            on_color: false,
            shot_clock: ShotClock::new(shot_clock_secs),
        }
    }

    pub fn score(&self, player: Player) -> i32 {
        self.scores[player_index(player)]
    }

    /// Seconds left on the shot clock.
    pub fn clock(&self) -> u32 {
        self.shot_clock.remaining()
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(60)
    }
}

fn player_index(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

/// The turn decision taken when a shot resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirective {
    Switch,
    Retain,
}

/// Applies outcomes to the turn state and the ball registry.
///
/// During a shot, score, removal and flag changes land immediately so later
/// events in the same shot see them, while `SwitchTurn`/`RetainTurn` and
/// `SetPhase` are held until [`TurnController::resolve`]. A ball respotted
/// mid-shot is parked off the table and only placed on its spot at
/// resolution. Exactly one turn directive is executed per shot.
pub struct TurnController {
    state: TurnState,
    switch_requested: bool,
    retain_requested: bool,
    next_phase: Option<Phase>,
    pending_respots: Vec<(BodyId, Vec2)>,
}

impl TurnController {
    pub fn new(shot_clock_secs: u32) -> Self {
        Self {
            state: TurnState::new(shot_clock_secs),
            switch_requested: false,
            retain_requested: false,
            next_phase: None,
            pending_respots: Vec::new(),
        }
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Start a fresh frame: scores zeroed, player one in hand.
    pub fn reset(&mut self) {
        let secs = self.state.shot_clock.duration();
        *self = Self::new(secs);
        log::info!("turn state reset");
    }

    /// Override the reds count and phase flag, e.g. for a layout with fewer reds.
    pub fn set_reds_remaining(&mut self, reds: u32) {
        self.state.reds_remaining = reds;
        self.state.only_colored = reds == 0;
        if self.state.only_colored {
            self.state.on_color = false;
        }
    }

    /// AwaitingShot -> ShotInFlight.
    pub fn begin_shot(&mut self) {
        self.switch_requested = false;
        self.retain_requested = false;
        self.next_phase = None;
        self.pending_respots.clear();
        self.state.phase = Phase::ShotInFlight;
    }

    pub fn in_shot(&self) -> bool {
        self.state.phase == Phase::ShotInFlight
    }

    /// Apply outcomes in order.
    pub fn apply(&mut self, outcomes: &[Outcome], registry: &mut BallRegistry) {
        for outcome in outcomes {
            self.apply_one(outcome, registry);
        }
    }

    fn apply_one(&mut self, outcome: &Outcome, registry: &mut BallRegistry) {
        match *outcome {
            Outcome::ScoreDelta { player, amount } => {
                self.state.scores[player_index(player)] += amount;
                log::info!(
                    "player {} {:+} (now {})",
                    player.number(),
                    amount,
                    self.state.score(player)
                );
            }
            Outcome::RemoveBall { ball } => {
                let role = registry.find(ball).map(|b| b.role);
                if let Err(e) = registry.remove(ball) {
                    log::warn!("remove failed: {}", e);
                    return;
                }
                if role == Ok(BallRole::Red) {
                    self.set_reds_remaining(self.state.reds_remaining.saturating_sub(1));
                    if self.state.only_colored {
                        log::info!("last red gone, colors only");
                    }
                }
            }
            Outcome::RespotBall { ball, position } => {
                if self.in_shot() {
                    match registry.park(ball) {
                        Ok(()) => self.pending_respots.push((ball, position)),
                        Err(e) => log::warn!("respot failed: {}", e),
                    }
                } else if let Err(e) = registry.respot(ball, position) {
                    log::warn!("respot failed: {}", e);
                }
            }
            Outcome::SetOnColor { on_color } => {
                self.state.on_color = on_color && !self.state.only_colored;
            }
            Outcome::SetPhase { phase } => {
                if self.in_shot() {
                    self.next_phase = Some(phase);
                } else {
                    self.enter_phase(phase);
                }
            }
            Outcome::FoulSignal { reason } => {
                log::info!("foul by player {}: {:?}", self.state.current_player.number(), reason);
            }
            Outcome::SwitchTurn => {
                if self.in_shot() {
                    self.switch_requested = true;
                } else {
                    self.execute(TurnDirective::Switch);
                }
            }
            Outcome::RetainTurn => {
                if self.in_shot() {
                    self.retain_requested = true;
                } else {
                    self.execute(TurnDirective::Retain);
                }
            }
        }
    }

    /// ShotInFlight -> TurnResolved -> AwaitingShot | BallInHand.
    ///
    /// Puts parked balls back on their spots, executes the single turn
    /// directive of the shot and returns it. A switch always wins over a
    /// retain.
    pub fn resolve(&mut self, registry: &mut BallRegistry) -> TurnDirective {
        self.state.phase = Phase::TurnResolved;
        for (ball, position) in self.pending_respots.drain(..) {
            if let Err(e) = registry.respot(ball, position) {
                log::warn!("respot failed: {}", e);
            }
        }
        let directive = match (self.switch_requested, self.retain_requested) {
            (true, true) => {
                log::warn!("DoubleTurnDirective: switch and retain in one shot, switching");
                TurnDirective::Switch
            }
            (true, false) => TurnDirective::Switch,
            (false, true) => TurnDirective::Retain,
            (false, false) => {
                log::warn!("shot resolved without a turn directive, switching");
                TurnDirective::Switch
            }
        };
        self.switch_requested = false;
        self.retain_requested = false;

        self.execute(directive);
        let next = self.next_phase.take().unwrap_or(Phase::AwaitingShot);
        self.enter_phase(next);
        directive
    }

    fn execute(&mut self, directive: TurnDirective) {
        match directive {
            TurnDirective::Switch => {
                self.state.current_player = self.state.current_player.opponent();
                // A new visit always starts on a red.
                self.state.on_color = false;
                log::info!("turn passes to player {}", self.state.current_player.number());
            }
            TurnDirective::Retain => {
                log::debug!("player {} continues", self.state.current_player.number());
            }
        }
        self.state.shot_clock.reset();
    }

    fn enter_phase(&mut self, phase: Phase) {
        if phase != self.state.phase {
            log::debug!("phase {:?} -> {:?}", self.state.phase, phase);
        }
        self.state.phase = phase;
        if matches!(phase, Phase::AwaitingShot | Phase::BallInHand) {
            self.state.shot_clock.reset();
        }
    }

    /// Seconds of elapsed time to whole clock ticks.
    pub fn advance_clock(&mut self, dt: f32) -> u32 {
        self.state.shot_clock.advance(dt)
    }

    /// One second passes. Returns true when the clock runs out while the
    /// shooter is deciding. The clock does not run in any other phase.
    pub fn tick(&mut self) -> bool {
        if self.state.phase != Phase::AwaitingShot {
            return false;
        }
        self.state.shot_clock.tick()
    }
}
