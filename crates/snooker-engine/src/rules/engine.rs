//! Snooker rules: classified events in, outcomes out.
//!
//! The engine never mutates game state. It reads the turn state and registry
//! as they stand after all previous outcomes were applied and returns the
//! consequences of one event. A small per-shot ledger remembers what has
//! already happened during the current shot.

use glam::Vec2;

use crate::api::config::RuleConfig;
use crate::api::types::BodyId;
use crate::core::ball::BallRole;
use crate::core::registry::BallRegistry;
use crate::core::table::TableGeometry;
use crate::rules::classify::ClassifiedEvent;
use crate::rules::outcome::{FoulReason, Outcome, Phase};
use crate::rules::turn::TurnState;

/// What the current shot has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ShotLedger {
    /// The first cue-ball contact has been judged.
    first_contact_seen: bool,
    /// The cue ball touched at least one object ball.
    object_contacted: bool,
    fouled: bool,
    directive_issued: bool,
}

pub struct RuleEngine {
    rules: RuleConfig,
    shot: ShotLedger,
}

impl RuleEngine {
    pub fn new(rules: RuleConfig) -> Self {
        Self {
            rules,
            shot: ShotLedger::default(),
        }
    }

    /// Forget everything about the previous shot.
    pub fn begin_shot(&mut self) {
        self.shot = ShotLedger::default();
    }

    /// Outcomes for one classified event. Events outside a shot are ignored.
    pub fn process(
        &mut self,
        event: &ClassifiedEvent,
        state: &TurnState,
        registry: &BallRegistry,
        geometry: &TableGeometry,
    ) -> Vec<Outcome> {
        if state.phase != Phase::ShotInFlight {
            log::debug!("{:?} outside a shot, ignored", event);
            return Vec::new();
        }
        let outcomes = match *event {
            ClassifiedEvent::Potting { ball, role } => {
                match registry.find(ball) {
                    Ok(b) if b.active => self.potted(ball, role, state, geometry),
                    Ok(_) => {
                        log::debug!("{:?} already off the table", ball);
                        Vec::new()
                    }
                    Err(e) => {
                        log::warn!("pot ignored: {}", e);
                        Vec::new()
                    }
                }
            }
            ClassifiedEvent::CueFirstContact { object, role } => {
                let cue_on_table = registry.cue_ball().is_some_and(|b| b.active);
                let object_on_table = registry.find(object).is_ok_and(|b| b.active);
                if cue_on_table && object_on_table {
                    self.cue_contact(role, state)
                } else {
                    log::debug!("contact with {:?} while off the table, ignored", object);
                    Vec::new()
                }
            }
            ClassifiedEvent::CushionContact
            | ClassifiedEvent::BallContact
            | ClassifiedEvent::Ignored => Vec::new(),
        };
        self.record(&outcomes);
        outcomes
    }

    fn potted(
        &self,
        ball: BodyId,
        role: BallRole,
        state: &TurnState,
        geometry: &TableGeometry,
    ) -> Vec<Outcome> {
        let shooter = state.current_player;
        let opponent = shooter.opponent();

        if role == BallRole::Cue {
            log::info!("cue ball potted");
            return vec![
                Outcome::ScoreDelta {
                    player: opponent,
                    amount: self.rules.foul_value(BallRole::Cue.value()),
                },
                Outcome::RespotBall { ball, position: geometry.spot(BallRole::Cue) },
                Outcome::SetPhase { phase: Phase::BallInHand },
                Outcome::FoulSignal { reason: FoulReason::CuePotted },
                Outcome::SwitchTurn,
            ];
        }

        if role == BallRole::Red {
            log::info!("red potted by player {}", shooter.number());
            return vec![
                Outcome::ScoreDelta { player: shooter, amount: role.value() },
                Outcome::RemoveBall { ball },
                Outcome::SetOnColor { on_color: true },
                Outcome::RetainTurn,
            ];
        }

        // Colors from here on.
        if state.only_colored {
            log::info!("{:?} potted for good by player {}", role, shooter.number());
            return vec![
                Outcome::ScoreDelta { player: shooter, amount: role.value() },
                Outcome::RemoveBall { ball },
                Outcome::RetainTurn,
            ];
        }

        let respot = Outcome::RespotBall { ball, position: geometry.spot(role) };
        if state.on_color {
            log::info!("{:?} potted by player {}", role, shooter.number());
            vec![
                Outcome::ScoreDelta { player: shooter, amount: role.value() },
                respot,
                Outcome::SetOnColor { on_color: false },
                Outcome::RetainTurn,
            ]
        } else {
            log::info!("{:?} potted while on a red", role);
            vec![
                Outcome::ScoreDelta {
                    player: shooter,
                    amount: -self.rules.foul_value(role.value()),
                },
                respot,
                Outcome::FoulSignal { reason: FoulReason::WrongBallPotted },
                Outcome::SwitchTurn,
            ]
        }
    }

    fn cue_contact(&mut self, role: BallRole, state: &TurnState) -> Vec<Outcome> {
        self.shot.object_contacted = true;
        if self.shot.first_contact_seen {
            return Vec::new();
        }
        self.shot.first_contact_seen = true;

        let opponent = state.current_player.opponent();
        let on_color = state.on_color || state.only_colored;
        if !on_color && role.is_color() {
            log::info!("first contact {:?} while on a red", role);
            vec![
                Outcome::ScoreDelta { player: opponent, amount: self.rules.foul_value(role.value()) },
                Outcome::FoulSignal { reason: FoulReason::WrongBallFirst },
                Outcome::SwitchTurn,
            ]
        } else if on_color && role == BallRole::Red {
            log::info!("first contact a red while on a color");
            vec![
                Outcome::ScoreDelta { player: opponent, amount: self.rules.foul_value(role.value()) },
                Outcome::SetOnColor { on_color: false },
                Outcome::FoulSignal { reason: FoulReason::WrongBallFirst },
                Outcome::SwitchTurn,
            ]
        } else {
            Vec::new()
        }
    }

    /// Final outcomes of a shot once every ball has settled.
    ///
    /// A shot that touched nothing is a miss; a shot with no turn decision
    /// (nothing legally potted) passes the turn.
    pub fn resolve_shot(&mut self, state: &TurnState) -> Vec<Outcome> {
        let opponent = state.current_player.opponent();
        let outcomes = if self.rules.penalize_miss && !self.shot.object_contacted && !self.shot.fouled {
            log::info!("cue ball touched nothing");
            vec![
                Outcome::ScoreDelta { player: opponent, amount: self.rules.foul_value(0) },
                Outcome::FoulSignal { reason: FoulReason::Miss },
                Outcome::SwitchTurn,
            ]
        } else if !self.shot.directive_issued {
            vec![Outcome::SwitchTurn]
        } else {
            Vec::new()
        };
        self.record(&outcomes);
        outcomes
    }

    /// BallInHand -> AwaitingShot when `pos` is inside the D, otherwise an
    /// advisory foul and the phase stays.
    pub fn confirm_placement(
        &self,
        pos: Vec2,
        registry: &BallRegistry,
        geometry: &TableGeometry,
    ) -> Vec<Outcome> {
        let cue = registry.cue_ball();
        match cue {
            Some(cue) if geometry.in_d(pos) => vec![
                Outcome::RespotBall { ball: cue.id, position: pos },
                Outcome::SetPhase { phase: Phase::AwaitingShot },
            ],
            Some(_) => self.invalid_placement(),
            None => {
                log::warn!("no cue ball to place");
                Vec::new()
            }
        }
    }

    /// The cue ball was put down outside the D or on another ball. Advisory
    /// only: nothing is scored and the cue ball stays in hand.
    pub fn invalid_placement(&self) -> Vec<Outcome> {
        log::debug!("cue ball placement rejected");
        vec![Outcome::FoulSignal { reason: FoulReason::InvalidPlacement }]
    }

    /// The shot clock ran out before the shot was taken.
    pub fn shot_clock_expired(&self, state: &TurnState) -> Vec<Outcome> {
        log::info!("player {} ran out of time", state.current_player.number());
        let mut outcomes = Vec::with_capacity(3);
        if self.rules.time_violation_penalty > 0 {
            outcomes.push(Outcome::ScoreDelta {
                player: state.current_player.opponent(),
                amount: self.rules.time_violation_penalty,
            });
        }
        outcomes.push(Outcome::FoulSignal { reason: FoulReason::TimeViolation });
        outcomes.push(Outcome::SwitchTurn);
        outcomes
    }

    fn record(&mut self, outcomes: &[Outcome]) {
        for outcome in outcomes {
            if outcome.is_turn_directive() {
                self.shot.directive_issued = true;
            }
            if outcome.is_foul() {
                self.shot.fouled = true;
            }
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Player;
    use crate::core::ball::Ball;

    struct Table {
        engine: RuleEngine,
        state: TurnState,
        registry: BallRegistry,
        geometry: TableGeometry,
    }

    const CUE: BodyId = BodyId(1);
    const RED: BodyId = BodyId(2);
    const YELLOW: BodyId = BodyId(3);
    const BLACK: BodyId = BodyId(4);

    fn table() -> Table {
        let mut registry = BallRegistry::new();
        registry.add(Ball::new(CUE, BallRole::Cue)).unwrap();
        registry.add(Ball::new(RED, BallRole::Red)).unwrap();
        registry.add(Ball::new(YELLOW, BallRole::Yellow)).unwrap();
        registry.add(Ball::new(BLACK, BallRole::Black)).unwrap();
        let mut state = TurnState::default();
        state.phase = Phase::ShotInFlight;
        Table {
            engine: RuleEngine::default(),
            state,
            registry,
            geometry: TableGeometry::default(),
        }
    }

    impl Table {
        fn process(&mut self, event: ClassifiedEvent) -> Vec<Outcome> {
            self.engine.process(&event, &self.state, &self.registry, &self.geometry)
        }
    }

    fn pot(ball: BodyId, role: BallRole) -> ClassifiedEvent {
        ClassifiedEvent::Potting { ball, role }
    }

    fn contact(object: BodyId, role: BallRole) -> ClassifiedEvent {
        ClassifiedEvent::CueFirstContact { object, role }
    }

    #[test]
    fn cue_potted_is_a_foul_with_ball_in_hand() {
        let mut t = table();
        let out = t.process(pot(CUE, BallRole::Cue));
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::Two, amount: 4 },
                Outcome::RespotBall { ball: CUE, position: t.geometry.spot(BallRole::Cue) },
                Outcome::SetPhase { phase: Phase::BallInHand },
                Outcome::FoulSignal { reason: FoulReason::CuePotted },
                Outcome::SwitchTurn,
            ]
        );
    }

    #[test]
    fn red_scores_and_puts_shooter_on_a_color() {
        let mut t = table();
        let out = t.process(pot(RED, BallRole::Red));
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::One, amount: 1 },
                Outcome::RemoveBall { ball: RED },
                Outcome::SetOnColor { on_color: true },
                Outcome::RetainTurn,
            ]
        );
    }

    #[test]
    fn color_on_a_color_is_respotted() {
        let mut t = table();
        t.state.on_color = true;
        let out = t.process(pot(YELLOW, BallRole::Yellow));
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::One, amount: 2 },
                Outcome::RespotBall { ball: YELLOW, position: t.geometry.spot(BallRole::Yellow) },
                Outcome::SetOnColor { on_color: false },
                Outcome::RetainTurn,
            ]
        );
    }

    #[test]
    fn color_on_a_red_costs_the_shooter() {
        let mut t = table();
        let out = t.process(pot(BLACK, BallRole::Black));
        assert_eq!(out[0], Outcome::ScoreDelta { player: Player::One, amount: -7 });
        assert!(out.contains(&Outcome::FoulSignal { reason: FoulReason::WrongBallPotted }));
        assert_eq!(out.last(), Some(&Outcome::SwitchTurn));

        // Low colors are floored at four.
        let out = t.process(pot(YELLOW, BallRole::Yellow));
        assert_eq!(out[0], Outcome::ScoreDelta { player: Player::One, amount: -4 });
    }

    #[test]
    fn colors_only_removes_for_good() {
        let mut t = table();
        t.state.reds_remaining = 0;
        t.state.only_colored = true;
        let out = t.process(pot(BLACK, BallRole::Black));
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::One, amount: 7 },
                Outcome::RemoveBall { ball: BLACK },
                Outcome::RetainTurn,
            ]
        );
    }

    #[test]
    fn removed_ball_pots_are_ignored() {
        let mut t = table();
        t.registry.remove(RED).unwrap();
        assert!(t.process(pot(RED, BallRole::Red)).is_empty());
        assert!(t.process(pot(BodyId(77), BallRole::Red)).is_empty());
    }

    #[test]
    fn contacts_with_a_parked_cue_are_ignored() {
        let mut t = table();
        t.engine.begin_shot();
        t.registry.park(CUE).unwrap();
        assert!(t.process(contact(BLACK, BallRole::Black)).is_empty());

        // A potted color is off the table too until respotted.
        t.registry.respot(CUE, t.geometry.spot(BallRole::Cue)).unwrap();
        t.registry.park(YELLOW).unwrap();
        assert!(t.process(contact(YELLOW, BallRole::Yellow)).is_empty());
        // Neither touch counted as the first contact.
        assert_eq!(t.process(contact(RED, BallRole::Red)), Vec::new());
        assert_eq!(t.process(contact(BLACK, BallRole::Black)), Vec::new());
    }

    #[test]
    fn wrong_first_contact_on_a_red() {
        let mut t = table();
        let out = t.process(contact(BLACK, BallRole::Black));
        assert_eq!(out[0], Outcome::ScoreDelta { player: Player::Two, amount: 7 });
        assert!(out.contains(&Outcome::FoulSignal { reason: FoulReason::WrongBallFirst }));
    }

    #[test]
    fn red_first_while_on_a_color() {
        let mut t = table();
        t.state.on_color = true;
        let out = t.process(contact(RED, BallRole::Red));
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::Two, amount: 4 },
                Outcome::SetOnColor { on_color: false },
                Outcome::FoulSignal { reason: FoulReason::WrongBallFirst },
                Outcome::SwitchTurn,
            ]
        );
    }

    #[test]
    fn only_the_first_contact_is_judged() {
        let mut t = table();
        t.process(ClassifiedEvent::CushionContact);
        assert!(t.process(contact(RED, BallRole::Red)).is_empty());
        // A later color contact is fine.
        assert!(t.process(contact(BLACK, BallRole::Black)).is_empty());
    }

    #[test]
    fn legal_contacts_produce_nothing() {
        let mut t = table();
        assert!(t.process(contact(RED, BallRole::Red)).is_empty());
        let mut t = table();
        t.state.on_color = true;
        assert!(t.process(contact(YELLOW, BallRole::Yellow)).is_empty());
    }

    #[test]
    fn events_outside_a_shot_do_nothing() {
        let mut t = table();
        t.state.phase = Phase::AwaitingShot;
        assert!(t.process(pot(RED, BallRole::Red)).is_empty());
    }

    #[test]
    fn miss_when_nothing_was_touched() {
        let mut t = table();
        t.engine.begin_shot();
        t.process(ClassifiedEvent::CushionContact);
        let out = t.engine.resolve_shot(&t.state);
        assert_eq!(
            out,
            vec![
                Outcome::ScoreDelta { player: Player::Two, amount: 4 },
                Outcome::FoulSignal { reason: FoulReason::Miss },
                Outcome::SwitchTurn,
            ]
        );
    }

    #[test]
    fn miss_can_be_switched_off() {
        let mut t = table();
        t.engine = RuleEngine::new(RuleConfig { penalize_miss: false, ..RuleConfig::default() });
        t.engine.begin_shot();
        assert_eq!(t.engine.resolve_shot(&t.state), vec![Outcome::SwitchTurn]);
    }

    #[test]
    fn plain_shot_passes_the_turn() {
        let mut t = table();
        t.engine.begin_shot();
        t.process(contact(RED, BallRole::Red));
        assert_eq!(t.engine.resolve_shot(&t.state), vec![Outcome::SwitchTurn]);
    }

    #[test]
    fn potting_shot_adds_nothing_at_resolution() {
        let mut t = table();
        t.engine.begin_shot();
        t.process(contact(RED, BallRole::Red));
        t.process(pot(RED, BallRole::Red));
        assert!(t.engine.resolve_shot(&t.state).is_empty());
    }

    #[test]
    fn cue_in_pocket_is_not_also_a_miss() {
        let mut t = table();
        t.engine.begin_shot();
        t.process(pot(CUE, BallRole::Cue));
        assert!(t.engine.resolve_shot(&t.state).is_empty());
    }

    #[test]
    fn placement_inside_and_outside_the_d() {
        let t = table();
        let inside = t.geometry.spot(BallRole::Cue);
        assert_eq!(
            t.engine.confirm_placement(inside, &t.registry, &t.geometry),
            vec![
                Outcome::RespotBall { ball: CUE, position: inside },
                Outcome::SetPhase { phase: Phase::AwaitingShot },
            ]
        );
        let outside = t.geometry.center();
        assert_eq!(
            t.engine.confirm_placement(outside, &t.registry, &t.geometry),
            vec![Outcome::FoulSignal { reason: FoulReason::InvalidPlacement }]
        );
    }

    #[test]
    fn time_violation_has_no_penalty_by_default() {
        let t = table();
        assert_eq!(
            t.engine.shot_clock_expired(&t.state),
            vec![
                Outcome::FoulSignal { reason: FoulReason::TimeViolation },
                Outcome::SwitchTurn,
            ]
        );
        let strict = RuleEngine::new(RuleConfig { time_violation_penalty: 4, ..RuleConfig::default() });
        assert_eq!(
            strict.shot_clock_expired(&t.state)[0],
            Outcome::ScoreDelta { player: Player::Two, amount: 4 }
        );
    }
}
