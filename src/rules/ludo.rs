//! The Ludo turn engine.
//!
//! ```text
//! AwaitingRoll --roll--> AwaitingMove --select_move--> TurnEnded --advance--> AwaitingRoll
//!                   \                        \
//!                    `-(no legal move)--> TurnEnded     `-(third rank)--> MatchOver
//! ```
//!
//! Every operation validates first and mutates only once it cannot fail, so a
//! rejected operation never changes the match.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::board::{hop_path, is_legal_move_with, is_safe_cell, ring_cell, target_location};
use crate::core::{
    Action, ActionRecord, EngineError, LegalMoves, Location, Match, PawnId, PhaseKind, PlayerId, RulesConfig,
    TurnEnd, TurnPhase, SEAT_COUNT,
};
use crate::events::GameEvent;

use super::engine::{GameResult, RulesEngine};

/// Die value that earns another roll.
pub const BONUS_ROLL: u8 = 6;

/// Ludo rules, parameterised by `RulesConfig`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LudoRules {
    config: RulesConfig,
}

impl LudoRules {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Pawns of `player` that could move with `dice`.
    #[must_use]
    pub fn legal_moves_for(&self, state: &Match, player: PlayerId, dice: u8) -> LegalMoves {
        state.players[player]
            .pawns
            .iter()
            .filter(|p| is_legal_move_with(p.location, dice, self.config.finish_rule))
            .map(|p| p.id)
            .collect()
    }

    /// Where a pawn would land with the current roll.
    #[must_use]
    pub fn preview(&self, state: &Match, pawn: PawnId) -> Option<Location> {
        let dice = state.dice_value?;
        let from = state.pawn(pawn)?.location;
        target_location(from, dice, self.config.finish_rule)
    }

    /// The seat `advance` would hand the turn to.
    #[must_use]
    pub fn next_turn(&self, state: &Match) -> PlayerId {
        let current = state.turn_index;
        if state.dice_value == Some(BONUS_ROLL) && state.players[current].is_racing() {
            return current;
        }

        let mut seat = current.next();
        for _ in 0..SEAT_COUNT {
            if state.players[seat].is_racing() {
                return seat;
            }
            seat = seat.next();
        }
        current
    }

    fn check_actor(state: &Match, player: PlayerId, action: &'static str, expected: PhaseKind) -> Result<(), EngineError> {
        if state.is_over {
            return Err(EngineError::MatchOver);
        }
        if player != state.turn_index {
            return Err(EngineError::NotYourTurn {
                claimed: player,
                active: state.turn_index,
            });
        }
        if !state.players[player].is_racing() {
            return Err(EngineError::AlreadyFinished(player));
        }
        let phase = state.phase.kind();
        if phase != expected {
            return Err(EngineError::WrongPhase { action, phase });
        }
        Ok(())
    }

    /// Roll the die with the match RNG.
    pub fn roll(&self, state: &mut Match, player: PlayerId) -> Result<Vec<GameEvent>, EngineError> {
        Self::check_actor(state, player, "roll", PhaseKind::AwaitingRoll)?;
        let value = state.rng.roll_die();
        Ok(self.apply_roll(state, player, value, Action::Roll))
    }

    /// Apply a die value decided elsewhere, under the same preconditions as `roll`.
    pub fn roll_with(&self, state: &mut Match, player: PlayerId, value: u8) -> Result<Vec<GameEvent>, EngineError> {
        Self::check_actor(state, player, "roll", PhaseKind::AwaitingRoll)?;
        if !(1..=6).contains(&value) {
            return Err(EngineError::InvalidDieValue(value));
        }
        Ok(self.apply_roll(state, player, value, Action::RollWith(value)))
    }

    fn apply_roll(&self, state: &mut Match, player: PlayerId, value: u8, action: Action) -> Vec<GameEvent> {
        let legal = self.legal_moves_for(state, player, value);
        debug!(%player, value, legal = legal.len(), "rolled");

        state.dice_value = Some(value);
        let record = ActionRecord::new(player, action, Some(value), state.turn_number, state.action_sequence);
        state.record(record);

        let mut events = vec![GameEvent::DiceRolled {
            player,
            value,
            legal: legal.clone(),
        }];
        if legal.is_empty() {
            state.phase = TurnPhase::TurnEnded {
                reason: TurnEnd::NoLegalMove,
            };
            events.push(GameEvent::NoLegalMove { player, value });
        } else {
            state.phase = TurnPhase::AwaitingMove { legal };
        }
        events
    }

    /// Move one of the legal pawns, resolving captures and ranking.
    pub fn select_move(&self, state: &mut Match, player: PlayerId, pawn: PawnId) -> Result<Vec<GameEvent>, EngineError> {
        Self::check_actor(state, player, "move", PhaseKind::AwaitingMove)?;
        let mover = &state.players[player];
        if pawn.color != mover.color {
            return Err(EngineError::ForeignPawn(pawn));
        }
        if !state.legal_moves().contains(&pawn) {
            return Err(EngineError::IllegalMove(pawn));
        }
        let dice = state.dice_value.ok_or(EngineError::IllegalMove(pawn))?;
        let from = state.pawn(pawn).ok_or(EngineError::IllegalMove(pawn))?.location;
        let path = hop_path(from, dice, self.config.finish_rule);
        let to = *path.last().ok_or(EngineError::IllegalMove(pawn))?;

        state.set_location(pawn, to);
        debug!(%player, %pawn, %from, %to, "pawn moved");
        let hops = path.len();
        let mut events = vec![GameEvent::PawnMoved {
            player,
            pawn,
            from,
            to,
            path,
        }];

        self.resolve_captures(state, player, pawn, to, &mut events);
        self.resolve_ranking(state, player, &mut events);

        let record = ActionRecord::new(player, Action::SelectMove(pawn), None, state.turn_number, state.action_sequence);
        state.record(record);
        if !state.is_over {
            state.phase = TurnPhase::TurnEnded {
                reason: TurnEnd::Moved { hops },
            };
        }
        Ok(events)
    }

    fn resolve_captures(&self, state: &mut Match, player: PlayerId, by: PawnId, to: Location, events: &mut Vec<GameEvent>) {
        let Some(cell) = ring_cell(by.color, to) else {
            return;
        };
        if is_safe_cell(cell) {
            return;
        }

        let victims: SmallVec<[(PawnId, Location); 4]> = state
            .players
            .iter()
            .filter(|(seat, opp)| *seat != player && opp.is_racing())
            .flat_map(|(_, opp)| opp.pawns.iter())
            .filter(|p| ring_cell(p.color(), p.location) == Some(cell))
            .map(|p| (p.id, p.location))
            .collect();

        for (pawn, from) in victims {
            state.set_location(pawn, Location::BASE);
            debug!(%pawn, %by, cell, "captured");
            events.push(GameEvent::PawnCaptured { pawn, by, cell, from });
        }
    }

    fn resolve_ranking(&self, state: &mut Match, player: PlayerId, events: &mut Vec<GameEvent>) {
        if !state.players[player].all_home() || !state.players[player].is_racing() {
            return;
        }

        let rank = state.ranked_count() as u8 + 1;
        state.players[player].rank = Some(rank);
        info!(%player, rank, "player finished");
        events.push(GameEvent::PlayerRanked { player, rank });

        if state.ranked_count() == SEAT_COUNT - 1 {
            let last = state
                .players
                .iter()
                .find(|(_, p)| p.is_racing())
                .map(|(seat, _)| seat);
            if let Some(last) = last {
                state.players[last].rank = Some(SEAT_COUNT as u8);
                events.push(GameEvent::PlayerRanked {
                    player: last,
                    rank: SEAT_COUNT as u8,
                });
            }
            state.is_over = true;
            state.phase = TurnPhase::MatchOver;

            let standings: Vec<_> = state.standings().into_iter().map(|(seat, _)| seat).collect();
            info!(?standings, "match over");
            events.push(GameEvent::MatchOver { standings });
        }
    }

    /// Hand the turn on after a move or a dead roll.
    ///
    /// A six keeps the turn with the roller unless they just finished.
    pub fn advance(&self, state: &mut Match) -> Result<Vec<GameEvent>, EngineError> {
        if state.is_over {
            return Err(EngineError::MatchOver);
        }
        let phase = state.phase.kind();
        if phase != PhaseKind::TurnEnded {
            return Err(EngineError::WrongPhase {
                action: "advance",
                phase,
            });
        }

        let from = state.turn_index;
        let to = self.next_turn(state);
        let bonus = to == from && state.dice_value == Some(BONUS_ROLL) && state.players[from].is_racing();

        let record = ActionRecord::new(from, Action::Advance, None, state.turn_number, state.action_sequence);
        state.record(record);
        state.turn_index = to;
        state.dice_value = None;
        state.phase = TurnPhase::AwaitingRoll;
        state.turn_number += 1;
        state.action_sequence = 0;
        debug!(%from, %to, bonus, "turn advanced");

        Ok(vec![GameEvent::TurnAdvanced { from, to, bonus }])
    }
}

impl RulesEngine for LudoRules {
    fn legal_actions(&self, state: &Match, player: PlayerId) -> Vec<Action> {
        if state.is_over || player != state.turn_index {
            return vec![];
        }
        match &state.phase {
            TurnPhase::AwaitingRoll if state.players[player].is_racing() => vec![Action::Roll],
            TurnPhase::AwaitingMove { legal } => legal.iter().map(|&p| Action::SelectMove(p)).collect(),
            TurnPhase::TurnEnded { .. } => vec![Action::Advance],
            _ => vec![],
        }
    }

    fn apply_action(&self, state: &mut Match, player: PlayerId, action: &Action) -> Result<Vec<GameEvent>, EngineError> {
        match *action {
            Action::Roll => self.roll(state, player),
            Action::RollWith(value) => self.roll_with(state, player, value),
            Action::SelectMove(pawn) => self.select_move(state, player, pawn),
            Action::Advance => {
                if !state.is_over && player != state.turn_index {
                    return Err(EngineError::NotYourTurn {
                        claimed: player,
                        active: state.turn_index,
                    });
                }
                self.advance(state)
            }
        }
    }

    fn is_terminal(&self, state: &Match) -> Option<GameResult> {
        state.is_over.then(|| GameResult {
            standings: state.standings().into_iter().map(|(seat, _)| seat).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, FinishRule};

    fn pawn(color: Color, slot: u8) -> PawnId {
        PawnId::new(color, slot).unwrap()
    }

    fn loc(raw: i8) -> Location {
        Location::new(raw).unwrap()
    }

    #[test]
    fn test_roll_six_from_start_frees_all() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);

        let events = rules.roll_with(&mut m, PlayerId(0), 6).unwrap();
        assert_eq!(m.legal_moves().len(), 4);
        assert!(matches!(events[0], GameEvent::DiceRolled { value: 6, .. }));
    }

    #[test]
    fn test_dead_roll_ends_turn() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);

        let events = rules.roll_with(&mut m, PlayerId(0), 4).unwrap();
        assert_eq!(
            m.phase,
            TurnPhase::TurnEnded {
                reason: TurnEnd::NoLegalMove
            }
        );
        assert!(events.iter().any(|e| matches!(e, GameEvent::NoLegalMove { .. })));

        rules.advance(&mut m).unwrap();
        assert_eq!(m.turn_index, PlayerId(1));
        assert_eq!(m.dice_value, None);
        assert_eq!(m.turn_number, 2);
    }

    #[test]
    fn test_wrong_player_rejected_without_mutation() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        let before = m.version;

        let err = rules.roll(&mut m, PlayerId(2)).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotYourTurn {
                claimed: PlayerId(2),
                active: PlayerId(0)
            }
        );
        assert_eq!(m.version, before);
        assert!(m.history.is_empty());
    }

    #[test]
    fn test_double_roll_rejected() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        rules.roll_with(&mut m, PlayerId(0), 6).unwrap();

        let err = rules.roll(&mut m, PlayerId(0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::WrongPhase {
                phase: PhaseKind::AwaitingMove,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_die_value() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        assert_eq!(rules.roll_with(&mut m, PlayerId(0), 7), Err(EngineError::InvalidDieValue(7)));
        assert_eq!(rules.roll_with(&mut m, PlayerId(0), 0), Err(EngineError::InvalidDieValue(0)));
    }

    #[test]
    fn test_select_foreign_or_illegal_pawn() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        m.set_location(pawn(Color::Red, 1), loc(10));
        rules.roll_with(&mut m, PlayerId(0), 3).unwrap();

        assert_eq!(
            rules.select_move(&mut m, PlayerId(0), pawn(Color::Green, 0)),
            Err(EngineError::ForeignPawn(pawn(Color::Green, 0)))
        );
        assert_eq!(
            rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)),
            Err(EngineError::IllegalMove(pawn(Color::Red, 0)))
        );
        assert!(rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 1)).is_ok());
        assert_eq!(m.pawn(pawn(Color::Red, 1)).unwrap().location, loc(13));
    }

    #[test]
    fn test_capture_on_unsafe_cell() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        // Green relative 42 is global 3.
        m.set_location(pawn(Color::Green, 2), loc(42));
        m.set_location(pawn(Color::Red, 0), loc(1));

        rules.roll_with(&mut m, PlayerId(0), 2).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)).unwrap();

        assert_eq!(m.pawn(pawn(Color::Green, 2)).unwrap().location, Location::BASE);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PawnCaptured { cell: 3, from, .. } if *from == loc(42)
        )));
    }

    #[test]
    fn test_no_capture_on_safe_cell() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        // Global 8 is a star cell; blue relative 21 is global 8.
        m.set_location(pawn(Color::Blue, 0), loc(21));
        m.set_location(pawn(Color::Red, 0), loc(5));

        rules.roll_with(&mut m, PlayerId(0), 3).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)).unwrap();

        assert_eq!(m.pawn(pawn(Color::Blue, 0)).unwrap().location, loc(21));
        assert!(!events.iter().any(GameEvent::is_capture));
    }

    #[test]
    fn test_no_self_capture_and_multi_capture() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        m.set_location(pawn(Color::Red, 1), loc(4));
        m.set_location(pawn(Color::Yellow, 0), loc(30)); // global 4
        m.set_location(pawn(Color::Yellow, 1), loc(30));
        m.set_location(pawn(Color::Red, 0), loc(2));

        rules.roll_with(&mut m, PlayerId(0), 2).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)).unwrap();

        assert_eq!(m.pawn(pawn(Color::Red, 1)).unwrap().location, loc(4));
        assert_eq!(m.pawn(pawn(Color::Yellow, 0)).unwrap().location, Location::BASE);
        assert_eq!(m.pawn(pawn(Color::Yellow, 1)).unwrap().location, Location::BASE);
        assert_eq!(events.iter().filter(|e| e.is_capture()).count(), 2);
    }

    #[test]
    fn test_no_capture_inside_home_stretch() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        m.set_location(pawn(Color::Red, 0), loc(49));
        // A green pawn at relative 52 is in its own stretch, not on the ring.
        m.set_location(pawn(Color::Green, 0), loc(52));

        rules.roll_with(&mut m, PlayerId(0), 3).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)).unwrap();
        assert_eq!(m.pawn(pawn(Color::Red, 0)).unwrap().location, loc(52));
        assert_eq!(m.pawn(pawn(Color::Green, 0)).unwrap().location, loc(52));
        assert!(!events.iter().any(GameEvent::is_capture));
    }

    #[test]
    fn test_bonus_turn_on_six() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        rules.roll_with(&mut m, PlayerId(0), 6).unwrap();
        rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 0)).unwrap();

        let events = rules.advance(&mut m).unwrap();
        assert_eq!(m.turn_index, PlayerId(0));
        assert_eq!(
            events,
            vec![GameEvent::TurnAdvanced {
                from: PlayerId(0),
                to: PlayerId(0),
                bonus: true
            }]
        );
    }

    #[test]
    fn test_finishing_on_six_forfeits_bonus() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        for slot in 0..3 {
            m.set_location(pawn(Color::Red, slot), Location::HOME);
        }
        m.set_location(pawn(Color::Red, 3), loc(51));

        rules.roll_with(&mut m, PlayerId(0), 6).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 3)).unwrap();
        assert!(events.contains(&GameEvent::PlayerRanked {
            player: PlayerId(0),
            rank: 1
        }));

        rules.advance(&mut m).unwrap();
        assert_eq!(m.turn_index, PlayerId(1));
    }

    #[test]
    fn test_advance_skips_ranked_players() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        m.players[PlayerId(1)].rank = Some(1);
        m.players[PlayerId(2)].rank = Some(2);

        rules.roll_with(&mut m, PlayerId(0), 2).unwrap();
        rules.advance(&mut m).unwrap();
        assert_eq!(m.turn_index, PlayerId(3));
    }

    #[test]
    fn test_third_finish_ends_match() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        m.players[PlayerId(1)].rank = Some(1);
        m.players[PlayerId(3)].rank = Some(2);
        for slot in 0..3 {
            m.set_location(pawn(Color::Red, slot), Location::HOME);
        }
        m.set_location(pawn(Color::Red, 3), loc(55));

        rules.roll_with(&mut m, PlayerId(0), 2).unwrap();
        let events = rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 3)).unwrap();

        assert!(m.is_over);
        assert_eq!(m.phase, TurnPhase::MatchOver);
        assert_eq!(m.players[PlayerId(0)].rank, Some(3));
        assert_eq!(m.players[PlayerId(2)].rank, Some(4));
        assert_eq!(
            events.last(),
            Some(&GameEvent::MatchOver {
                standings: vec![PlayerId(1), PlayerId(3), PlayerId(0), PlayerId(2)]
            })
        );

        assert_eq!(rules.roll(&mut m, PlayerId(0)), Err(EngineError::MatchOver));
        assert_eq!(rules.advance(&mut m), Err(EngineError::MatchOver));
        assert!(rules.is_terminal(&m).unwrap().is_winner(PlayerId(1)));
    }

    #[test]
    fn test_exact_finish_rule() {
        let rules = LudoRules::new(RulesConfig::default().with_finish_rule(FinishRule::Exact));
        let mut m = Match::all_bots(1);
        m.set_location(pawn(Color::Red, 0), loc(55));

        rules.roll_with(&mut m, PlayerId(0), 4).unwrap();
        assert!(m.legal_moves().is_empty());
    }

    #[test]
    fn test_legal_actions_by_phase() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        assert_eq!(rules.legal_actions(&m, PlayerId(0)), vec![Action::Roll]);
        assert!(rules.legal_actions(&m, PlayerId(1)).is_empty());

        rules.roll_with(&mut m, PlayerId(0), 6).unwrap();
        assert_eq!(rules.legal_actions(&m, PlayerId(0)).len(), 4);

        rules.select_move(&mut m, PlayerId(0), pawn(Color::Red, 2)).unwrap();
        assert_eq!(rules.legal_actions(&m, PlayerId(0)), vec![Action::Advance]);
    }

    #[test]
    fn test_step_is_pure() {
        let rules = LudoRules::default();
        let m = Match::all_bots(1);

        let (next, events) = rules.step(&m, PlayerId(0), &Action::RollWith(6)).unwrap();
        assert_eq!(m.phase, TurnPhase::AwaitingRoll);
        assert_eq!(m.version, 0);
        assert_eq!(next.version, 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_history_records_rolls() {
        let rules = LudoRules::default();
        let mut m = Match::all_bots(1);
        rules.roll_with(&mut m, PlayerId(0), 5).unwrap();
        rules.advance(&mut m).unwrap();

        assert_eq!(m.history.len(), 2);
        assert_eq!(m.history[0].dice, Some(5));
        assert_eq!(m.history[1].action, Action::Advance);
    }
}
