//! Relay protocol: an authoritative table broadcasts sync messages and a
//! replica follows along, rejecting anything inconsistent.

use ludo_engine::core::{Color, EngineError, Match, MatchConfig, PawnId, PlayerId, SeatConfig, TimingConfig};
use ludo_engine::events::GameEvent;
use ludo_engine::protocol::{Replica, SyncMessage};
use ludo_engine::rules::LudoRules;
use ludo_engine::session::Table;

fn bot_table(seed: u64) -> Table {
    let config = MatchConfig::default()
        .with_seed(seed)
        .with_timing(TimingConfig::instant());
    let seats = std::array::from_fn(|i| SeatConfig::bot(format!("b{i}"), format!("Bot {i}")));
    Table::new(seats, &config, 0).unwrap()
}

fn assert_same_board(a: &Match, b: &Match) {
    assert_eq!(a.turn_index(), b.turn_index());
    assert_eq!(a.is_over(), b.is_over());
    assert_eq!(a.version(), b.version());
    for (seat, player) in a.players().iter() {
        let other = &b.players()[seat];
        assert_eq!(player.rank, other.rank, "{seat}");
        assert_eq!(player.pawns, other.pawns, "{seat}");
    }
}

#[test]
fn test_replica_follows_full_match_over_the_wire() {
    for seed in [1, 2, 3] {
        let mut table = bot_table(seed);
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(seed));
        let mut relayed = 0;

        table
            .run_until(u64::MAX, |events| {
                for message in SyncMessage::from_events(events) {
                    let wire = message.encode().unwrap();
                    let received = SyncMessage::decode(&wire).unwrap();
                    replica.apply(&received).unwrap();
                    relayed += 1;
                }
            })
            .unwrap();

        assert!(relayed > 0);
        assert!(replica.state().is_over());
        assert_same_board(table.state(), replica.state());
    }
}

#[test]
fn test_replica_derives_captures_and_ranks() {
    let mut table = bot_table(5);
    let mut replica = Replica::new(LudoRules::default(), Match::all_bots(5));

    table
        .run_until(u64::MAX, |events| {
            let derived: Vec<GameEvent> = SyncMessage::from_events(events)
                .iter()
                .flat_map(|m| replica.apply(m).unwrap())
                .collect();
            assert_eq!(derived, events);
        })
        .unwrap();

    assert_eq!(replica.state().ranked_count(), 4);
}

#[test]
fn test_forged_move_rejected() {
    let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
    replica
        .apply(&SyncMessage::decode(r#"{"event":"dice_rolled","value":6,"playerIndex":0}"#).unwrap())
        .unwrap();
    let version = replica.state().version();

    // Green pawn during red's turn.
    let foreign = SyncMessage::decode(r#"{"event":"move_pawn","pawnId":"green-0","finalLocation":0,"playerIndex":0}"#)
        .unwrap();
    assert_eq!(
        replica.apply(&foreign),
        Err(EngineError::ForeignPawn(PawnId::new(Color::Green, 0).unwrap()))
    );

    // Claimed by the wrong seat.
    let wrong_seat =
        SyncMessage::decode(r#"{"event":"move_pawn","pawnId":"red-0","finalLocation":0,"playerIndex":1}"#).unwrap();
    assert!(matches!(
        replica.apply(&wrong_seat),
        Err(EngineError::NotYourTurn { .. })
    ));

    // Right pawn, wrong destination.
    let teleport =
        SyncMessage::decode(r#"{"event":"move_pawn","pawnId":"red-0","finalLocation":12,"playerIndex":0}"#).unwrap();
    assert!(matches!(replica.apply(&teleport), Err(EngineError::Desync { .. })));

    assert_eq!(replica.state().version(), version);
}

#[test]
fn test_out_of_order_turn_rejected() {
    let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
    let early = SyncMessage::NextTurn { next_index: 1 };
    assert!(replica.apply(&early).is_err());

    replica
        .apply(&SyncMessage::DiceRolled {
            value: 3,
            player_index: 0,
        })
        .unwrap();
    assert!(replica
        .apply(&SyncMessage::DiceRolled {
            value: 3,
            player_index: 0
        })
        .is_err());
    replica.apply(&early).unwrap();
    assert_eq!(replica.state().turn_index(), PlayerId(1));
}
