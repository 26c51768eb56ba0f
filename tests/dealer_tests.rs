//! Dealer scenarios.
//!
//! The dealer is driven phase by phase on the test thread. Player actors
//! are created for their handles but only spawned where a test needs them
//! to acknowledge a stop.

use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::time::{Duration, Instant};

use set_table::board::Slot;
use set_table::cards::{Card, Deck};
use set_table::core::{GameConfig, PlayerId, SeatConfig};
use set_table::dealer::{Dealer, DealerPhase};
use set_table::game::Table;
use set_table::player::{PlayerActor, PlayerHandle, Verdict};
use set_table::presenter::{RecordingPresenter, TableEvent};
use set_table::rules::StandardSet;

const A: PlayerId = PlayerId::new(0);
const B: PlayerId = PlayerId::new(1);

struct Fixture {
    table: Table,
    recorder: Arc<RecordingPresenter>,
    handles: Vec<PlayerHandle>,
    // keep the verdict receivers alive
    _actors: Vec<PlayerActor>,
}

fn fixture(config: &GameConfig) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let recorder = Arc::new(RecordingPresenter::new());
    let table = Table::new(config, recorder.clone());
    let (actors, handles): (Vec<PlayerActor>, Vec<PlayerHandle>) = PlayerId::all(config.player_count())
        .map(|player| PlayerActor::new(player, config, &table))
        .unzip();
    Fixture {
        table,
        recorder,
        handles,
        _actors: actors,
    }
}

fn dealer(config: &GameConfig, fixture: &Fixture) -> Dealer {
    Dealer::new(
        config.clone(),
        Arc::new(StandardSet::from_config(config)),
        fixture.table.clone(),
        fixture.handles.clone(),
    )
}

/// Put `cards[i]` on slot `i`; the rest of the 81 cards go to the deck.
fn layout(config: &GameConfig, fixture: &Fixture, cards: &[u32]) -> Dealer {
    for (i, &c) in cards.iter().enumerate() {
        fixture
            .table
            .board
            .place_card(Card::new(c), Slot::new(i as u16))
            .unwrap();
    }
    let rest = (0..81).filter(|c| !cards.contains(c)).map(Card::new);
    dealer(config, fixture).with_deck(Deck::from_cards(rest))
}

fn claim(fixture: &Fixture, player: PlayerId, slots: &[u16]) {
    let board = &fixture.table.board;
    for &s in slots {
        assert!(board.place_token(player, Slot::new(s)));
    }
    fixture
        .table
        .claims
        .submit(player, board.tokens_of(player));
}

fn conserved(dealer: &Dealer, fixture: &Fixture) -> usize {
    dealer.deck().len() + fixture.table.board.count_cards() + dealer.claimed().len()
}

/// A set on slots 0,1,2 scores and empties those slots before any refill.
#[test]
fn test_valid_claim_scores_and_clears_slots() {
    let config = GameConfig::new();
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 2, 3, 4, 6, 9, 10, 12, 13, 15, 18]);

    claim(&fixture, A, &[0, 1, 2]);
    assert_eq!(dealer.resolve_claims(), vec![Verdict::Set]);

    let board = &fixture.table.board;
    assert_eq!(board.score(A), 1);
    for s in 0..3 {
        assert_eq!(board.card_at(Slot::new(s)), None);
    }
    assert_eq!(board.count_cards(), 9);
    assert_eq!(fixture.recorder.last_score(A), Some(1));
    assert!(board.tokens_of(A).is_empty());
    assert!(!board.is_frozen());
    assert_eq!(conserved(&dealer, &fixture), 81);
}

/// A non-set on slots 0,1,3 changes nothing but the claimant's tokens.
#[test]
fn test_invalid_claim_leaves_board() {
    let config = GameConfig::new();
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 2, 3, 4, 6, 9, 10, 12, 13, 15, 18]);
    let before: Vec<_> = fixture.table.board.snapshot().slot_to_card;

    claim(&fixture, A, &[0, 1, 3]);
    assert_eq!(dealer.resolve_claims(), vec![Verdict::NotSet]);

    let board = &fixture.table.board;
    assert_eq!(board.score(A), 0);
    assert_eq!(board.snapshot().slot_to_card, before);
    assert!(board.tokens_of(A).is_empty());
    assert_eq!(fixture.recorder.last_score(A), None);
}

/// Two claims share slot 2. Once the first succeeds, the second is judged
/// on the board after the removal and refill, not on what B saw.
#[test]
fn test_overlapping_claims() {
    let config = GameConfig::new();
    let fixture = fixture(&config);
    // {0,1,2} and {2,5,8} are both sets
    let mut dealer = layout(&config, &fixture, &[0, 1, 2, 5, 8, 3, 4, 6, 9, 10, 12, 13]);

    claim(&fixture, A, &[0, 1, 2]);
    claim(&fixture, B, &[2, 3, 4]);

    let first = fixture.table.claims.pop().unwrap();
    assert_eq!(dealer.resolve(first), Verdict::Set);
    assert_eq!(fixture.table.board.tokens_of(B).as_slice(), &[Slot::new(3), Slot::new(4)]);

    dealer.deal();
    assert!(fixture.table.board.card_at(Slot::new(2)).is_some());

    assert_eq!(dealer.resolve_claims(), vec![Verdict::Voided]);
    assert_eq!(fixture.table.board.score(A), 1);
    assert_eq!(fixture.table.board.score(B), 0);
    assert!(fixture.table.board.card_at(Slot::new(3)).is_some());
    assert_eq!(conserved(&dealer, &fixture), 81);
}

/// With no claims the turn times out; the reshuffle returns every card to
/// the deck and the countdown starts over.
#[test]
fn test_timeout_reshuffles_and_resets_countdown() {
    let config = GameConfig::new()
        .with_turn_timeout_millis(100)
        .with_warning_millis(40)
        .with_ticks(20, 5);
    let fixture = fixture(&config);
    let mut dealer = dealer(&config, &fixture).with_deck(Deck::from_cards((0..81).map(Card::new)));

    assert_eq!(dealer.deal(), 12);
    assert!(dealer.board_has_set());

    let started = Instant::now();
    dealer.timer_loop();
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(dealer.phase(), DealerPhase::Waiting);

    let warnings = fixture
        .recorder
        .filter(|e| matches!(e, TableEvent::CountdownChanged { warning: true, .. }));
    assert!(!warnings.is_empty());

    fixture.recorder.clear();
    dealer.reshuffle();
    assert_eq!(dealer.phase(), DealerPhase::Reshuffling);
    assert_eq!(fixture.table.board.count_cards(), 0);
    assert_eq!(dealer.deck().len(), 81);

    let remaining = dealer.clock().remaining_at(Instant::now()).unwrap();
    assert!(remaining > Duration::from_millis(80));
    let countdowns = fixture
        .recorder
        .filter(|e| matches!(e, TableEvent::CountdownChanged { .. }));
    assert!(matches!(
        countdowns.last(),
        Some(TableEvent::CountdownChanged { millis, warning: false }) if *millis >= 80
    ));
}

/// Claims still queued at a reshuffle are resolved first.
#[test]
fn test_reshuffle_resolves_pending_claims() {
    let config = GameConfig::new();
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 2, 3, 4, 6, 9, 10, 12, 13, 15, 18]);

    claim(&fixture, B, &[0, 1, 2]);
    dealer.reshuffle();

    assert_eq!(fixture.table.board.score(B), 1);
    assert!(fixture.table.claims.is_empty());
    assert_eq!(dealer.deck().len(), 78);
    assert_eq!(dealer.claimed().len(), 3);
}

/// A board without a set ends the wait long before the turn times out.
#[test]
fn test_setless_board_ends_wait() {
    let config = GameConfig::new();
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 3, 4]);

    assert!(!dealer.board_has_set());
    assert!(!dealer.should_finish());

    let started = Instant::now();
    dealer.timer_loop();
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// A zero timeout shows elapsed time and never forces a reshuffle.
#[test]
fn test_elapsed_mode_waits_for_stop() {
    let config = GameConfig::new().with_turn_timeout_millis(0).with_ticks(10, 5);
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 2]);

    let table = fixture.table.clone();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(60));
        table.stop();
    });
    dealer.timer_loop();
    stopper.join().unwrap();

    let elapsed = fixture
        .recorder
        .filter(|e| matches!(e, TableEvent::ElapsedChanged(_)));
    assert!(elapsed.len() >= 2);
    assert!(fixture
        .recorder
        .filter(|e| matches!(e, TableEvent::CountdownChanged { .. }))
        .is_empty());
}

/// No set left anywhere: every player is stopped and all players tied at
/// the top score win.
#[test]
fn test_exhaustion_stops_players_and_reports_ties() {
    let config = GameConfig::new().with_seats(vec![
        SeatConfig::human("Ann"),
        SeatConfig::human("Ben"),
        SeatConfig::computer("Cy"),
    ]);
    let _ = env_logger::builder().is_test(true).try_init();
    let recorder = Arc::new(RecordingPresenter::new());
    let table = Table::new(&config, recorder.clone());

    let (ready_tx, ready_rx) = unbounded();
    let (done_tx, done_rx) = unbounded();
    let mut handles = Vec::new();
    let mut threads = Vec::new();
    for player in PlayerId::all(3) {
        let (actor, handle) = PlayerActor::new(player, &config, &table);
        threads.push((player, actor.spawn(ready_tx.clone(), done_tx.clone()).unwrap()));
        handles.push(handle);
    }
    for _ in 0..3 {
        ready_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    let c = PlayerId::new(2);
    for player in [A, A, B, c, c] {
        table.board.award_point(player);
    }

    let mut dealer = Dealer::new(
        config.clone(),
        Arc::new(StandardSet::from_config(&config)),
        table.clone(),
        handles,
    )
    .with_deck(Deck::from_cards([0, 1, 3, 4].map(Card::new)));
    dealer.attach(threads, done_rx);

    assert!(dealer.should_finish());
    let outcome = dealer.run();

    assert_eq!(outcome.winners, vec![A, c]);
    assert_eq!(outcome.scores[B], 1);
    assert!(outcome.unresponsive.is_empty());
    assert_eq!(recorder.winners(), Some(vec![A, c]));
    assert!(table.shutdown.is_triggered());
}

/// A player thread that never acknowledges the stop is reported and does
/// not hold up the end of the game.
#[test]
fn test_unacknowledged_stop_is_reported() {
    let mut config = GameConfig::new();
    config.stop_ack_millis = 50;
    let fixture = fixture(&config);
    let mut dealer = layout(&config, &fixture, &[0, 1, 3, 4]);

    let (done_tx, done_rx) = unbounded();
    let release = fixture.table.shutdown.clone();
    let quiet = std::thread::spawn(move || {
        // leaves without sending on `done`
        let _ = release.signal().recv();
        std::thread::sleep(Duration::from_millis(200));
    });
    let acked = {
        let done = done_tx.clone();
        let stop = fixture.table.shutdown.clone();
        std::thread::spawn(move || {
            let _ = stop.signal().recv();
            let _ = done.send(A);
        })
    };
    dealer.attach(vec![(A, acked), (B, quiet)], done_rx);

    let started = Instant::now();
    let outcome = dealer.terminate();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(outcome.unresponsive, vec![B]);
    drop(done_tx);
}
