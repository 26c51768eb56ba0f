//! Claim protocol tests.
//!
//! Real player actors submit claims; nothing here plays the dealer except
//! where a test resolves the queue explicitly.

use crossbeam_channel::{bounded, unbounded, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use set_table::board::Slot;
use set_table::cards::{Card, Deck};
use set_table::core::{GameConfig, PlayerId};
use set_table::dealer::Dealer;
use set_table::game::Table;
use set_table::player::{PlayerActor, PlayerHandle, Verdict};
use set_table::presenter::NullPresenter;
use set_table::rules::StandardSet;

struct Seats {
    handles: Vec<PlayerHandle>,
    threads: Vec<(PlayerId, JoinHandle<()>)>,
    done: Receiver<PlayerId>,
}

fn table(config: &GameConfig, cards: u32) -> Table {
    let table = Table::new(config, Arc::new(NullPresenter));
    for i in 0..cards {
        table.board.place_card(Card::new(i), Slot::new(i as u16)).unwrap();
    }
    table
}

fn seat_players(config: &GameConfig, table: &Table) -> Seats {
    let (ready_tx, ready_rx) = unbounded();
    let (done_tx, done_rx) = unbounded();
    let mut handles = Vec::new();
    let mut threads = Vec::new();
    for player in PlayerId::all(config.player_count()) {
        let (actor, handle) = PlayerActor::new(player, config, table);
        threads.push((player, actor.spawn(ready_tx.clone(), done_tx.clone()).unwrap()));
        handles.push(handle);
    }
    for _ in 0..handles.len() {
        ready_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    Seats {
        handles,
        threads,
        done: done_rx,
    }
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}

fn press_all(handle: &PlayerHandle, slots: &[u16]) {
    for &s in slots {
        while !handle.press(Slot::new(s)) {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

fn shut_down(table: &Table, seats: Seats) {
    table.stop();
    for (_, thread) in seats.threads {
        thread.join().unwrap();
    }
    assert!(seats.done.try_iter().count() > 0);
}

/// A player waiting for a verdict submits nothing more, however many keys
/// it receives.
#[test]
fn test_at_most_one_claim_per_player() {
    let config = GameConfig::new();
    let table = table(&config, 6);
    let seats = seat_players(&config, &table);
    let player = PlayerId::new(0);

    press_all(&seats.handles[0], &[0, 1, 2]);
    assert!(wait_for(|| table.claims.pending_for(player) == 1));

    for s in [3, 4, 5, 0, 1, 2] {
        seats.handles[0].press(Slot::new(s));
    }
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(table.claims.pending_for(player), 1);
    assert_eq!(table.board.tokens_of(player).len(), 3);

    shut_down(&table, seats);
}

/// Claims leave the queue in the order the selections completed, and the
/// dealer resolves them in that order.
#[test]
fn test_fifo_resolution() {
    let config = GameConfig::new().with_freezes(0, 0);
    let table = table(&config, 12);
    let seats = seat_players(&config, &table);
    let (a, b) = (PlayerId::new(0), PlayerId::new(1));

    // Cards 0,1,2 form a set; 3,4,6 do not.
    press_all(&seats.handles[1], &[3, 4, 6]);
    assert!(wait_for(|| table.claims.pending_for(b) == 1));
    press_all(&seats.handles[0], &[0, 1, 2]);
    assert!(wait_for(|| table.claims.pending_for(a) == 1));

    let order: Vec<PlayerId> = table.claims.pending().iter().map(|c| c.player).collect();
    assert_eq!(order, vec![b, a]);

    let mut dealer = Dealer::new(
        config.clone(),
        Arc::new(StandardSet::from_config(&config)),
        table.clone(),
        seats.handles.clone(),
    )
    .with_deck(Deck::from_cards((12..81).map(Card::new)));
    assert_eq!(dealer.resolve_claims(), vec![Verdict::NotSet, Verdict::Set]);
    assert_eq!(table.board.score(a), 1);
    assert_eq!(table.board.score(b), 0);

    shut_down(&table, seats);
}

/// A player whose claimed slot is emptied before resolution gets a voided
/// claim, not a stale read.
#[test]
fn test_claim_voided_after_concurrent_removal() {
    let config = GameConfig::new().with_freezes(0, 0);
    let table = table(&config, 12);
    let seats = seat_players(&config, &table);
    let player = PlayerId::new(0);

    press_all(&seats.handles[0], &[0, 1, 2]);
    assert!(wait_for(|| table.claims.pending_for(player) == 1));
    table.board.remove_card(Slot::new(1));

    let mut dealer = Dealer::new(
        config.clone(),
        Arc::new(StandardSet::from_config(&config)),
        table.clone(),
        seats.handles.clone(),
    );
    assert_eq!(dealer.resolve_claims(), vec![Verdict::Voided]);
    assert_eq!(table.board.score(player), 0);
    assert!(table.board.tokens_of(player).is_empty());

    shut_down(&table, seats);
}

/// A selection completed while another player's claim is still being
/// queued cannot overtake it.
#[test]
fn test_claim_queued_with_completing_toggle() {
    let config = GameConfig::new();
    let table = table(&config, 6);
    let (a, b) = (PlayerId::new(0), PlayerId::new(1));
    for s in [0, 1] {
        table.board.place_token(a, Slot::new(s));
    }
    for s in [3, 4] {
        table.board.place_token(b, Slot::new(s));
    }

    let (entered_tx, entered_rx) = bounded(1);
    let first = {
        let table = table.clone();
        std::thread::spawn(move || {
            table.board.toggle_token_then(a, Slot::new(2), 3, |slots| {
                entered_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(50));
                table.claims.submit(a, slots)
            })
        })
    };

    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let (_, second) = table
        .board
        .toggle_token_then(b, Slot::new(5), 3, |slots| table.claims.submit(b, slots));
    let (_, first) = first.join().unwrap();

    assert!(first.unwrap() < second.unwrap());
    let order: Vec<PlayerId> = table.claims.pending().iter().map(|c| c.player).collect();
    assert_eq!(order, vec![a, b]);
}
