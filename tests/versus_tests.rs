//! Versus play, on a bare engine and through a shared session store.

use magic_match::cards::{FaceId, StaticFacePool};
use magic_match::core::{
    CardId, Difficulty, MatchConfig, MatchError, MatchResult, PlayMode, PlayerId,
};
use magic_match::rules::{
    BoardState, GameResult, MatchEngine, Phase, Rejection, ReversionOutcome, TickOutcome,
    Transition,
};
use magic_match::session::{MatchSession, MemoryAdapter, SessionAdapter, SessionId, CLOCK_SEAT};
use magic_match::stats::PlayerStats;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pool() -> StaticFacePool {
    StaticFacePool::numbered(12, "back.png")
}

fn versus(players: u8, seed: u64) -> MatchConfig {
    MatchConfig::new(Difficulty::Easy)
        .with_mode(PlayMode::Versus { players })
        .with_seed(seed)
}

fn pairs(engine: &MatchEngine) -> Vec<[CardId; 2]> {
    let mut seen: Vec<(FaceId, CardId)> = Vec::new();
    let mut pairs = Vec::new();
    for card in engine.deck().iter() {
        match seen.iter().position(|(face, _)| *face == card.face) {
            Some(i) => pairs.push([seen.remove(i).1, card.id]),
            None => seen.push((card.face, card.id)),
        }
    }
    pairs
}

/// Miss as `actor`, then flip the pair back.
fn miss(engine: &mut MatchEngine, a: CardId, b: CardId, actor: PlayerId) {
    engine.select_card(a, actor);
    let Transition::Mismatched(pending) = engine.select_card(b, actor) else {
        panic!("expected a mismatch");
    };
    engine.complete_reversion(&pending);
}

/// Test that only the active player may pick.
#[test]
fn test_turn_ownership() {
    init_logs();
    let mut engine = MatchEngine::deal(versus(2, 1), &pool()).unwrap();
    let card = engine.deck().iter().next().unwrap().id;

    assert_eq!(
        engine.select_card(card, P1),
        Transition::Rejected(Rejection::NotYourTurn)
    );
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.legal_selections(P1).is_empty());
    assert_eq!(engine.legal_selections(P0).len(), 12);

    assert_eq!(engine.select_card(card, P0), Transition::Flipped(card));
}

/// Test that a miss passes the turn and a match keeps it.
#[test]
fn test_turn_passing() {
    init_logs();
    let mut engine = MatchEngine::deal(versus(2, 2), &pool()).unwrap();
    let pairs = pairs(&engine);

    miss(&mut engine, pairs[0][0], pairs[1][0], P0);
    assert_eq!(engine.active_player(), P1);

    engine.select_card(pairs[2][0], P1);
    assert_eq!(
        engine.select_card(pairs[2][1], P1),
        Transition::Matched { pair: pairs[2], player: P1 }
    );
    assert_eq!(engine.active_player(), P1);
    assert_eq!(engine.turn().score(P1), 1);
    assert_eq!(engine.turn().score(P0), 0);
    assert_eq!(engine.turn().turns_taken, 2);
}

/// Test that seats rotate in order in a three-player game.
#[test]
fn test_three_player_rotation() {
    init_logs();
    let mut engine = MatchEngine::deal(versus(3, 3), &pool()).unwrap();
    let pairs = pairs(&engine);
    let p2 = PlayerId::new(2);

    miss(&mut engine, pairs[0][0], pairs[1][0], P0);
    miss(&mut engine, pairs[0][0], pairs[1][0], P1);
    assert_eq!(engine.active_player(), p2);
    miss(&mut engine, pairs[0][0], pairs[1][0], p2);
    assert_eq!(engine.active_player(), P0);
}

/// Test the result when both players take three pairs.
#[test]
fn test_split_board_is_draw() {
    init_logs();
    let mut engine = MatchEngine::deal(versus(2, 4), &pool()).unwrap();
    let pairs = pairs(&engine);

    for pair in &pairs[..3] {
        engine.select_card(pair[0], P0);
        engine.select_card(pair[1], P0);
    }
    miss(&mut engine, pairs[3][0], pairs[4][0], P0);

    let mut last = None;
    for pair in &pairs[3..] {
        engine.select_card(pair[0], P1);
        last = Some(engine.select_card(pair[1], P1));
    }

    let Some(Transition::Won { summary, player, .. }) = last else {
        panic!("expected a win, got {last:?}");
    };
    assert_eq!(player, P1);
    assert_eq!(summary.result, Some(GameResult::Draw));
    assert_eq!(summary.scores[P0], 3);
    assert_eq!(summary.scores[P1], 3);
    assert_eq!(summary.turns_taken, 7);
}

/// Test that a versus game lost to the clock still names the leader.
#[test]
fn test_versus_timeout_has_result() {
    init_logs();
    let config = versus(2, 5).with_time_limit(2);
    let mut engine = MatchEngine::deal(config, &pool()).unwrap();
    let pairs = pairs(&engine);

    engine.select_card(pairs[0][0], P0);
    engine.select_card(pairs[0][1], P0);

    let generation = engine.generation();
    engine.tick(generation);
    let TickOutcome::TimedOut(summary) = engine.tick(generation) else {
        panic!("expected a timeout");
    };
    assert_eq!(summary.result, Some(GameResult::Winner(P0)));

    let mut stats = PlayerStats::default();
    stats.apply(engine.config(), &summary, P1);
    assert_eq!(stats.record.losses, 1);
}

// === Sessions ===

fn open_pair(seed: u64) -> (MemoryAdapter, MatchSession<MemoryAdapter>, MatchSession<MemoryAdapter>) {
    init_logs();
    let adapter = MemoryAdapter::new();
    let host = MatchSession::open(adapter.clone(), versus(2, seed), &pool(), P0).unwrap();
    let guest = MatchSession::join(adapter.clone(), host.session_id(), P1).unwrap();
    (adapter, host, guest)
}

/// Test that both participants see the same board after every move.
#[test]
fn test_session_convergence() {
    let (_adapter, mut host, mut guest) = open_pair(10);
    let pairs = pairs(host.engine());

    host.select(pairs[0][0]).unwrap();
    let Transition::Mismatched(pending) = host.select(pairs[1][0]).unwrap() else {
        panic!("expected a mismatch");
    };
    guest.sync().unwrap();
    assert_eq!(guest.engine().phase(), Phase::Resolving);
    assert_eq!(guest.board(), host.board());

    // Either side may deliver the reversion; the second delivery is stale.
    assert_eq!(
        guest.complete_reversion(&pending).unwrap(),
        ReversionOutcome::Reverted { active_player: P1 }
    );
    assert_eq!(host.complete_reversion(&pending).unwrap(), ReversionOutcome::Stale);
    assert_eq!(host.board(), guest.board());
    assert_eq!(host.engine().active_player(), P1);

    guest.select(pairs[2][0]).unwrap();
    guest.select(pairs[2][1]).unwrap();
    host.sync().unwrap();
    assert_eq!(host.engine().turn().score(P1), 1);
    assert_eq!(host.board(), guest.board());
}

/// Test that a proposal built on an old revision is refused.
#[test]
fn test_stale_write_rejected() {
    let (adapter, mut host, guest) = open_pair(11);
    let stale = guest.board();
    let card = host.engine().deck().iter().next().unwrap().id;

    host.select(card).unwrap();

    let result = adapter.push_state(guest.session_id(), &stale);
    assert!(matches!(result, Err(MatchError::StaleWrite { .. })));
    let stored = adapter.fetch(host.session_id()).unwrap();
    assert_eq!(stored, host.board());
}

/// Test that a peer behind the store catches up before its pick is judged.
#[test]
fn test_behind_peer_syncs_before_picking() {
    let (_adapter, mut host, mut guest) = open_pair(12);
    let pairs = pairs(host.engine());

    // The guest's view is behind the store when the host moves.
    host.select(pairs[0][0]).unwrap();
    host.select(pairs[0][1]).unwrap();

    // The guest syncs first, sees it is still not their turn and is refused
    // without writing anything.
    let t = guest.select(pairs[1][0]).unwrap();
    assert_eq!(t.rejection(), Some(Rejection::NotYourTurn));
    assert_eq!(guest.board(), host.board());
    assert_eq!(guest.engine().turn().score(P0), 1);
}

/// Store handle that holds back confirmed states until `release` is called.
struct LaggingAdapter {
    inner: MemoryAdapter,
    held: Mutex<Vec<(Receiver<BoardState>, Sender<BoardState>)>>,
}

impl LaggingAdapter {
    fn new(inner: MemoryAdapter) -> Self {
        Self { inner, held: Mutex::new(Vec::new()) }
    }

    /// Deliver everything held back so far.
    fn release(&self) {
        for (from, to) in self.held.lock().unwrap().iter() {
            while let Ok(board) = from.try_recv() {
                let _ = to.send(board);
            }
        }
    }
}

impl SessionAdapter for &LaggingAdapter {
    fn create_session(&self, initial: &BoardState) -> MatchResult<SessionId> {
        self.inner.create_session(initial)
    }

    fn push_state(&self, session: SessionId, proposal: &BoardState) -> MatchResult<u64> {
        self.inner.push_state(session, proposal)
    }

    fn fetch(&self, session: SessionId) -> MatchResult<BoardState> {
        self.inner.fetch(session)
    }

    fn subscribe(&self, session: SessionId) -> MatchResult<Receiver<BoardState>> {
        let from = self.inner.subscribe(session)?;
        let (to, rx) = mpsc::channel();
        // The current state goes out at once; later ones wait.
        if let Ok(board) = from.try_recv() {
            let _ = to.send(board);
        }
        self.held.lock().unwrap().push((from, to));
        Ok(rx)
    }

    fn delete_session(&self, session: SessionId) -> MatchResult<()> {
        self.inner.delete_session(session)
    }
}

/// Test two players delivering the same reversion at once: the slower
/// proposal is refused and its session adopts the stored board.
#[test]
fn test_racing_proposals() {
    init_logs();
    let adapter = MemoryAdapter::new();
    let lagging = LaggingAdapter::new(adapter.clone());
    let mut host = MatchSession::open(adapter.clone(), versus(2, 15), &pool(), P0).unwrap();
    let mut guest = MatchSession::join(&lagging, host.session_id(), P1).unwrap();
    let pairs = pairs(host.engine());

    host.select(pairs[0][0]).unwrap();
    let Transition::Mismatched(pending) = host.select(pairs[1][0]).unwrap() else {
        panic!("expected a mismatch");
    };
    lagging.release();
    guest.sync().unwrap();
    assert_eq!(guest.engine().phase(), Phase::Resolving);

    // The host's reversion lands first; the guest has not seen it yet.
    assert_eq!(
        host.complete_reversion(&pending).unwrap(),
        ReversionOutcome::Reverted { active_player: P1 }
    );
    let err = guest.complete_reversion(&pending).unwrap_err();
    assert!(matches!(err, MatchError::StaleWrite { expected: 3, found: 2 }));
    assert!(err.is_retryable());

    let stored = adapter.fetch(host.session_id()).unwrap();
    assert_eq!(guest.board(), stored);
    assert_eq!(guest.board(), host.board());
    assert_eq!(guest.engine().phase(), Phase::Idle);
    assert_eq!(guest.engine().turn().turns_taken, 1);

    // Late deliveries are older than the adopted board and change nothing.
    lagging.release();
    assert!(!guest.sync().unwrap());

    // The guest can move on from the adopted board.
    let card = pairs[2][0];
    assert_eq!(guest.select(card).unwrap(), Transition::Flipped(card));
}

/// Test that only the opening seat counts the shared clock.
#[test]
fn test_clock_driven_by_one_seat() {
    let (_adapter, mut host, mut guest) = open_pair(16);
    let generation = host.engine().generation();
    assert_eq!(host.player(), CLOCK_SEAT);

    for _ in 0..3 {
        host.tick(generation).unwrap();
        assert!(guest.tick(generation).is_err());
    }

    guest.sync().unwrap();
    assert_eq!(guest.engine().clock().elapsed, 3);
    assert_eq!(guest.board(), host.board());
}

/// Test that a rematch starts a new generation for everyone.
#[test]
fn test_session_rematch() {
    let (_adapter, mut host, mut guest) = open_pair(13);
    let old = host.engine().generation();
    let pairs = pairs(host.engine());

    host.select(pairs[0][0]).unwrap();
    let Transition::Mismatched(pending) = host.select(pairs[1][0]).unwrap() else {
        panic!("expected a mismatch");
    };

    let generation = host.rematch(&pool()).unwrap();
    assert_ne!(generation, old);

    guest.sync().unwrap();
    assert_eq!(guest.engine().generation(), generation);
    assert_eq!(guest.engine().phase(), Phase::Idle);
    assert_eq!(guest.complete_reversion(&pending).unwrap(), ReversionOutcome::Stale);
    assert_eq!(host.tick(old).unwrap(), TickOutcome::Stale);
    assert_eq!(guest.board(), host.board());
}

/// Test that store outages surface as retryable errors and leave the view
/// alone.
#[test]
fn test_adapter_outage() {
    let (adapter, mut host, _guest) = open_pair(14);
    let before = host.board();
    let card = host.engine().deck().iter().next().unwrap().id;

    adapter.set_available(false);
    let err = host.select(card).unwrap_err();
    assert!(matches!(err, MatchError::AdapterUnavailable(_)));
    assert!(err.is_retryable());
    assert_eq!(host.board(), before);

    adapter.set_available(true);
    assert_eq!(host.select(card).unwrap(), Transition::Flipped(card));
}

/// Test joining a session that does not exist.
#[test]
fn test_join_missing_session() {
    init_logs();
    let adapter = MemoryAdapter::new();
    let result = MatchSession::join(adapter, SessionId(404), P1);
    assert!(matches!(result, Err(MatchError::UnknownSession(_))));
}
