use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_approx_eq::assert_approx_eq;
use engine::knight_isolation::{KnightIsolation, KnightIsolationState, KnightMove};
use engine::{GameEngine, GameState, ValidActions};

use super::{search_within, Evaluator, IterativeDeepening, Minimax, MobilityEvaluator, WIN_SCORE};

/// Exhaustive minimax without pruning, used as the reference for the pruned search.
fn plain_minimax<V: Evaluator<KnightIsolation>>(
    engine: &KnightIsolation,
    evaluator: &V,
    game_state: &KnightIsolationState,
    depth: usize,
    player: usize,
) -> f32 {
    if let Some(terminal) = engine.terminal_state(game_state) {
        return evaluator.utility(engine, &terminal, player);
    }

    if depth == 0 {
        return evaluator.heuristic(engine, game_state, player);
    }

    let values = engine
        .valid_actions(game_state)
        .iter()
        .map(|action| {
            let child = engine.take_action(game_state, action);
            plain_minimax(engine, evaluator, &child, depth - 1, player)
        })
        .collect::<Vec<_>>();

    if engine.player_to_move(game_state) == player {
        values.into_iter().fold(f32::NEG_INFINITY, f32::max)
    } else {
        values.into_iter().fold(f32::INFINITY, f32::min)
    }
}

fn endgame() -> KnightIsolationState {
    let open = [0, 24, 7, 11, 13, 17, 4, 10, 14];
    let blocked = (0..25).filter(|s| !open.contains(s)).collect::<Vec<u8>>();

    KnightIsolationState::with_positions(0, 24, &blocked, true)
}

#[test]
fn test_pruned_search_matches_plain_minimax() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let minimax = Minimax::new(&engine, &evaluator);

    let mut positions = vec![KnightIsolationState::initial(), endgame()];
    let second = engine.take_action(&positions[0], &KnightMove(11));
    positions.push(engine.take_action(&second, &KnightMove(13)));

    for game_state in &positions {
        let player = engine.player_to_move(game_state);

        for depth in 1..=4 {
            let result = minimax.search(game_state, depth).unwrap();

            let mut expected: Option<(KnightMove, f32)> = None;
            for action in engine.valid_actions(game_state) {
                let child = engine.take_action(game_state, &action);
                let score = plain_minimax(&engine, &evaluator, &child, depth - 1, player);
                if expected.map_or(true, |(_, best)| score > best) {
                    expected = Some((action, score));
                }
            }

            let (action, score) = expected.unwrap();
            assert_eq!(result.action, action, "depth {}", depth);
            assert_approx_eq!(result.score, score);
            assert_eq!(result.depth, depth);
        }
    }
}

#[test]
fn test_ties_resolve_to_first_generated_action() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let minimax = Minimax::new(&engine, &evaluator);
    let game_state = KnightIsolationState::initial();

    // The position is symmetric along the diagonal so both moves score the same.
    for depth in 1..=4 {
        let result = minimax.search(&game_state, depth).unwrap();
        assert_eq!(result.action, KnightMove(7));
    }
}

#[test]
fn test_depth_one_scores_mobility_difference() {
    let engine = KnightIsolation::new();
    let minimax = Minimax::new(&engine, &MobilityEvaluator);

    let result = minimax.search(&KnightIsolationState::initial(), 1).unwrap();

    assert_approx_eq!(result.score, 3.0);
    assert!(!result.complete);
}

#[test]
fn test_takes_immediate_win() {
    let engine = KnightIsolation::new();
    let minimax = Minimax::new(&engine, &MobilityEvaluator);
    let game_state = KnightIsolationState::with_positions(2, 24, &[17], true);

    let result = minimax.search(&game_state, 1).unwrap();

    assert_eq!(result.action, KnightMove(13));
    assert_approx_eq!(result.score, WIN_SCORE);
}

#[test]
fn test_no_actions_returns_none() {
    let engine = KnightIsolation::new();
    let minimax = Minimax::new(&engine, &MobilityEvaluator);
    let game_state = KnightIsolationState::with_positions(0, 24, &[7, 11], true);

    assert!(minimax.search(&game_state, 3).is_none());
}

#[test]
fn test_iterative_deepening_publishes_every_depth_in_order() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let search = IterativeDeepening::new(&engine, &evaluator, Some(4));
    let game_state = KnightIsolationState::initial();
    let cancel = AtomicBool::new(false);
    let mut published = Vec::new();

    let last = search
        .run(&game_state, &cancel, |result| published.push(result))
        .unwrap();

    let depths = published.iter().map(|r| r.depth).collect::<Vec<_>>();
    assert_eq!(depths, vec![1, 2, 3, 4]);
    assert_eq!(&last, published.last().unwrap());
    assert_eq!(
        last,
        Minimax::new(&engine, &evaluator).search(&game_state, 4).unwrap()
    );
}

#[test]
fn test_cancellation_is_observed_between_depths() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let search = IterativeDeepening::new(&engine, &evaluator, None);
    let game_state = KnightIsolationState::initial();
    let cancel = AtomicBool::new(false);
    let mut published = Vec::new();

    let last = search.run(&game_state, &cancel, |result| {
        published.push(result.depth);
        if result.depth == 2 {
            cancel.store(true, Ordering::SeqCst);
        }
    });

    assert_eq!(published, vec![1, 2]);
    assert_eq!(last.unwrap().depth, 2);
}

#[test]
fn test_cancelled_before_start_publishes_nothing() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let search = IterativeDeepening::new(&engine, &evaluator, Some(3));
    let cancel = AtomicBool::new(true);
    let mut published = 0;

    let last = search.run(&KnightIsolationState::initial(), &cancel, |_| published += 1);

    assert!(last.is_none());
    assert_eq!(published, 0);
}

#[test]
fn test_unbounded_search_stops_once_tree_is_exhausted() {
    let engine = KnightIsolation::new();
    let evaluator = MobilityEvaluator;
    let search = IterativeDeepening::new(&engine, &evaluator, None);
    let cancel = AtomicBool::new(false);

    let last = search.run(&endgame(), &cancel, |_| {}).unwrap();

    assert!(last.complete);
    assert!(last.depth <= 9);
    assert_eq!(last.action, KnightMove(7));
    assert_approx_eq!(last.score, WIN_SCORE);
}

#[test]
fn test_search_within_returns_deepest_completed_depth() {
    let engine = Arc::new(KnightIsolation::new());

    let result = search_within(
        engine,
        MobilityEvaluator,
        KnightIsolationState::initial(),
        Some(3),
        Duration::from_secs(30),
    )
    .unwrap();

    assert_eq!(result.depth, 3);
    assert_eq!(result.action, KnightMove(7));
}
