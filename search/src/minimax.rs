use engine::{GameEngine, ValidActions};

use super::Evaluator;

/// Best root action found by a search to a fixed depth.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthResult<A> {
    pub action: A,
    pub score: f32,
    pub depth: usize,
    pub nodes: usize,
    /// No leaf was cut off by the depth limit; deeper searches cannot change the result.
    pub complete: bool,
}

#[derive(Default)]
struct SearchStats {
    nodes: usize,
    cutoffs: usize,
}

/// Depth limited minimax with alpha-beta pruning.
///
/// The player to move at the root maximizes and the opponent minimizes. Root ties resolve to the
/// action generated first, so the chosen action matches a plain minimax over the same tree.
pub struct Minimax<'a, E, V> {
    engine: &'a E,
    evaluator: &'a V,
}

impl<'a, E, V> Minimax<'a, E, V>
where
    E: ValidActions,
    V: Evaluator<E>,
{
    pub fn new(engine: &'a E, evaluator: &'a V) -> Self {
        Self { engine, evaluator }
    }

    /// Returns `None` only when the root has no legal actions.
    pub fn search(&self, game_state: &E::State, depth: usize) -> Option<DepthResult<E::Action>> {
        let depth = depth.max(1);
        let player = self.engine.player_to_move(game_state);
        let mut stats = SearchStats {
            nodes: 1,
            ..Default::default()
        };

        let mut best: Option<(E::Action, f32)> = None;
        let mut alpha = f32::NEG_INFINITY;

        for action in self.engine.valid_actions(game_state) {
            let child = self.engine.take_action(game_state, &action);
            let score = self.alpha_beta(&child, depth - 1, alpha, f32::INFINITY, player, &mut stats);

            let improves = best
                .as_ref()
                .map_or(true, |(_, best_score)| score > *best_score);

            if improves {
                alpha = alpha.max(score);
                best = Some((action, score));
            }
        }

        best.map(|(action, score)| DepthResult {
            action,
            score,
            depth,
            nodes: stats.nodes,
            complete: stats.cutoffs == 0,
        })
    }

    fn alpha_beta(
        &self,
        game_state: &E::State,
        depth: usize,
        mut alpha: f32,
        mut beta: f32,
        player: usize,
        stats: &mut SearchStats,
    ) -> f32 {
        stats.nodes += 1;

        if let Some(terminal) = self.engine.terminal_state(game_state) {
            return self.evaluator.utility(self.engine, &terminal, player);
        }

        let actions = if depth == 0 {
            Vec::new()
        } else {
            self.engine.valid_actions(game_state)
        };

        if actions.is_empty() {
            stats.cutoffs += 1;
            return self.evaluator.heuristic(self.engine, game_state, player);
        }

        if self.engine.player_to_move(game_state) == player {
            let mut value = f32::NEG_INFINITY;
            for action in actions {
                let child = self.engine.take_action(game_state, &action);
                value = value.max(self.alpha_beta(&child, depth - 1, alpha, beta, player, stats));
                if value >= beta {
                    return value;
                }
                alpha = alpha.max(value);
            }
            value
        } else {
            let mut value = f32::INFINITY;
            for action in actions {
                let child = self.engine.take_action(game_state, &action);
                value = value.min(self.alpha_beta(&child, depth - 1, alpha, beta, player, stats));
                if value <= alpha {
                    return value;
                }
                beta = beta.min(value);
            }
            value
        }
    }
}
