use engine::{opponent, GameEngine, Mobility, Value};

/// Score assigned to a won terminal position. Larger than any heuristic score.
pub const WIN_SCORE: f32 = 1_000_000.0;

/// Scores positions from the perspective of `player`.
pub trait Evaluator<E: GameEngine> {
    /// Estimate for a position where the depth limit was reached before the game ended.
    fn heuristic(&self, engine: &E, game_state: &E::State, player: usize) -> f32;

    /// Exact score of a finished game, mapped from `[0, 1]` to `[-WIN_SCORE, WIN_SCORE]`.
    fn utility(&self, _engine: &E, terminal: &E::Terminal, player: usize) -> f32 {
        (terminal.get_value_for_player(player) - 0.5) * 2.0 * WIN_SCORE
    }
}

/// Own legal continuations minus the opponent's.
#[derive(Clone, Copy, Debug, Default)]
pub struct MobilityEvaluator;

impl<E> Evaluator<E> for MobilityEvaluator
where
    E: Mobility,
{
    fn heuristic(&self, engine: &E, game_state: &E::State, player: usize) -> f32 {
        let own = engine.mobility(game_state, player) as f32;
        let opp = engine.mobility(game_state, opponent(player)) as f32;

        own - opp
    }
}
