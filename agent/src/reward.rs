use engine::{GameEngine, Mobility};
use search::{Evaluator, MobilityEvaluator};

/// One ply heuristic score for each candidate action.
pub trait RewardModel<E: GameEngine> {
    fn score_all(&self, engine: &E, game_state: &E::State, actions: &[E::Action]) -> Vec<f32>;
}

/// Mobility of the acting player minus the opponent's, measured after the action is taken.
#[derive(Clone, Copy, Debug, Default)]
pub struct MobilityReward;

impl<E: Mobility> RewardModel<E> for MobilityReward {
    fn score_all(&self, engine: &E, game_state: &E::State, actions: &[E::Action]) -> Vec<f32> {
        let player = engine.player_to_move(game_state);

        actions
            .iter()
            .map(|action| {
                let next_state = engine.take_action(game_state, action);
                MobilityEvaluator.heuristic(engine, &next_state, player)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::knight_isolation::{KnightIsolation, KnightIsolationState, KnightMove};
    use engine::GameState;

    #[test]
    fn test_scores_mobility_difference_after_each_action() {
        let engine = KnightIsolation::new();
        let game_state = KnightIsolationState::initial();

        let scores =
            MobilityReward.score_all(&engine, &game_state, &[KnightMove(7), KnightMove(11)]);

        // From either square the first knight has five moves against two for the second.
        assert_eq!(scores, vec![3.0, 3.0]);
    }

    #[test]
    fn test_scores_are_from_the_acting_players_view() {
        let engine = KnightIsolation::new();
        let game_state = KnightIsolationState::with_positions(2, 24, &[17], true);

        let scores = MobilityReward.score_all(
            &engine,
            &game_state,
            &[KnightMove(5), KnightMove(13)],
        );

        // Taking 13 leaves the opponent without moves.
        assert!(scores[1] > scores[0]);
        assert_eq!(engine.take_action(&game_state, &KnightMove(13)).location(1), 13);
    }

    #[test]
    fn test_no_actions_no_scores() {
        let engine = KnightIsolation::new();

        let scores = MobilityReward.score_all(&engine, &KnightIsolationState::initial(), &[]);

        assert!(scores.is_empty());
    }
}
