use super::value::Value;

pub trait GameEngine {
    type Action;
    type State;
    type Terminal: Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State;
    fn player_to_move(&self, game_state: &Self::State) -> usize;
    /// Starts at 1 for the first move of the game.
    fn move_number(&self, game_state: &Self::State) -> usize;
    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal>;
}

/// Legal actions for the player to move, in generation order.
///
/// The order is significant: searches break ties in favour of the action generated first.
pub trait ValidActions: GameEngine {
    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action>;
}

/// Number of legal continuations available to `player`, regardless of whose turn it is.
pub trait Mobility: GameEngine {
    fn mobility(&self, game_state: &Self::State, player: usize) -> usize;
}

/// Canonical string identities used to key persisted experience.
pub trait CanonicalKeys: GameEngine {
    fn state_key(&self, game_state: &Self::State) -> String;
    fn action_key(&self, action: &Self::Action) -> String;
}
