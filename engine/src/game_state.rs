use std::fmt::Debug;
use std::hash::Hash;

/// A position of the game. Equal positions must hash equally so they can be used as table keys.
pub trait GameState: Hash + Eq + Clone + Debug {
    fn initial() -> Self;
}
