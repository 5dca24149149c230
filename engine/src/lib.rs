pub mod engine;
pub mod game_state;
pub mod players;
pub mod value;

#[cfg(any(test, feature = "knight-isolation"))]
pub mod knight_isolation;

pub use crate::engine::*;
pub use crate::game_state::*;
pub use crate::players::*;
pub use crate::value::*;
