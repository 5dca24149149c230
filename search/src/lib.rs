pub mod evaluator;
pub mod iterative_deepening;
pub mod minimax;
#[cfg(test)]
mod minimax_tests;

pub use evaluator::*;
pub use iterative_deepening::*;
pub use minimax::*;
