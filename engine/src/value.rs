/// Exact outcome of a terminal position.
pub trait Value: Clone {
    /// Utility in `[0, 1]` for the 1 based `player`.
    fn get_value_for_player(&self, player: usize) -> f32;
}
