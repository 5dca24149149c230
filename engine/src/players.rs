/// The other player of a two player game. Player ids are 1 based.
pub fn opponent(player: usize) -> usize {
    if player == 1 {
        2
    } else {
        1
    }
}
