//! Knight's isolation on a 5x5 board.
//!
//! Each player owns a knight. A knight moves like in chess to any square that has not yet
//! been occupied, and every square a knight has stood on stays blocked for the rest of the game.
//! The player to move without a legal move loses.

use std::fmt::{self, Display, Formatter};

use crate::{CanonicalKeys, GameEngine, GameState, Mobility, ValidActions, Value};

pub const WIDTH: i8 = 5;
pub const HEIGHT: i8 = 5;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[derive(Hash, PartialEq, Eq, Clone, Debug)]
pub struct KnightIsolationState {
    blocked: u32,
    locations: [u8; 2],
    p1_turn: bool,
    move_number: usize,
}

impl KnightIsolationState {
    /// A position with the knights on the given squares and additional squares already blocked.
    pub fn with_positions(p1: u8, p2: u8, blocked: &[u8], p1_turn: bool) -> Self {
        let blocked = blocked
            .iter()
            .fold(bit(p1) | bit(p2), |acc, &square| acc | bit(square));

        Self {
            blocked,
            locations: [p1, p2],
            p1_turn,
            move_number: 1,
        }
    }

    pub fn location(&self, player: usize) -> u8 {
        self.locations[player - 1]
    }

    pub fn is_blocked(&self, square: u8) -> bool {
        self.blocked & bit(square) != 0
    }

    fn player_to_move(&self) -> usize {
        if self.p1_turn {
            1
        } else {
            2
        }
    }

    fn moves_for(&self, player: usize) -> impl Iterator<Item = u8> + '_ {
        let from = self.location(player);
        let (row, col) = ((from as i8) / WIDTH, (from as i8) % WIDTH);

        KNIGHT_OFFSETS
            .iter()
            .map(move |(dr, dc)| (row + dr, col + dc))
            .filter(|&(r, c)| (0..HEIGHT).contains(&r) && (0..WIDTH).contains(&c))
            .map(|(r, c)| (r * WIDTH + c) as u8)
            .filter(move |&square| !self.is_blocked(square))
    }

    fn move_knight(&self, to: u8) -> Self {
        let mut locations = self.locations;
        locations[self.player_to_move() - 1] = to;

        Self {
            blocked: self.blocked | bit(to),
            locations,
            p1_turn: !self.p1_turn,
            move_number: self.move_number + 1,
        }
    }
}

impl GameState for KnightIsolationState {
    fn initial() -> Self {
        Self::with_positions(0, (WIDTH * HEIGHT - 1) as u8, &[], true)
    }
}

impl Display for KnightIsolationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let square = (row * WIDTH + col) as u8;
                let symbol = if square == self.locations[0] {
                    '1'
                } else if square == self.locations[1] {
                    '2'
                } else if self.is_blocked(square) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug)]
pub struct KnightMove(pub u8);

impl Display for KnightMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Winner(pub usize);

impl Value for Winner {
    fn get_value_for_player(&self, player: usize) -> f32 {
        if self.0 == player {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Default)]
pub struct KnightIsolation {}

impl KnightIsolation {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameEngine for KnightIsolation {
    type Action = KnightMove;
    type State = KnightIsolationState;
    type Terminal = Winner;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        game_state.move_knight(action.0)
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        game_state.player_to_move()
    }

    fn move_number(&self, game_state: &Self::State) -> usize {
        game_state.move_number
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal> {
        let player = game_state.player_to_move();

        if game_state.moves_for(player).next().is_none() {
            Some(Winner(crate::opponent(player)))
        } else {
            None
        }
    }
}

impl ValidActions for KnightIsolation {
    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action> {
        game_state
            .moves_for(game_state.player_to_move())
            .map(KnightMove)
            .collect()
    }
}

impl Mobility for KnightIsolation {
    fn mobility(&self, game_state: &Self::State, player: usize) -> usize {
        game_state.moves_for(player).count()
    }
}

impl CanonicalKeys for KnightIsolation {
    fn state_key(&self, game_state: &Self::State) -> String {
        format!(
            "{:025b}|{}|{}|{}",
            game_state.blocked,
            game_state.locations[0],
            game_state.locations[1],
            game_state.player_to_move()
        )
    }

    fn action_key(&self, action: &Self::Action) -> String {
        action.to_string()
    }
}

fn bit(square: u8) -> u32 {
    1 << square
}
