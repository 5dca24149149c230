use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use engine::{CanonicalKeys, ValidActions};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use search::{search_within, Evaluator, IterativeDeepening};

use super::{AgentOptions, OpeningBook};

/// Plays book or random moves through the opening, then searches with iterative deepening.
pub struct DepthAgent<E, V> {
    engine: Arc<E>,
    evaluator: V,
    book: OpeningBook,
    opening_plies: usize,
    max_depth: Option<usize>,
    move_time: Option<Duration>,
    rng: StdRng,
}

impl<E, V> DepthAgent<E, V>
where
    E: ValidActions + CanonicalKeys + Send + Sync + 'static,
    E::State: Clone + Send + 'static,
    E::Action: Clone + Send + 'static,
    V: Evaluator<E> + Clone + Send + 'static,
{
    pub fn new(engine: Arc<E>, evaluator: V, max_depth: Option<usize>) -> Self {
        Self {
            engine,
            evaluator,
            book: OpeningBook::new(),
            opening_plies: 0,
            max_depth,
            move_time: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_options(engine: Arc<E>, evaluator: V, options: &AgentOptions) -> Result<Self> {
        let book = match &options.opening_book_path {
            Some(path) => OpeningBook::load(path)
                .with_context(|| format!("Failed to load opening book from {:?}", path))?,
            None => OpeningBook::new(),
        };

        let mut agent = Self::new(engine, evaluator, options.max_depth)
            .with_opening(book, options.opening_plies);
        agent.move_time = options.move_time;

        Ok(agent)
    }

    /// Positions up to and including move `opening_plies` are played from `book`, or at random
    /// when the book has no entry.
    pub fn with_opening(mut self, book: OpeningBook, opening_plies: usize) -> Self {
        self.book = book;
        self.opening_plies = opening_plies;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Decides with the configured move time, or searches to the configured depth without a
    /// time limit.
    pub fn choose(&mut self, game_state: &E::State) -> Option<E::Action> {
        match self.move_time {
            Some(budget) => self.decide_within(game_state, budget),
            None => self.decide(game_state, &AtomicBool::new(false), |_| {}),
        }
    }

    /// Publishes the best action of every completed depth and returns the last one.
    ///
    /// `cancel` is checked between depths only. Returns `None` when there is no legal action or
    /// when cancelled before the first depth finished.
    pub fn decide<F>(
        &mut self,
        game_state: &E::State,
        cancel: &AtomicBool,
        mut publish: F,
    ) -> Option<E::Action>
    where
        F: FnMut(&E::Action),
    {
        if let Some(action) = self.opening_move(game_state) {
            publish(&action);
            return Some(action);
        }

        let search = IterativeDeepening::new(&*self.engine, &self.evaluator, self.max_depth);

        search
            .run(game_state, cancel, |result| publish(&result.action))
            .map(|result| result.action)
    }

    /// Searches until `budget` is spent and returns the deepest completed result. Falls back to
    /// the first legal action if no depth finished in time.
    pub fn decide_within(&mut self, game_state: &E::State, budget: Duration) -> Option<E::Action> {
        if let Some(action) = self.opening_move(game_state) {
            return Some(action);
        }

        let result = search_within(
            self.engine.clone(),
            self.evaluator.clone(),
            game_state.clone(),
            self.max_depth,
            budget,
        );

        match result {
            Some(result) => {
                debug!(
                    "Searched to depth {} within {:?}, Score: {}",
                    result.depth, budget, result.score
                );
                Some(result.action)
            }
            None => {
                debug!("No depth completed within {:?}", budget);
                self.engine.valid_actions(game_state).into_iter().next()
            }
        }
    }

    fn opening_move(&mut self, game_state: &E::State) -> Option<E::Action> {
        if self.engine.move_number(game_state) > self.opening_plies {
            return None;
        }

        if let Some(action) = self.book.lookup(&*self.engine, game_state) {
            debug!("Playing book move");
            return Some(action);
        }

        self.engine
            .valid_actions(game_state)
            .choose(&mut self.rng)
            .cloned()
    }
}
