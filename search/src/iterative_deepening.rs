use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use engine::ValidActions;
use log::debug;

use super::{DepthResult, Evaluator, Minimax};

/// Repeats a full minimax search at depths `1, 2, ...` and publishes the best action of every
/// completed depth.
///
/// Cancellation is only observed between depths. A depth that has started always runs to
/// completion before its result is published.
pub struct IterativeDeepening<'a, E, V> {
    minimax: Minimax<'a, E, V>,
    max_depth: Option<usize>,
}

impl<'a, E, V> IterativeDeepening<'a, E, V>
where
    E: ValidActions,
    E::Action: Clone,
    V: Evaluator<E>,
{
    /// `max_depth` of `None` deepens until cancelled or until the whole game tree has been searched.
    pub fn new(engine: &'a E, evaluator: &'a V, max_depth: Option<usize>) -> Self {
        Self {
            minimax: Minimax::new(engine, evaluator),
            max_depth,
        }
    }

    pub fn run<F>(
        &self,
        game_state: &E::State,
        cancel: &AtomicBool,
        mut publish: F,
    ) -> Option<DepthResult<E::Action>>
    where
        F: FnMut(DepthResult<E::Action>),
    {
        let mut latest = None;
        let mut depth = 1;

        while self.max_depth.map_or(true, |max_depth| depth <= max_depth) {
            if cancel.load(Ordering::SeqCst) {
                break;
            }

            let result = self.minimax.search(game_state, depth)?;
            let complete = result.complete;

            debug!(
                "Depth: {}, Score: {}, Nodes: {}, Complete: {}",
                result.depth, result.score, result.nodes, complete
            );

            publish(result.clone());
            latest = Some(result);

            if complete {
                break;
            }

            depth += 1;
        }

        latest
    }
}

/// Runs iterative deepening on a worker thread and returns the last result published before
/// `budget` elapsed.
///
/// The worker is signalled to stop once the budget is spent but is not waited on, so the call
/// returns on time even while a depth is still in progress. Returns `None` when not even depth
/// one finished in time.
pub fn search_within<E, V>(
    engine: Arc<E>,
    evaluator: V,
    game_state: E::State,
    max_depth: Option<usize>,
    budget: Duration,
) -> Option<DepthResult<E::Action>>
where
    E: ValidActions + Send + Sync + 'static,
    E::State: Send + 'static,
    E::Action: Clone + Send + 'static,
    V: Evaluator<E> + Send + 'static,
{
    let deadline = Instant::now() + budget;
    let (results_tx, results_rx) = channel::unbounded();
    let cancel = Arc::new(AtomicBool::new(false));

    {
        let cancel = cancel.clone();
        thread::spawn(move || {
            let search = IterativeDeepening::new(&*engine, &evaluator, max_depth);
            search.run(&game_state, &cancel, |result| {
                if results_tx.send(result).is_err() {
                    cancel.store(true, Ordering::SeqCst);
                }
            });
        });
    }

    let mut latest = None;

    loop {
        match results_rx.recv_deadline(deadline) {
            Ok(result) => latest = Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    cancel.store(true, Ordering::SeqCst);

    latest
}
