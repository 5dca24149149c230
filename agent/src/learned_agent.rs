use std::path::PathBuf;

use anyhow::{Context, Result};
use engine::{CanonicalKeys, ValidActions};
use experience::{
    ActionKey, Episode, ExperienceRecorder, SnapshotPersistance, StateKey, ValueStore,
};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{blend, sample, AgentOptions, RewardModel};

/// The action chosen for a position and, when the choice was sampled, the keys to record for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision<A> {
    pub action: A,
    /// `None` for a forced move.
    pub keys: Option<(ActionKey, StateKey)>,
}

/// Samples moves from a blend of one ply heuristic scores and learned values.
pub struct LearnedHeuristicAgent<E, M> {
    engine: E,
    reward: M,
    store: ValueStore,
    alpha: f32,
    default_value: f32,
    rng: StdRng,
}

impl<E, M> LearnedHeuristicAgent<E, M>
where
    E: ValidActions + CanonicalKeys,
    M: RewardModel<E>,
{
    pub fn new(engine: E, reward: M, store: ValueStore, alpha: f32, default_value: f32) -> Self {
        Self {
            engine,
            reward,
            store,
            alpha,
            default_value,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Sampling distribution over `actions` in `game_state`.
    pub fn policy(&self, game_state: &E::State, actions: &[E::Action]) -> Vec<f32> {
        let state_key = self.engine.state_key(game_state);
        let action_keys = actions
            .iter()
            .map(|action| self.engine.action_key(action))
            .collect::<Vec<_>>();

        let heuristic_scores = self.reward.score_all(&self.engine, game_state, actions);
        let learned_values = self
            .store
            .get_all(&state_key, &action_keys, self.default_value);

        blend(&heuristic_scores, &learned_values, self.alpha)
    }

    /// Returns `None` only when the player to move has no legal action.
    pub fn decide(&mut self, game_state: &E::State) -> Option<Decision<E::Action>> {
        let mut actions = self.engine.valid_actions(game_state);

        if actions.len() <= 1 {
            return actions.pop().map(|action| Decision { action, keys: None });
        }

        let policy = self.policy(game_state, &actions);
        let index = sample(&policy, &mut self.rng)?;

        debug!("Policy: {:?}, Selected: {}", policy, index);

        let action = actions.swap_remove(index);
        let keys = (
            self.engine.action_key(&action),
            self.engine.state_key(game_state),
        );

        Some(Decision {
            action,
            keys: Some(keys),
        })
    }
}

/// A learned heuristic agent together with the episode it is playing and the recorder that turns
/// the episode's result into a snapshot.
pub struct LearningSession<E, M> {
    agent: LearnedHeuristicAgent<E, M>,
    episode: Episode,
    recorder: ExperienceRecorder,
}

impl<E, M> LearningSession<E, M>
where
    E: ValidActions + CanonicalKeys,
    M: RewardModel<E>,
{
    /// Loads the canonical store and resumes the journaled episode if one is configured.
    pub fn open(engine: E, reward: M, options: &AgentOptions) -> Result<Self> {
        let store = ValueStore::load(&options.canonical_path)
            .with_context(|| format!("Failed to load values from {:?}", options.canonical_path))?;

        let episode = match &options.journal_path {
            Some(journal) => Episode::with_journal(journal)
                .with_context(|| format!("Failed to resume episode from {:?}", journal))?,
            None => Episode::new(),
        };

        let snapshots =
            SnapshotPersistance::new(options.snapshot_dir.clone(), options.worker_id.clone())?;
        let recorder = ExperienceRecorder::new(options.canonical_path.clone(), snapshots)
            .with_reward_increment(options.reward_increment)
            .with_min_history(options.min_history);

        let agent =
            LearnedHeuristicAgent::new(engine, reward, store, options.alpha, options.default_value);

        Ok(Self {
            agent,
            episode,
            recorder,
        })
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.agent = self.agent.with_rng(rng);
        self
    }

    pub fn agent(&self) -> &LearnedHeuristicAgent<E, M> {
        &self.agent
    }

    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    pub fn decide(&mut self, game_state: &E::State) -> Result<Option<E::Action>> {
        let decision = match self.agent.decide(game_state) {
            Some(decision) => decision,
            None => return Ok(None),
        };

        if let Some((action_key, state_key)) = decision.keys {
            self.recorder
                .record_move(&mut self.episode, action_key, state_key)?;
        }

        Ok(Some(decision.action))
    }

    /// Returns the path of the written snapshot, if the episode was long enough to be recorded.
    pub fn record_result(&mut self, win: bool) -> Result<Option<PathBuf>> {
        let snapshot_path = self.recorder.record_result(&mut self.episode, win)?;

        Ok(snapshot_path)
    }
}
