//! Tabular Q-learning agent
//!
//! Composes the three responsibilities that share the value table: the
//! ε-greedy policy, the Bellman-backup learner, and (via
//! [`persistence`](super::persistence)) the durable table format.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::q_table::QTable;
use crate::{error::Result, types::StateKey};

/// Hyperparameters fixed at agent construction.
///
/// # Examples
///
/// ```
/// use qtac::agent::QAgentConfig;
///
/// let config = QAgentConfig::default()
///     .with_alpha(0.3)
///     .with_epsilon(0.8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QAgentConfig {
    /// Learning rate α ∈ (0, 1]
    pub alpha: f64,
    /// Discount factor γ ∈ [0, 1]
    pub gamma: f64,
    /// Initial exploration rate ε ∈ [0, 1]
    pub epsilon: f64,
    /// Multiplicative ε decay applied once per episode
    pub epsilon_decay: f64,
    /// Floor below which ε never decays
    pub epsilon_min: f64,
}

impl Default for QAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.9995,
            epsilon_min: 0.01,
        }
    }
}

impl QAgentConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = decay;
        self
    }

    pub fn with_epsilon_min(mut self, floor: f64) -> Self {
        self.epsilon_min = floor;
        self
    }

    /// Check every hyperparameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] naming the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, message: String| {
            if ok {
                Ok(())
            } else {
                Err(crate::Error::InvalidConfiguration { message })
            }
        };

        check(
            self.alpha > 0.0 && self.alpha <= 1.0,
            format!("alpha must be in (0, 1], got {}", self.alpha),
        )?;
        check(
            (0.0..=1.0).contains(&self.gamma),
            format!("gamma must be in [0, 1], got {}", self.gamma),
        )?;
        check(
            (0.0..=1.0).contains(&self.epsilon),
            format!("epsilon must be in [0, 1], got {}", self.epsilon),
        )?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            format!("epsilon_decay must be in (0, 1], got {}", self.epsilon_decay),
        )?;
        check(
            (0.0..=1.0).contains(&self.epsilon_min),
            format!("epsilon_min must be in [0, 1], got {}", self.epsilon_min),
        )
    }
}

/// Tabular Q-learning agent over a lazily-populated value table.
///
/// The table is the agent's entire long-term memory; the only other state
/// surviving an episode is the decaying exploration rate, which is process
/// local and never persisted.
#[derive(Debug, Clone)]
pub struct QAgent {
    pub(super) table: QTable,
    alpha: f64,
    gamma: f64,
    pub(super) epsilon: f64,
    epsilon_decay: f64,
    epsilon_min: f64,
    rng: StdRng,
}

impl QAgent {
    /// Create an agent with an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if any hyperparameter is out of range.
    pub fn new(config: QAgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: QTable::new(),
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            epsilon_min: config.epsilon_min,
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    /// Seed the agent's RNG for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// ε-greedy action selection.
    ///
    /// With probability ε (only when `training` is set) a uniformly random
    /// legal action is returned. Otherwise every legal action is seeded in
    /// the table at 0.0 if unseen and one of the maximal-value actions is
    /// returned, ties broken uniformly at random. The returned action is
    /// always a member of `legal_actions`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] when `legal_actions` is
    /// empty. That is a caller bug (a move was requested in a finished
    /// game), reported distinctly from any data or I/O problem.
    pub fn choose_action(
        &mut self,
        state: &StateKey,
        legal_actions: &[usize],
        training: bool,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(crate::Error::NoLegalActions);
        }

        if training && self.rng.random::<f64>() < self.epsilon {
            // Explore: uniform among legal actions
            return Ok(*legal_actions.choose(&mut self.rng).unwrap());
        }

        // Exploit: seed unseen pairs at 0.0, then pick among exact-tie maxima
        let values: Vec<f64> = legal_actions
            .iter()
            .map(|&action| self.table.get_or_insert(state, action))
            .collect();
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let candidates: Vec<usize> = legal_actions
            .iter()
            .zip(&values)
            .filter(|&(_, &value)| value == best)
            .map(|(&action, _)| action)
            .collect();

        Ok(*candidates.choose(&mut self.rng).unwrap())
    }

    /// One-step Q-learning update (Bellman backup).
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)], with the future
    /// term read as 0.0 on terminal transitions or an empty successor action
    /// set. Exactly one entry is written; the successor's entries are only
    /// synthesized (at 0.0) when the successor state is entirely unknown.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[usize],
        is_terminal: bool,
    ) {
        let current_q = self.table.get_or_insert(state, action);
        if !self.table.contains_state(next_state) {
            self.table.ensure_actions(next_state, next_legal_actions);
        }

        let bootstrap = if is_terminal {
            0.0
        } else {
            self.table.max_over(next_state, next_legal_actions)
        };

        let new_q = current_q + self.alpha * (reward + self.gamma * bootstrap - current_q);
        self.table.set(state, action, new_q);
    }

    /// Decay ε after a completed episode, clamped at the configured floor.
    pub fn decay_exploration(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Shared view of the learned table
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Number of states with at least one table entry
    pub fn states_known(&self) -> usize {
        self.table.states_known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::BoardState;

    fn key(s: &str) -> StateKey {
        BoardState::from_string(s).unwrap().key()
    }

    fn greedy_agent() -> QAgent {
        QAgent::new(QAgentConfig::default().with_epsilon(0.0))
            .unwrap()
            .with_seed(7)
    }

    #[test]
    fn test_empty_legal_actions_is_contract_violation() {
        let mut agent = greedy_agent();
        let err = agent.choose_action(&key("         "), &[], true).unwrap_err();
        assert!(matches!(err, crate::Error::NoLegalActions));
    }

    #[test]
    fn test_greedy_picks_strict_maximum() {
        let mut agent = greedy_agent();
        let state = key("         ");
        agent.table.set(&state, 0, 0.5);
        agent.table.set(&state, 1, 1.5);
        agent.table.set(&state, 2, 0.8);

        for _ in 0..20 {
            assert_eq!(agent.choose_action(&state, &[0, 1, 2], false).unwrap(), 1);
        }
    }

    #[test]
    fn test_choose_action_seeds_unseen_pairs() {
        let mut agent = greedy_agent();
        let state = key("         ");
        agent.choose_action(&state, &[3, 4], false).unwrap();

        assert_eq!(agent.table.get(&state, 3), Some(0.0));
        assert_eq!(agent.table.get(&state, 4), Some(0.0));
    }

    #[test]
    fn test_tie_break_stays_in_maximal_set() {
        let mut agent = greedy_agent();
        let state = key("         ");
        agent.table.set(&state, 0, 1.0);
        agent.table.set(&state, 5, 1.0);
        agent.table.set(&state, 8, -1.0);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let action = agent.choose_action(&state, &[0, 5, 8], false).unwrap();
            assert!(action == 0 || action == 5);
            seen.insert(action);
        }
        // Both maximal actions show up under uniform tie-breaking.
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_exploration_returns_legal_action() {
        let mut agent = QAgent::new(QAgentConfig::default()).unwrap().with_seed(3);
        let state = key("         ");
        for _ in 0..50 {
            let action = agent.choose_action(&state, &[2, 6], true).unwrap();
            assert!(action == 2 || action == 6);
        }
    }

    #[test]
    fn test_bellman_update_exact() {
        let mut agent = greedy_agent();
        let state = key("         ");
        let next = key("X        ");
        agent.table.set(&state, 4, 0.25);
        agent.table.set(&next, 1, 1.0);
        agent.table.set(&next, 2, 2.0);

        agent.update(&state, 4, 0.0, &next, &[1, 2], false);

        let expected = 0.25 + 0.5 * (0.0 + 0.9 * 2.0 - 0.25);
        assert_eq!(agent.table.get(&state, 4), Some(expected));
    }

    #[test]
    fn test_terminal_update_ignores_future() {
        let mut agent = greedy_agent();
        let state = key("         ");
        let next = key("X        ");
        agent.table.set(&next, 0, 100.0);

        agent.update(&state, 4, 1.0, &next, &[0], true);

        // 0 + 0.5 * (1.0 + 0 - 0)
        assert_eq!(agent.table.get(&state, 4), Some(0.5));
    }

    #[test]
    fn test_update_seeds_unknown_successor() {
        let mut agent = greedy_agent();
        let state = key("         ");
        let next = key("X O      ");

        agent.update(&state, 0, 0.0, &next, &[1, 3], false);

        assert_eq!(agent.table.get(&next, 1), Some(0.0));
        assert_eq!(agent.table.get(&next, 3), Some(0.0));
    }

    #[test]
    fn test_update_leaves_partial_successor_alone() {
        let mut agent = greedy_agent();
        let state = key("         ");
        let next = key("X O      ");
        agent.table.set(&next, 1, 0.75);

        agent.update(&state, 0, 0.0, &next, &[1, 3], false);

        // Successor already had an entry, so action 3 is not synthesized.
        assert_eq!(agent.table.get(&next, 3), None);
        assert_eq!(agent.table.get(&state, 0), Some(0.5 * 0.9 * 0.75));
    }

    #[test]
    fn test_decay_respects_floor() {
        let mut agent = QAgent::new(
            QAgentConfig::default()
                .with_epsilon(0.05)
                .with_epsilon_decay(0.5)
                .with_epsilon_min(0.01),
        )
        .unwrap();

        let mut previous = agent.epsilon();
        for _ in 0..10 {
            agent.decay_exploration();
            assert!(agent.epsilon() <= previous);
            assert!(agent.epsilon() >= 0.01);
            previous = agent.epsilon();
        }
        assert_eq!(agent.epsilon(), 0.01);
    }

    #[test]
    fn test_config_validation() {
        assert!(QAgentConfig::default().validate().is_ok());
        assert!(QAgentConfig::default().with_alpha(0.0).validate().is_err());
        assert!(QAgentConfig::default().with_alpha(1.5).validate().is_err());
        assert!(QAgentConfig::default().with_gamma(-0.1).validate().is_err());
        assert!(QAgentConfig::default().with_epsilon(2.0).validate().is_err());
        assert!(QAgent::new(QAgentConfig::default().with_alpha(0.0)).is_err());
    }
}
