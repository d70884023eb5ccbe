//! Epsilon-greedy Q-learning agent
//!
//! The agent owns the Q-table, its hyperparameters and a seedable random
//! number generator. Action selection is also exposed as the free function
//! [`choose_action`] so callers holding a bare table can use it directly.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Result,
    app::AgentConfig,
    environment::{Action, Position, Transition},
    ports::Learner,
    q_learning::q_table::QTable,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// ε-greedy action selection
///
/// With probability `epsilon` returns a uniformly random action; otherwise
/// the greedy action at `state`, ties going to the lowest action index.
///
/// # Panics
///
/// Panics if `state` lies outside the table's grid.
pub fn choose_action<R: Rng>(
    state: Position,
    table: &QTable,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    let greedy = table.greedy_action(state);
    if rng.random::<f64>() < epsilon {
        // Explore: random action
        Action::ALL[rng.random_range(0..Action::COUNT)]
    } else {
        // Exploit: greedy action based on Q-values
        greedy
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Exploration rate is fixed for the lifetime of the agent.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent for a `size`x`size` grid
    ///
    /// # Arguments
    ///
    /// * `size` - Grid side length
    /// * `learning_rate` - α parameter, in (0, 1]
    /// * `discount_factor` - γ parameter, in (0, 1]
    /// * `epsilon` - Exploration rate, in [0, 1]
    pub fn new(size: usize, learning_rate: f64, discount_factor: f64, epsilon: f64) -> Self {
        Self {
            q_table: QTable::new(size),
            learning_rate,
            discount_factor,
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Create an agent from a validated configuration
    pub fn from_config(size: usize, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let agent = Self::new(
            size,
            config.learning_rate,
            config.discount_factor,
            config.epsilon,
        );
        Ok(match config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Learner for QLearningAgent {
    fn select_action(&mut self, state: Position) -> Action {
        choose_action(state, &self.q_table, self.epsilon, &mut self.rng)
    }

    fn learn(&mut self, transition: &Transition) -> Result<()> {
        self.q_table.q_learning_update(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
            self.learning_rate,
            self.discount_factor,
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_epsilon_on_untrained_table_always_up() {
        let table = QTable::new(10);
        let mut rng = StdRng::seed_from_u64(3);
        for row in 0..10 {
            for col in 0..10 {
                let action = choose_action(Position::new(row, col), &table, 0.0, &mut rng);
                assert_eq!(action, Action::Up);
            }
        }
    }

    #[test]
    fn test_zero_epsilon_exploits() {
        let mut table = QTable::new(3);
        let state = Position::new(1, 1);
        table.set(state, Action::Right, 0.7);
        table.set(state, Action::Down, 0.7);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(choose_action(state, &table, 0.0, &mut rng), Action::Down);
        }
    }

    #[test]
    fn test_full_epsilon_is_uniform() {
        let mut table = QTable::new(3);
        let state = Position::new(0, 0);
        table.set(state, Action::Left, 10.0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0usize; Action::COUNT];
        for _ in 0..1000 {
            counts[choose_action(state, &table, 1.0, &mut rng).index()] += 1;
        }

        for (idx, &count) in counts.iter().enumerate() {
            let frequency = count as f64 / 1000.0;
            assert!(
                (frequency - 0.25).abs() <= 0.05,
                "action {idx} frequency {frequency} outside 25% ± 5%"
            );
        }
    }

    #[test]
    #[should_panic(expected = "outside 3x3 Q-table")]
    fn test_choose_action_rejects_state_outside_grid() {
        let table = QTable::new(3);
        let mut rng = StdRng::seed_from_u64(0);
        choose_action(Position::new(0, 3), &table, 0.0, &mut rng);
    }

    #[test]
    #[should_panic(expected = "outside 3x3 Q-table")]
    fn test_exploring_choice_rejects_state_outside_grid() {
        let table = QTable::new(3);
        let mut rng = StdRng::seed_from_u64(0);
        choose_action(Position::new(3, 3), &table, 1.0, &mut rng);
    }

    #[test]
    fn test_learn_applies_update() {
        let mut agent = QLearningAgent::new(3, 0.5, 0.9, 0.0).with_seed(1);
        let transition = Transition {
            state: Position::new(0, 0),
            action: Action::Right,
            reward: -1.0,
            next_state: Position::new(0, 1),
        };
        agent.learn(&transition).unwrap();
        assert!((agent.q_table().get(Position::new(0, 0), Action::Right) + 0.5).abs() < 1e-9);
        assert_eq!(agent.rng_seed(), Some(1));
    }

    #[test]
    fn test_seeded_agents_agree() {
        let mut a = QLearningAgent::new(4, 0.1, 0.9, 0.5).with_seed(17);
        let mut b = QLearningAgent::new(4, 0.1, 0.9, 0.5);
        b.set_rng_seed(17).unwrap();
        let state = Position::new(2, 2);
        let left: Vec<_> = (0..64).map(|_| a.select_action(state)).collect();
        let right: Vec<_> = (0..64).map(|_| b.select_action(state)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_from_config_validates() {
        let bad = AgentConfig::default().with_epsilon(2.0);
        assert!(QLearningAgent::from_config(5, &bad).is_err());

        let agent = QLearningAgent::from_config(5, &AgentConfig::default().with_seed(5)).unwrap();
        assert_eq!(agent.rng_seed(), Some(5));
        assert_eq!(agent.q_table().size(), 5);
    }
}
