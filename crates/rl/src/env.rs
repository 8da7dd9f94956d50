use crate::error::EnvError;
use crate::space::BoxSpace;

/// Outcome of a single [`Env::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step<I> {
    pub obs: Vec<f32>,
    pub reward: f64,
    pub done: bool,
    pub info: I,
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, whether the episode has terminated, and environment specific
/// diagnostics.
///
/// [`step`]: Env::step
pub trait Env {
    /// Diagnostics reported alongside every step.
    type Info;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionShape`] if `action` does not match
    /// [`action_size`](Env::action_size), or a simulation error.
    fn step(&mut self, action: &[f32]) -> Result<Step<Self::Info>, EnvError>;

    /// Reset the environment to a starting state and return the initial
    /// observation vector.
    ///
    /// # Errors
    ///
    /// Propagates simulation errors.
    fn reset(&mut self) -> Result<Vec<f32>, EnvError>;

    fn action_space(&self) -> BoxSpace;

    fn observation_space(&self) -> BoxSpace;

    /// Reseed every random stream the environment owns.
    fn seed(&mut self, seed: u64);

    /// Size of the observation vector.
    fn obs_size(&self) -> usize {
        self.observation_space().len()
    }

    /// Size of the action space.
    fn action_size(&self) -> usize {
        self.action_space().len()
    }
}

/// An environment drawn from a distribution of tasks.
///
/// A meta-learner samples tasks, fixes one with [`reset_task`], and then
/// collects ordinary episodes through [`Env`]. The task persists across
/// resets until it is replaced.
///
/// [`reset_task`]: MetaEnv::reset_task
pub trait MetaEnv: Env {
    type Task: Clone;

    /// Draw `num_tasks` independent tasks.
    fn sample_tasks(&mut self, num_tasks: usize) -> Vec<Self::Task>;

    /// Make `task` the active task for subsequent episodes.
    fn reset_task(&mut self, task: Self::Task);
}
