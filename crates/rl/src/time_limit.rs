use serde::Serialize;

use crate::env::{Env, MetaEnv, Step};
use crate::error::EnvError;
use crate::space::BoxSpace;

/// Inner info plus whether the episode was cut short by the step limit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeLimitInfo<I> {
    #[serde(flatten)]
    pub inner: I,
    pub truncated: bool,
}

/// Ends episodes after a fixed number of steps.
///
/// Stepping before the first [`reset`](Env::reset) is an error.
pub struct TimeLimit<E> {
    env: E,
    max_episode_steps: usize,
    elapsed: Option<usize>,
}

impl<E: Env> TimeLimit<E> {
    #[must_use]
    pub fn new(env: E, max_episode_steps: usize) -> Self {
        Self {
            env,
            max_episode_steps,
            elapsed: None,
        }
    }

    #[must_use]
    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn into_inner(self) -> E {
        self.env
    }

    #[must_use]
    pub fn max_episode_steps(&self) -> usize {
        self.max_episode_steps
    }

    /// Steps taken since the last reset, `None` before the first one.
    #[must_use]
    pub fn elapsed_steps(&self) -> Option<usize> {
        self.elapsed
    }
}

impl<E: Env> Env for TimeLimit<E> {
    type Info = TimeLimitInfo<E::Info>;

    fn step(&mut self, action: &[f32]) -> Result<Step<Self::Info>, EnvError> {
        let elapsed = self.elapsed.ok_or(EnvError::NeedsReset)?;
        let step = self.env.step(action)?;
        let elapsed = elapsed + 1;
        self.elapsed = Some(elapsed);
        let truncated = elapsed >= self.max_episode_steps && !step.done;
        Ok(Step {
            obs: step.obs,
            reward: step.reward,
            done: step.done || truncated,
            info: TimeLimitInfo {
                inner: step.info,
                truncated,
            },
        })
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        let obs = self.env.reset()?;
        self.elapsed = Some(0);
        Ok(obs)
    }

    fn action_space(&self) -> BoxSpace {
        self.env.action_space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.env.observation_space()
    }

    fn seed(&mut self, seed: u64) {
        self.env.seed(seed);
    }
}

impl<E: MetaEnv> MetaEnv for TimeLimit<E> {
    type Task = E::Task;

    fn sample_tasks(&mut self, num_tasks: usize) -> Vec<E::Task> {
        self.env.sample_tasks(num_tasks)
    }

    fn reset_task(&mut self, task: E::Task) {
        self.env.reset_task(task);
    }
}
