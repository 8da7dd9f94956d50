//! # Directional Ant Locomotion
//!
//! The quadruped must run along the world x axis in a direction fixed per
//! task. Reward is the torso's velocity projected on the goal direction,
//! minus control and contact costs, plus a constant survival bonus. The
//! episode ends once the state goes non-finite or the torso leaves the
//! healthy height band.

use physics::{PhysicsSim, TORSO};
use serde::{Deserialize, Serialize};

use crate::config::AntDirConfig;
use crate::env::{Env, MetaEnv, Step};
use crate::error::EnvError;
use crate::noise;
use crate::space::BoxSpace;

const RESET_STREAM: u64 = 0;
const TASK_STREAM: u64 = 1;

/// Running direction along the x axis. Serialized as `1` or `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// `+1.0` or `-1.0`.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Backward),
            other => Err(format!("direction must be 1 or -1, got {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AntDirTask {
    pub direction: Direction,
}

/// Per-step reward decomposition.
///
/// Cost terms are reported negated so that the four rewards sum to the step
/// reward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntDirInfo {
    pub reward_forward: f64,
    pub reward_ctrl: f64,
    pub reward_contact: f64,
    pub reward_survive: f64,
    /// Active task, `None` until one is configured or set with
    /// [`MetaEnv::reset_task`].
    pub task: Option<AntDirTask>,
}

impl AntDirInfo {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.reward_forward + self.reward_ctrl + self.reward_contact + self.reward_survive
    }
}

pub struct AntDirEnv {
    sim: PhysicsSim,
    config: AntDirConfig,
    torso: usize,
    goal_dir: f64,
    task: Option<AntDirTask>,
    action_space: BoxSpace,
    observation_space: BoxSpace,
    action_scaling: Vec<f64>,
    reset_rng: fastrand::Rng,
    task_rng: fastrand::Rng,
}

impl AntDirEnv {
    /// Build the environment. Without a configured `goal` the goal direction
    /// is zero until a task is set, so the forward reward vanishes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] for an invalid configuration and
    /// [`EnvError::Physics`] if the ant model cannot be built.
    pub fn new(config: AntDirConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let sim = PhysicsSim::ant(&config.ant)?;
        let torso = sim.model().body_id(TORSO)?;

        let (low, high): (Vec<f32>, Vec<f32>) = sim
            .model()
            .actuators
            .iter()
            .map(|act| match act.ctrl_range {
                Some((lo, hi)) => (to_f32(lo), to_f32(hi)),
                None => (f32::NEG_INFINITY, f32::INFINITY),
            })
            .unzip();
        let action_space = BoxSpace::new(low, high)?;
        let action_scaling = action_space.scaling().into_iter().map(f64::from).collect();

        let base_seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        let task = config.goal.map(|direction| AntDirTask { direction });
        let mut env = Self {
            sim,
            config,
            torso,
            goal_dir: task.map_or(0.0, |t| t.direction.sign()),
            task,
            action_space,
            observation_space: BoxSpace::unbounded(0),
            action_scaling,
            reset_rng: fastrand::Rng::with_seed(noise::derive_seed(base_seed, RESET_STREAM)),
            task_rng: fastrand::Rng::with_seed(noise::derive_seed(base_seed, TASK_STREAM)),
        };
        env.observation_space = BoxSpace::unbounded(env.observation().len());
        tracing::debug!(
            frame_skip = env.config.frame_skip,
            dt = env.dt(),
            obs_size = env.observation_space.len(),
            goal = env.goal_dir,
            "built ant direction environment"
        );
        Ok(env)
    }

    #[must_use]
    pub fn config(&self) -> &AntDirConfig {
        &self.config
    }

    #[must_use]
    pub fn physics(&self) -> &PhysicsSim {
        &self.sim
    }

    /// Sign applied to the forward velocity: `+1`, `-1`, or `0` while no
    /// task is set.
    #[must_use]
    pub fn goal_direction(&self) -> f64 {
        self.goal_dir
    }

    #[must_use]
    pub fn task(&self) -> Option<AntDirTask> {
        self.task
    }

    /// Seconds of simulated time per step.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.sim.timestep() * self.config.frame_skip as f64
    }

    /// Overwrite the simulator state directly.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Physics`] if the slices have the wrong length.
    pub fn set_state(&mut self, qpos: &[f64], qvel: &[f64]) -> Result<(), EnvError> {
        self.sim.set_state(qpos, qvel)?;
        Ok(())
    }

    fn torso_x(&self) -> f64 {
        self.sim.body_com(self.torso).x
    }

    fn clipped_contact_forces(&self) -> Vec<f64> {
        let (lo, hi) = self.config.contact_force_range;
        self.sim
            .cfrc_ext()
            .into_iter()
            .map(|f| f.clamp(lo, hi))
            .collect()
    }

    /// Joint positions without the torso x and y, joint velocities, clipped
    /// contact wrenches, torso orientation (row-major) and torso center of
    /// mass.
    fn observation(&self) -> Vec<f32> {
        let qpos = &self.sim.qpos()[2..];
        let qvel = self.sim.qvel();
        let contacts = self.clipped_contact_forces();
        let xmat = self.sim.body_xmat(self.torso);
        let com = self.sim.body_com(self.torso);
        qpos.iter()
            .chain(qvel)
            .chain(&contacts)
            .chain(&xmat)
            .chain(com.iter())
            .map(|&v| to_f32(v))
            .collect()
    }
}

/// Whether every state entry is finite and the torso height, `state[2]`,
/// lies within `z_range` inclusive.
#[must_use]
pub fn is_healthy(state: &[f64], z_range: (f64, f64)) -> bool {
    let (lo, hi) = z_range;
    state.iter().all(|v| v.is_finite()) && state.get(2).is_some_and(|z| (lo..=hi).contains(z))
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

impl Env for AntDirEnv {
    type Info = AntDirInfo;

    fn step(&mut self, action: &[f32]) -> Result<Step<AntDirInfo>, EnvError> {
        if action.len() != self.action_space.len() {
            return Err(EnvError::ActionShape {
                expected: self.action_space.len(),
                actual: action.len(),
            });
        }
        let ctrl: Vec<f64> = action.iter().map(|&a| f64::from(a)).collect();

        let x_before = self.torso_x();
        self.sim.step(&ctrl, self.config.frame_skip)?;
        let x_after = self.torso_x();

        let forward_vel = (x_after - x_before) / self.dt();
        let reward_forward = self.goal_dir * forward_vel;

        // Costs use the raw action, before the simulator clamps it.
        let ctrl_cost = self.config.ctrl_cost_weight
            * ctrl
                .iter()
                .zip(&self.action_scaling)
                .map(|(a, s)| (a / s).powi(2))
                .sum::<f64>();
        let contact_cost = self.config.contact_cost_weight
            * self
                .clipped_contact_forces()
                .iter()
                .map(|f| f * f)
                .sum::<f64>();
        let reward_survive = self.config.survive_reward;
        let reward = reward_forward - ctrl_cost - contact_cost + reward_survive;

        let state = self.sim.state_vector();
        let done = !is_healthy(&state, self.config.healthy_z_range);
        if state.iter().any(|v| !v.is_finite()) {
            tracing::warn!(time = self.sim.time(), "simulation state became non-finite");
        }

        Ok(Step {
            obs: self.observation(),
            reward,
            done,
            info: AntDirInfo {
                reward_forward,
                reward_ctrl: -ctrl_cost,
                reward_contact: -contact_cost,
                reward_survive,
                task: self.task,
            },
        })
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        self.sim.reset();
        let half_width = self.config.reset_qpos_noise;
        let std = self.config.reset_qvel_noise;
        let rng = &mut self.reset_rng;
        let qpos: Vec<f64> = self
            .sim
            .qpos()
            .iter()
            .map(|q| q + noise::uniform(rng, -half_width, half_width))
            .collect();
        let qvel: Vec<f64> = self
            .sim
            .qvel()
            .iter()
            .map(|v| v + std * noise::standard_normal(rng))
            .collect();
        self.sim.set_state(&qpos, &qvel)?;
        Ok(self.observation())
    }

    fn action_space(&self) -> BoxSpace {
        self.action_space.clone()
    }

    fn observation_space(&self) -> BoxSpace {
        self.observation_space.clone()
    }

    fn seed(&mut self, seed: u64) {
        self.reset_rng = fastrand::Rng::with_seed(noise::derive_seed(seed, RESET_STREAM));
        self.task_rng = fastrand::Rng::with_seed(noise::derive_seed(seed, TASK_STREAM));
    }
}

impl MetaEnv for AntDirEnv {
    type Task = AntDirTask;

    fn sample_tasks(&mut self, num_tasks: usize) -> Vec<AntDirTask> {
        (0..num_tasks)
            .map(|_| AntDirTask {
                direction: if noise::coin(&mut self.task_rng) {
                    Direction::Forward
                } else {
                    Direction::Backward
                },
            })
            .collect()
    }

    fn reset_task(&mut self, task: AntDirTask) {
        tracing::debug!(direction = task.direction.sign(), "reset task");
        self.task = Some(task);
        self.goal_dir = task.direction.sign();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_band_is_inclusive() {
        let mut state = vec![0.0; 29];
        state[2] = 0.2;
        assert!(is_healthy(&state, (0.2, 1.0)));
        state[2] = 1.0;
        assert!(is_healthy(&state, (0.2, 1.0)));
        state[2] = 0.19;
        assert!(!is_healthy(&state, (0.2, 1.0)));
        state[2] = 1.01;
        assert!(!is_healthy(&state, (0.2, 1.0)));
    }

    #[test]
    fn non_finite_state_is_unhealthy() {
        let mut state = vec![0.0; 29];
        state[2] = 0.5;
        state[20] = f64::INFINITY;
        assert!(!is_healthy(&state, (0.2, 1.0)));
        state[20] = f64::NAN;
        assert!(!is_healthy(&state, (0.2, 1.0)));
    }

    #[test]
    fn direction_serializes_as_sign() {
        let task = AntDirTask {
            direction: Direction::Backward,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"direction":-1}"#);
        let back: AntDirTask = serde_json::from_str(r#"{"direction":1}"#).unwrap();
        assert_eq!(back.direction, Direction::Forward);
        assert!(serde_json::from_str::<AntDirTask>(r#"{"direction":0}"#).is_err());
    }
}
