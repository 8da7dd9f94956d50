use physics::AntConfig;
use serde::{Deserialize, Serialize};

use crate::ant_dir::Direction;
use crate::error::EnvError;

/// Configuration for [`AntDirEnv`](crate::AntDirEnv).
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntDirConfig {
    pub ant: AntConfig,
    /// Physics frames per environment step.
    pub frame_skip: usize,
    pub ctrl_cost_weight: f64,
    pub contact_cost_weight: f64,
    pub survive_reward: f64,
    /// Contact wrenches are clipped to this range in both cost and
    /// observation.
    pub contact_force_range: (f64, f64),
    /// Inclusive torso height range outside of which the episode ends.
    pub healthy_z_range: (f64, f64),
    /// Half-width of the uniform noise added to `qpos` on reset.
    pub reset_qpos_noise: f64,
    /// Standard deviation of the Gaussian noise added to `qvel` on reset.
    pub reset_qvel_noise: f64,
    /// Episode length used by [`TimeLimit`](crate::TimeLimit).
    pub max_episode_steps: usize,
    /// Task active from construction. `None` leaves the goal direction at
    /// zero until a task is set.
    pub goal: Option<Direction>,
    /// Seed for the reset and task streams. Unseeded environments draw from
    /// system entropy.
    pub seed: Option<u64>,
}

impl Default for AntDirConfig {
    fn default() -> Self {
        Self {
            ant: AntConfig::default(),
            frame_skip: 5,
            ctrl_cost_weight: 0.5e-2,
            contact_cost_weight: 0.5e-3,
            survive_reward: 0.05,
            contact_force_range: (-1.0, 1.0),
            healthy_z_range: (0.2, 1.0),
            reset_qpos_noise: 0.1,
            reset_qvel_noise: 0.1,
            max_episode_steps: 200,
            goal: None,
            seed: None,
        }
    }
}

impl AntDirConfig {
    /// Parse a JSON document, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] if the document is malformed or the
    /// resulting configuration is invalid.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EnvError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`EnvError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.frame_skip == 0 {
            return Err(EnvError::Config("frame_skip must be at least 1".into()));
        }
        if self.max_episode_steps == 0 {
            return Err(EnvError::Config("max_episode_steps must be at least 1".into()));
        }
        let (lo, hi) = self.healthy_z_range;
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(EnvError::Config(format!("empty healthy_z_range ({lo}, {hi})")));
        }
        let (lo, hi) = self.contact_force_range;
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(EnvError::Config(format!("empty contact_force_range ({lo}, {hi})")));
        }
        if self.reset_qpos_noise < 0.0 || self.reset_qvel_noise < 0.0 {
            return Err(EnvError::Config("reset noise scales must be non-negative".into()));
        }
        Ok(())
    }

    /// Seconds of simulated time per environment step.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.ant.timestep * self.frame_skip as f64
    }
}
