//! # Rollout Logic
//!
//! [`run`] builds the environment from the configuration, samples tasks and
//! plays episodes with a fixed policy, logging each episode's return and
//! reward breakdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rl::{AntDirConfig, AntDirEnv, AntDirTask, Env, MetaEnv, TimeLimit};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// All motors idle.
    Zero,
    /// Uniform samples from the action space.
    Random,
}

#[derive(Clone, Debug)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub tasks: usize,
    pub episodes: usize,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub policy: Policy,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub task: Option<AntDirTask>,
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reward_forward: f64,
    pub reward_ctrl: f64,
    pub reward_contact: f64,
    pub reward_survive: f64,
    pub truncated: bool,
    /// Torso x displacement over the episode.
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub policy: Policy,
    pub max_episode_steps: usize,
    pub episodes: Vec<EpisodeSummary>,
}

fn load_config(options: &Options) -> Result<AntDirConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AntDirConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AntDirConfig::default(),
    };
    if let Some(steps) = options.max_steps {
        config.max_episode_steps = steps;
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Play one episode to termination or truncation.
fn rollout(
    env: &mut TimeLimit<AntDirEnv>,
    policy: Policy,
    rng: &mut fastrand::Rng,
) -> Result<EpisodeSummary> {
    env.reset().context("resetting environment")?;
    let space = env.action_space();
    let torso = env.inner().physics().model().body_id(physics::TORSO)?;
    let start_x = env.inner().physics().body_com(torso).x;

    let mut summary = EpisodeSummary {
        task: env.inner().task(),
        ..EpisodeSummary::default()
    };
    loop {
        let action = match policy {
            Policy::Zero => vec![0.0; space.len()],
            Policy::Random => space.sample(rng),
        };
        let step = env.step(&action).context("stepping environment")?;
        let info = &step.info.inner;
        summary.steps += 1;
        summary.total_reward += step.reward;
        summary.reward_forward += info.reward_forward;
        summary.reward_ctrl += info.reward_ctrl;
        summary.reward_contact += info.reward_contact;
        summary.reward_survive += info.reward_survive;
        if step.done {
            summary.truncated = step.info.truncated;
            break;
        }
    }
    summary.distance = env.inner().physics().body_com(torso).x - start_x;
    Ok(summary)
}

/// Sample `options.tasks` tasks and run `options.episodes` episodes on each.
///
/// # Errors
///
/// Returns configuration, I/O and simulation errors with context.
pub fn run(options: &Options) -> Result<Summary> {
    let config = load_config(options)?;
    let max_episode_steps = config.max_episode_steps;
    let seed = config.seed;
    tracing::info!(
        tasks = options.tasks,
        episodes = options.episodes,
        max_episode_steps,
        policy = ?options.policy,
        "starting rollouts"
    );

    let env = AntDirEnv::new(config).context("building environment")?;
    let mut env = TimeLimit::new(env, max_episode_steps);
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut episodes = Vec::with_capacity(options.tasks * options.episodes);
    for task in env.sample_tasks(options.tasks) {
        env.reset_task(task);
        for episode in 0..options.episodes {
            let mut summary = rollout(&mut env, options.policy, &mut rng)?;
            summary.episode = episode;
            tracing::info!(
                direction = task.direction.sign(),
                episode,
                steps = summary.steps,
                total_reward = summary.total_reward,
                distance = summary.distance,
                truncated = summary.truncated,
                "episode finished"
            );
            episodes.push(summary);
        }
    }

    Ok(Summary {
        policy: options.policy,
        max_episode_steps,
        episodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(policy: Policy) -> Options {
        Options {
            config: None,
            tasks: 2,
            episodes: 2,
            max_steps: Some(4),
            seed: Some(7),
            policy,
        }
    }

    #[test]
    fn runs_every_task_and_episode() {
        let summary = run(&options(Policy::Zero)).unwrap();
        assert_eq!(summary.episodes.len(), 4);
        assert_eq!(summary.max_episode_steps, 4);
        for ep in &summary.episodes {
            assert!(ep.task.is_some());
            assert!(ep.steps <= 4);
            let parts = ep.reward_forward + ep.reward_ctrl + ep.reward_contact + ep.reward_survive;
            assert!((ep.total_reward - parts).abs() < 1e-9);
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = run(&options(Policy::Random)).unwrap();
        let b = run(&options(Policy::Random)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_policy_pays_no_control_cost() {
        let summary = run(&options(Policy::Zero)).unwrap();
        assert!(summary.episodes.iter().all(|ep| ep.reward_ctrl == 0.0));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let mut opts = options(Policy::Zero);
        opts.config = Some(PathBuf::from("/nonexistent/antdir.json"));
        let err = run(&opts).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }

    #[test]
    fn json_summary_names_policy() {
        let summary = run(&options(Policy::Zero)).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["policy"], "zero");
        assert_eq!(json["episodes"].as_array().unwrap().len(), 4);
    }
}
