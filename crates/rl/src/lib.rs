#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Meta-RL Environments
//!
//! Gym-style environments on top of the `physics` crate.
//!
//! ## Key Components
//!
//! -   **Interfaces:** [`Env`] is the reset/step loop, [`MetaEnv`] adds a task
//!     distribution that can be sampled and switched between episodes.
//! -   **Ant direction:** [`AntDirEnv`] asks the quadruped to run forward or
//!     backward along x; the direction is the task.
//! -   **Wrappers:** [`TimeLimit`] truncates episodes after a fixed number of
//!     steps.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rl::{AntDirConfig, AntDirEnv, Env, MetaEnv};
//!
//! let mut env = AntDirEnv::new(AntDirConfig::default())?;
//! let task = env.sample_tasks(1)[0];
//! env.reset_task(task);
//! let obs = env.reset()?;
//! let step = env.step(&vec![0.0; env.action_size()])?;
//! ```

pub mod ant_dir;
pub mod config;
pub mod env;
pub mod error;
pub mod noise;
pub mod space;
pub mod time_limit;

pub use ant_dir::{is_healthy, AntDirEnv, AntDirInfo, AntDirTask, Direction};
pub use config::AntDirConfig;
pub use env::{Env, MetaEnv, Step};
pub use error::EnvError;
pub use space::BoxSpace;
pub use time_limit::{TimeLimit, TimeLimitInfo};
