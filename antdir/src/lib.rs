//! # AntDir Runner
//!
//! Documentation entry point for the directional ant workspace.
//!
//! ## Overview
//!
//! A quadruped learns to run either forward or backward along the x axis.
//! The direction is drawn per task, which makes the environment a small
//! benchmark for meta-reinforcement learning: an agent must infer from reward
//! alone which way it is being paid to go.
//!
//! ### The Crates
//!
//! -   **`antdir`:** The crate you are currently viewing. Its binary loads a
//!     configuration, samples tasks and rolls out episodes with a fixed
//!     policy, reporting per-episode returns.
//! -   **[`physics`]:** A reduced-coordinate articulated rigid-body engine
//!     with penalty ground contact, plus the ant model itself.
//! -   **[`rl`]:** The gym-style [`rl::Env`] and [`rl::MetaEnv`] interfaces,
//!     the [`rl::AntDirEnv`] environment and the [`rl::TimeLimit`] wrapper.
//!
//! ## Getting Started
//!
//! ```text
//! RUST_LOG=debug cargo run -p antdir -- --tasks 4 --episodes 2 --policy random
//! ```
//!
//! Pass `--config path.json` to override any field of [`rl::AntDirConfig`];
//! missing keys keep their defaults.

pub use physics;
pub use rl;
