#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::many_single_char_names,
    clippy::similar_names
)]
//! # Articulated Physics Engine
//!
//! A compact reduced-coordinate rigid-body engine for legged locomotion
//! tasks. Systems are trees of bodies connected by free and hinge joints,
//! driven by torque motors and touching a flat ground plane.
//!
//! ## Key Components
//!
//! -   **Model:** [`Model`] describes the bodies, joints, geoms and
//!     actuators. It is assembled with [`ModelBuilder`], or built directly
//!     for the quadruped with [`ant_model`].
//! -   **State:** [`Data`] holds generalized coordinates and velocities along
//!     with derived quantities such as body frames and contact wrenches.
//! -   **Simulation:** [`PhysicsSim`] pairs the two and advances time:
//!     kinematics, composite-rigid-body mass matrix, Newton–Euler bias
//!     forces, penalty contacts and semi-implicit Euler integration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use physics::{AntConfig, PhysicsSim};
//!
//! let mut sim = PhysicsSim::ant(&AntConfig::default())?;
//! sim.step(&[0.0; 8], 5)?;
//! let torso = sim.model().body_id("torso")?;
//! println!("torso at {}", sim.body_com(torso));
//! ```

pub mod ant;
pub mod builder;
pub mod contact;
pub mod data;
pub mod dynamics;
pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod model;
pub mod simulation;
pub mod spatial;
pub mod types;

pub use ant::{ant_model, AntConfig, TORSO};
pub use builder::{HingeParams, ModelBuilder};
pub use data::{Contact, Data};
pub use error::PhysicsError;
pub use model::Model;
pub use simulation::PhysicsSim;
pub use types::{
    Actuator, Body, ContactParams, Geom, GeomShape, Joint, JointKind, SimOptions, WORLD,
};
