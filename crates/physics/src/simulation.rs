//! # Physics Simulation Core
//!
//! [`PhysicsSim`] owns a [`Model`] and its [`Data`] and exposes the
//! operations an environment needs: set the state, apply controls and step a
//! number of frames, and read back coordinates, body frames and contact
//! wrenches.

use nalgebra::Vector3;

use crate::ant::{ant_model, AntConfig};
use crate::contact::ground_contacts;
use crate::data::Data;
use crate::dynamics::{
    actuator_forces, bias_forces, mass_matrix, passive_forces, solve_acceleration,
};
use crate::error::PhysicsError;
use crate::integrator::integrate;
use crate::kinematics::{positions, velocities};
use crate::model::Model;

/// Main physics simulation container
pub struct PhysicsSim {
    model: Model,
    data: Data,
}

impl PhysicsSim {
    /// Create a simulation at the model's reference configuration.
    #[must_use]
    pub fn new(model: Model) -> Self {
        let data = Data::new(&model);
        let mut sim = Self { model, data };
        sim.forward();
        sim
    }

    /// Build the ant model and wrap it in a simulation.
    ///
    /// # Errors
    ///
    /// Propagates model construction errors.
    pub fn ant(config: &AntConfig) -> Result<Self, PhysicsError> {
        let model = ant_model(config)?;
        tracing::debug!(
            nq = model.nq,
            nv = model.nv,
            nu = model.nu(),
            nbody = model.nbody(),
            "built ant model"
        );
        Ok(Self::new(model))
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Return to the reference configuration at rest.
    pub fn reset(&mut self) {
        self.data = Data::new(&self.model);
        self.forward();
    }

    /// Overwrite generalized coordinates and velocities.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StateShape`] if either slice has the wrong
    /// length; the state is left untouched in that case.
    pub fn set_state(&mut self, qpos: &[f64], qvel: &[f64]) -> Result<(), PhysicsError> {
        if qpos.len() != self.model.nq {
            return Err(PhysicsError::StateShape {
                expected: self.model.nq,
                actual: qpos.len(),
            });
        }
        if qvel.len() != self.model.nv {
            return Err(PhysicsError::StateShape {
                expected: self.model.nv,
                actual: qvel.len(),
            });
        }
        self.data.qpos.copy_from_slice(qpos);
        self.data.qvel.copy_from_slice(qvel);
        self.forward();
        Ok(())
    }

    /// Apply `ctrl` (clamped to each actuator's range) and advance `frames`
    /// timesteps.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ControlShape`] for a control vector of the
    /// wrong length and [`PhysicsError::SingularMassMatrix`] if the dynamics
    /// cannot be solved from a finite state.
    pub fn step(&mut self, ctrl: &[f64], frames: usize) -> Result<(), PhysicsError> {
        if ctrl.len() != self.model.nu() {
            return Err(PhysicsError::ControlShape {
                expected: self.model.nu(),
                actual: ctrl.len(),
            });
        }
        for ((slot, act), raw) in self
            .data
            .ctrl
            .iter_mut()
            .zip(&self.model.actuators)
            .zip(ctrl)
        {
            *slot = act.clamp(*raw);
        }

        let substeps = self.model.opt.substeps;
        let h = self.model.opt.timestep / substeps as f64;
        for _ in 0..frames * substeps {
            self.substep(h)?;
        }
        self.forward();
        Ok(())
    }

    fn substep(&mut self, h: f64) -> Result<(), PhysicsError> {
        let (model, data) = (&self.model, &mut self.data);
        positions(model, data);
        velocities(model, data);
        ground_contacts(model, data);
        mass_matrix(model, data);
        bias_forces(model, data);
        passive_forces(model, data);
        actuator_forces(model, data);
        solve_acceleration(model, data)?;
        integrate(model, data, h);
        Ok(())
    }

    /// Recompute every position- and velocity-dependent quantity.
    pub fn forward(&mut self) {
        positions(&self.model, &mut self.data);
        velocities(&self.model, &mut self.data);
        ground_contacts(&self.model, &mut self.data);
    }

    #[must_use]
    pub fn qpos(&self) -> &[f64] {
        self.data.qpos.as_slice()
    }

    #[must_use]
    pub fn qvel(&self) -> &[f64] {
        self.data.qvel.as_slice()
    }

    /// `qpos` followed by `qvel`.
    #[must_use]
    pub fn state_vector(&self) -> Vec<f64> {
        self.qpos().iter().chain(self.qvel()).copied().collect()
    }

    /// External contact wrenches of all bodies, six values per body.
    #[must_use]
    pub fn cfrc_ext(&self) -> Vec<f64> {
        self.data
            .cfrc_ext
            .iter()
            .flat_map(|w| w.iter().copied())
            .collect()
    }

    /// World rotation matrix of a body, row-major.
    #[must_use]
    pub fn body_xmat(&self, body: usize) -> [f64; 9] {
        let m = &self.data.xmat[body];
        [
            m[(0, 0)], m[(0, 1)], m[(0, 2)],
            m[(1, 0)], m[(1, 1)], m[(1, 2)],
            m[(2, 0)], m[(2, 1)], m[(2, 2)],
        ]
    }

    /// World center of mass of a body.
    #[must_use]
    pub fn body_com(&self, body: usize) -> Vector3<f64> {
        self.data.xipos[body]
    }

    /// Simulated time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.data.time
    }

    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.model.opt.timestep
    }
}
