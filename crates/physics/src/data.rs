//! # Simulation State
//!
//! Mutable state paired with a [`Model`]: generalized coordinates and
//! velocities plus every quantity derived from them during a step.

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, UnitQuaternion, Vector3};

use crate::model::Model;
use crate::spatial::SpatialVector;

/// A single geom-ground contact.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub geom: usize,
    pub body: usize,
    /// World contact point on the ground plane.
    pub point: Vector3<f64>,
    /// Penetration depth, positive when overlapping.
    pub depth: f64,
    /// World force applied to the body.
    pub force: Vector3<f64>,
}

#[derive(Clone, Debug)]
pub struct Data {
    pub time: f64,
    pub qpos: DVector<f64>,
    pub qvel: DVector<f64>,
    pub qacc: DVector<f64>,
    pub ctrl: DVector<f64>,

    // Kinematics, indexed by body.
    pub xpos: Vec<Vector3<f64>>,
    pub xquat: Vec<UnitQuaternion<f64>>,
    pub xmat: Vec<Matrix3<f64>>,
    /// World center of mass of each body.
    pub xipos: Vec<Vector3<f64>>,
    pub subtree_mass: Vec<f64>,
    pub subtree_com: Vec<Vector3<f64>>,
    /// Spatial inertia about the world origin.
    pub cinert: Vec<Matrix6<f64>>,
    /// Motion subspace of each degree of freedom.
    pub cdof: Vec<SpatialVector>,
    pub cvel: Vec<SpatialVector>,
    /// Velocity-product acceleration, gravity included.
    pub cacc: Vec<SpatialVector>,

    // Generalized forces.
    pub qm: DMatrix<f64>,
    pub qfrc_bias: DVector<f64>,
    pub qfrc_passive: DVector<f64>,
    pub qfrc_actuator: DVector<f64>,
    pub qfrc_contact: DVector<f64>,

    /// External contact wrench on each body, `[torque; force]`, torque about
    /// the subtree center of mass of the body's root.
    pub cfrc_ext: Vec<SpatialVector>,
    pub contacts: Vec<Contact>,
}

impl Data {
    /// Zero state at the model's reference configuration.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        let nbody = model.nbody();
        let nv = model.nv;
        Self {
            time: 0.0,
            qpos: model.qpos0.clone(),
            qvel: DVector::zeros(nv),
            qacc: DVector::zeros(nv),
            ctrl: DVector::zeros(model.nu()),
            xpos: vec![Vector3::zeros(); nbody],
            xquat: vec![UnitQuaternion::identity(); nbody],
            xmat: vec![Matrix3::identity(); nbody],
            xipos: vec![Vector3::zeros(); nbody],
            subtree_mass: vec![0.0; nbody],
            subtree_com: vec![Vector3::zeros(); nbody],
            cinert: vec![Matrix6::zeros(); nbody],
            cdof: vec![SpatialVector::zeros(); nv],
            cvel: vec![SpatialVector::zeros(); nbody],
            cacc: vec![SpatialVector::zeros(); nbody],
            qm: DMatrix::zeros(nv, nv),
            qfrc_bias: DVector::zeros(nv),
            qfrc_passive: DVector::zeros(nv),
            qfrc_actuator: DVector::zeros(nv),
            qfrc_contact: DVector::zeros(nv),
            cfrc_ext: vec![SpatialVector::zeros(); nbody],
            contacts: Vec::new(),
        }
    }

    /// `true` when every coordinate and velocity is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.qpos.iter().chain(self.qvel.iter()).all(|v| v.is_finite())
    }
}
