//! # Dynamics
//!
//! Joint-space equation of motion `M(q) qacc + c(q, qvel) = τ`:
//! composite-rigid-body mass matrix, recursive Newton–Euler bias forces,
//! passive and actuator forces, and the Cholesky solve for `qacc`.

use nalgebra::DVector;

use crate::data::Data;
use crate::error::PhysicsError;
use crate::model::Model;
use crate::spatial::{cross_force, SpatialVector};
use crate::types::JointKind;

/// Joint-space mass matrix with armature on the diagonal.
pub fn mass_matrix(model: &Model, data: &mut Data) {
    let mut composite = data.cinert.clone();
    for id in (1..model.nbody()).rev() {
        let parent = model.bodies[id].parent;
        let child = composite[id];
        composite[parent] += child;
    }

    data.qm.fill(0.0);
    for i in 0..model.nv {
        let body_i = model.dof_body[i];
        let force = composite[body_i] * data.cdof[i];
        for j in 0..=i {
            if model.is_ancestor(model.dof_body[j], body_i) {
                let m = data.cdof[j].dot(&force);
                data.qm[(i, j)] = m;
                data.qm[(j, i)] = m;
            }
        }
    }

    for joint in &model.joints {
        for d in joint.dof_adr..joint.dof_adr + joint.kind.nv() {
            data.qm[(d, d)] += joint.armature;
        }
    }
}

/// Gravity, Coriolis and centrifugal forces.
pub fn bias_forces(model: &Model, data: &mut Data) {
    let mut body_force: Vec<SpatialVector> = (0..model.nbody())
        .map(|id| {
            let inertia = &data.cinert[id];
            let vel = &data.cvel[id];
            inertia * data.cacc[id] + cross_force(vel, &(inertia * vel))
        })
        .collect();
    for id in (1..model.nbody()).rev() {
        let parent = model.bodies[id].parent;
        let child = body_force[id];
        body_force[parent] += child;
    }
    for i in 0..model.nv {
        data.qfrc_bias[i] = data.cdof[i].dot(&body_force[model.dof_body[i]]);
    }
}

/// Joint damping and penalty forces for violated joint limits.
pub fn passive_forces(model: &Model, data: &mut Data) {
    let limits = &model.opt.contact;
    data.qfrc_passive.fill(0.0);
    for joint in &model.joints {
        let dof = joint.dof_adr;
        for d in dof..dof + joint.kind.nv() {
            data.qfrc_passive[d] -= joint.damping * data.qvel[d];
        }
        if let (JointKind::Hinge { .. }, Some((lo, hi))) = (joint.kind, joint.range) {
            let q = data.qpos[joint.qpos_adr];
            let qd = data.qvel[dof];
            let violation = if q < lo {
                lo - q
            } else if q > hi {
                hi - q
            } else {
                continue;
            };
            data.qfrc_passive[dof] +=
                limits.limit_stiffness * violation - limits.limit_damping * qd;
        }
    }
}

/// Motor torques `gear * ctrl` on the driven hinges.
pub fn actuator_forces(model: &Model, data: &mut Data) {
    data.qfrc_actuator.fill(0.0);
    for (act, ctrl) in model.actuators.iter().zip(data.ctrl.iter()) {
        let dof = model.joints[act.joint].dof_adr;
        data.qfrc_actuator[dof] += act.gear * ctrl;
    }
}

/// Solve for joint accelerations from the assembled forces.
///
/// A state that has already gone non-finite yields non-finite
/// accelerations instead of an error, so callers can observe the blow-up in
/// the state itself.
///
/// # Errors
///
/// Returns [`PhysicsError::SingularMassMatrix`] when a finite mass matrix is
/// not positive definite.
pub fn solve_acceleration(model: &Model, data: &mut Data) -> Result<(), PhysicsError> {
    let rhs: DVector<f64> =
        &data.qfrc_actuator + &data.qfrc_passive + &data.qfrc_contact - &data.qfrc_bias;
    match data.qm.clone().cholesky() {
        Some(chol) => data.qacc = chol.solve(&rhs),
        None if !data.is_finite() || data.qm.iter().any(|v| !v.is_finite()) => {
            data.qacc = DVector::from_element(model.nv, f64::NAN);
        }
        None => return Err(PhysicsError::SingularMassMatrix),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ant::{ant_model, AntConfig};
    use crate::kinematics::{positions, velocities};
    use approx::assert_relative_eq;

    #[test]
    fn free_joint_block_carries_total_mass() {
        let model = ant_model(&AntConfig::default()).unwrap();
        let mut data = Data::new(&model);
        positions(&model, &mut data);
        mass_matrix(&model, &mut data);
        let total: f64 = model.bodies.iter().map(|b| b.mass).sum();
        for k in 0..3 {
            assert_relative_eq!(data.qm[(k, k)], total, epsilon = 1e-9);
        }
        assert_relative_eq!(data.qm.clone(), data.qm.transpose(), epsilon = 1e-9);
    }

    #[test]
    fn static_bias_is_weight_on_free_joint() {
        let model = ant_model(&AntConfig::default()).unwrap();
        let mut data = Data::new(&model);
        positions(&model, &mut data);
        velocities(&model, &mut data);
        bias_forces(&model, &mut data);
        let total: f64 = model.bodies.iter().map(|b| b.mass).sum();
        assert_relative_eq!(data.qfrc_bias[2], total * 9.81, epsilon = 1e-9);
        assert_relative_eq!(data.qfrc_bias[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn limit_pushes_hinge_back_into_range() {
        let model = ant_model(&AntConfig::default()).unwrap();
        let mut data = Data::new(&model);
        // Ankles start at zero, below the 30 degree lower bound of ankle_1.
        let ankle = model.joints.iter().find(|j| j.name == "ankle_1").unwrap();
        passive_forces(&model, &mut data);
        assert!(data.qfrc_passive[ankle.dof_adr] > 0.0);
        let hip = model.joints.iter().find(|j| j.name == "hip_1").unwrap();
        assert_relative_eq!(data.qfrc_passive[hip.dof_adr], 0.0);
    }
}
