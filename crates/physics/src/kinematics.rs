//! # Kinematics
//!
//! Position and velocity passes over the body tree. Positions produce body
//! frames, inertias and joint motion subspaces; velocities produce body
//! spatial velocities and the velocity-product accelerations used by the
//! bias-force pass.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::data::Data;
use crate::model::Model;
use crate::spatial::{cross_motion, spatial, spatial_inertia, SpatialVector};
use crate::types::{JointKind, WORLD};

/// Body poses, centers of mass, spatial inertias and motion subspaces.
pub fn positions(model: &Model, data: &mut Data) {
    data.xpos[WORLD] = Vector3::zeros();
    data.xquat[WORLD] = UnitQuaternion::identity();
    data.xmat[WORLD] = nalgebra::Matrix3::identity();

    for (id, body) in model.bodies.iter().enumerate().skip(1) {
        let parent = body.parent;
        let mut pos = data.xpos[parent] + data.xquat[parent] * body.pos;
        let mut quat = data.xquat[parent] * body.quat;

        if let Some(jnt) = body.joint {
            let joint = &model.joints[jnt];
            let adr = joint.qpos_adr;
            let q = &data.qpos;
            match joint.kind {
                JointKind::Free => {
                    pos = Vector3::new(q[adr], q[adr + 1], q[adr + 2]);
                    quat = UnitQuaternion::from_quaternion(Quaternion::new(
                        q[adr + 3],
                        q[adr + 4],
                        q[adr + 5],
                        q[adr + 6],
                    ));
                }
                JointKind::Hinge { axis } => {
                    quat *= UnitQuaternion::from_scaled_axis(axis * q[adr]);
                }
            }
        }

        let rot = quat.to_rotation_matrix().into_inner();
        data.xpos[id] = pos;
        data.xquat[id] = quat;
        data.xmat[id] = rot;
        data.xipos[id] = pos + rot * body.ipos;
        let inertia_world = rot * body.inertia * rot.transpose();
        data.cinert[id] = spatial_inertia(body.mass, &data.xipos[id], &inertia_world);

        if let Some(jnt) = body.joint {
            let joint = &model.joints[jnt];
            let dof = joint.dof_adr;
            match joint.kind {
                JointKind::Free => {
                    for k in 0..3 {
                        let mut e = Vector3::zeros();
                        e[k] = 1.0;
                        data.cdof[dof + k] = spatial(Vector3::zeros(), e);
                        let a: Vector3<f64> = rot.column(k).into_owned();
                        data.cdof[dof + 3 + k] = spatial(a, pos.cross(&a));
                    }
                }
                JointKind::Hinge { axis } => {
                    let a = rot * axis;
                    data.cdof[dof] = spatial(a, pos.cross(&a));
                }
            }
        }
    }

    for id in 0..model.nbody() {
        data.subtree_mass[id] = model.bodies[id].mass;
        data.subtree_com[id] = data.xipos[id] * model.bodies[id].mass;
    }
    for id in (1..model.nbody()).rev() {
        let parent = model.bodies[id].parent;
        data.subtree_mass[parent] += data.subtree_mass[id];
        let moment = data.subtree_com[id];
        data.subtree_com[parent] += moment;
    }
    for id in 0..model.nbody() {
        let mass = data.subtree_mass[id];
        data.subtree_com[id] = if mass > 0.0 {
            data.subtree_com[id] / mass
        } else {
            data.xipos[id]
        };
    }
}

/// Body spatial velocities and velocity-product accelerations. The world
/// body is given an upward acceleration equal to `-gravity`, so gravity
/// enters the bias forces without a separate pass.
///
/// Requires [`positions`] to have run for the current `qpos`.
pub fn velocities(model: &Model, data: &mut Data) {
    data.cvel[WORLD] = SpatialVector::zeros();
    data.cacc[WORLD] = spatial(Vector3::zeros(), -model.opt.gravity);

    for (id, body) in model.bodies.iter().enumerate().skip(1) {
        let mut vel = data.cvel[body.parent];
        let mut acc = data.cacc[body.parent];

        if let Some(jnt) = body.joint {
            let joint = &model.joints[jnt];
            let dof = joint.dof_adr;
            // Translational DOFs of a free joint have constant subspaces and
            // contribute no velocity-product term.
            let first_rot = match joint.kind {
                JointKind::Free => {
                    for k in 0..3 {
                        vel += data.cdof[dof + k] * data.qvel[dof + k];
                    }
                    dof + 3
                }
                JointKind::Hinge { .. } => dof,
            };
            let mut rot_vel = SpatialVector::zeros();
            for d in first_rot..dof + joint.kind.nv() {
                rot_vel += data.cdof[d] * data.qvel[d];
            }
            vel += rot_vel;
            acc += cross_motion(&vel, &rot_vel);
        }

        data.cvel[id] = vel;
        data.cacc[id] = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ant::{ant_model, AntConfig};
    use crate::spatial::{angular, point_velocity};
    use approx::assert_relative_eq;

    #[test]
    fn legs_extend_diagonally_from_torso() {
        let model = ant_model(&AntConfig::default()).unwrap();
        let mut data = Data::new(&model);
        positions(&model, &mut data);
        let foot = model.body_id("front_left_foot").unwrap();
        assert_relative_eq!(
            data.xpos[foot],
            Vector3::new(0.4, 0.4, 0.75),
            epsilon = 1e-12
        );
        // Symmetric legs keep the overall center of mass under the torso.
        let torso = model.body_id("torso").unwrap();
        assert_relative_eq!(data.subtree_com[torso].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(data.subtree_com[torso].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn hinge_rate_moves_child_point_tangentially() {
        let model = ant_model(&AntConfig::default()).unwrap();
        let mut data = Data::new(&model);
        let hip = model.joints.iter().find(|j| j.name == "hip_1").unwrap();
        data.qvel[hip.dof_adr] = 1.0;
        positions(&model, &mut data);
        velocities(&model, &mut data);

        let foot = model.body_id("front_left_foot").unwrap();
        let aux = model.body_id("aux_1").unwrap();
        assert_relative_eq!(angular(&data.cvel[foot]), Vector3::z(), epsilon = 1e-12);
        // The hip pivot itself does not move.
        assert_relative_eq!(
            point_velocity(&data.cvel[aux], &data.xpos[aux]),
            Vector3::zeros(),
            epsilon = 1e-12
        );
        // The foot body origin sits 0.2·√2 away and moves at that speed.
        let v = point_velocity(&data.cvel[foot], &data.xpos[foot]);
        assert_relative_eq!(v.norm(), 0.2 * std::f64::consts::SQRT_2, epsilon = 1e-12);
    }
}
