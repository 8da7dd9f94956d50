//! # Integration
//!
//! Semi-implicit Euler: velocities are advanced with the current
//! accelerations, then positions with the new velocities. Free-joint
//! orientations are advanced on SO(3) through the exponential map.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::data::Data;
use crate::model::Model;
use crate::types::JointKind;

/// Advance `qvel`, `qpos` and `time` by `h` seconds.
pub fn integrate(model: &Model, data: &mut Data, h: f64) {
    data.qvel += &data.qacc * h;

    for joint in &model.joints {
        let q = joint.qpos_adr;
        let v = joint.dof_adr;
        match joint.kind {
            JointKind::Free => {
                for k in 0..3 {
                    data.qpos[q + k] += data.qvel[v + k] * h;
                }
                let omega = Vector3::new(data.qvel[v + 3], data.qvel[v + 4], data.qvel[v + 5]);
                let current = UnitQuaternion::from_quaternion(Quaternion::new(
                    data.qpos[q + 3],
                    data.qpos[q + 4],
                    data.qpos[q + 5],
                    data.qpos[q + 6],
                ));
                // Body-local angular velocity composes on the right.
                let next = current * UnitQuaternion::from_scaled_axis(omega * h);
                let coords = next.quaternion();
                data.qpos[q + 3] = coords.w;
                data.qpos[q + 4] = coords.i;
                data.qpos[q + 5] = coords.j;
                data.qpos[q + 6] = coords.k;
            }
            JointKind::Hinge { .. } => {
                data.qpos[q] += data.qvel[v] * h;
            }
        }
    }

    data.time += h;
}
