//! # Ground Contact
//!
//! Geoms collide with the ground plane `z = 0` only. Spheres produce one
//! contact, capsules one per end cap. Each contact applies a penalty normal
//! force and a smoothed Coulomb friction force, which are mapped to joint
//! space and accumulated per body as external wrenches.

use nalgebra::Vector3;

use crate::data::{Contact, Data};
use crate::model::Model;
use crate::spatial::{force_at, point_velocity, SpatialVector};
use crate::types::{GeomShape, WORLD};

/// Detect ground contacts and compute `qfrc_contact` and `cfrc_ext`.
///
/// Requires body poses and velocities for the current state.
pub fn ground_contacts(model: &Model, data: &mut Data) {
    let params = &model.opt.contact;
    data.contacts.clear();
    data.qfrc_contact.fill(0.0);
    for wrench in &mut data.cfrc_ext {
        *wrench = SpatialVector::zeros();
    }

    for (geom_id, geom) in model.geoms.iter().enumerate() {
        let body = geom.body;
        if body == WORLD {
            continue;
        }
        let pos = data.xpos[body];
        let rot = data.xmat[body];
        let (spheres, radius) = match geom.shape {
            GeomShape::Sphere { center, radius } => ([Some(pos + rot * center), None], radius),
            GeomShape::Capsule { from, to, radius } => {
                ([Some(pos + rot * from), Some(pos + rot * to)], radius)
            }
        };
        let friction = geom.friction.max(model.opt.floor_friction);
        let reference = data.subtree_com[model.root_of(body)];

        for center in spheres.into_iter().flatten() {
            let depth = radius - center.z;
            if depth.is_nan() || depth <= 0.0 {
                continue;
            }
            let point = Vector3::new(center.x, center.y, 0.0);
            let vel = point_velocity(&data.cvel[body], &point);
            let normal = (params.stiffness * depth - params.damping * vel.z).max(0.0);
            let slip = Vector3::new(vel.x, vel.y, 0.0);
            let smoothing = (slip.norm_squared() + params.slip_velocity.powi(2)).sqrt();
            let force = Vector3::z() * normal - slip * (friction * normal / smoothing);

            let wrench = force_at(&point, &force);
            for dof in 0..model.nv {
                if model.is_ancestor(model.dof_body[dof], body) {
                    data.qfrc_contact[dof] += data.cdof[dof].dot(&wrench);
                }
            }
            data.cfrc_ext[body] += force_at(&(point - reference), &force);
            data.contacts.push(Contact {
                geom: geom_id,
                body,
                point,
                depth,
                force,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelBuilder;
    use crate::kinematics::{positions, velocities};
    use crate::types::SimOptions;
    use approx::assert_relative_eq;

    fn ball(height: f64) -> (Model, Data) {
        let mut b = ModelBuilder::new(SimOptions::default());
        let body = b.add_body("ball", WORLD, Vector3::new(0.0, 0.0, height));
        b.add_geom(
            body,
            "ball_geom",
            GeomShape::Sphere {
                center: Vector3::zeros(),
                radius: 0.1,
            },
            1000.0,
            1.0,
        );
        b.add_free_joint(body, "root").unwrap();
        let model = b.build().unwrap();
        let data = Data::new(&model);
        (model, data)
    }

    #[test]
    fn separated_sphere_has_no_contact() {
        let (model, mut data) = ball(0.5);
        positions(&model, &mut data);
        velocities(&model, &mut data);
        ground_contacts(&model, &mut data);
        assert!(data.contacts.is_empty());
        assert_relative_eq!(data.qfrc_contact.norm(), 0.0);
    }

    #[test]
    fn penetrating_sphere_is_pushed_up() {
        let (model, mut data) = ball(0.09);
        positions(&model, &mut data);
        velocities(&model, &mut data);
        ground_contacts(&model, &mut data);
        assert_eq!(data.contacts.len(), 1);
        let expected = model.opt.contact.stiffness * 0.01;
        assert_relative_eq!(data.qfrc_contact[2], expected, epsilon = 1e-9);
        assert_relative_eq!(data.cfrc_ext[1][5], expected, epsilon = 1e-9);
    }

    #[test]
    fn friction_opposes_sliding_and_is_bounded() {
        let (model, mut data) = ball(0.09);
        data.qvel[0] = 2.0;
        positions(&model, &mut data);
        velocities(&model, &mut data);
        ground_contacts(&model, &mut data);
        let force = data.contacts[0].force;
        assert!(force.x < 0.0);
        assert!(force.x.abs() <= force.z + 1e-12);
    }
}
