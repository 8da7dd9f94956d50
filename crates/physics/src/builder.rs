//! # Model Builder
//!
//! Incremental construction of a [`Model`]. Bodies, geoms, joints and motors
//! are added by name; body mass and inertia are derived from the attached
//! geoms and their densities when [`ModelBuilder::build`] runs.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::error::PhysicsError;
use crate::model::Model;
use crate::types::{Actuator, Body, Geom, GeomShape, Joint, JointKind, SimOptions, WORLD};

/// Hinge parameters beyond the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingeParams {
    pub range: Option<(f64, f64)>,
    pub damping: f64,
    pub armature: f64,
}

impl Default for HingeParams {
    fn default() -> Self {
        Self {
            range: None,
            damping: 0.0,
            armature: 0.0,
        }
    }
}

pub struct ModelBuilder {
    opt: SimOptions,
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    geoms: Vec<Geom>,
    densities: Vec<f64>,
    actuators: Vec<Actuator>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(opt: SimOptions) -> Self {
        Self {
            opt,
            bodies: vec![Body::world()],
            joints: Vec::new(),
            geoms: Vec::new(),
            densities: Vec::new(),
            actuators: Vec::new(),
        }
    }

    /// Add a body at `pos` in its parent's frame. Returns the body index.
    pub fn add_body(&mut self, name: &str, parent: usize, pos: Vector3<f64>) -> usize {
        self.bodies.push(Body {
            name: name.to_string(),
            parent,
            pos,
            quat: UnitQuaternion::identity(),
            mass: 0.0,
            ipos: Vector3::zeros(),
            inertia: Matrix3::zeros(),
            joint: None,
            geoms: Vec::new(),
        });
        self.bodies.len() - 1
    }

    /// Attach a collision geom of uniform `density` to `body`.
    pub fn add_geom(
        &mut self,
        body: usize,
        name: &str,
        shape: GeomShape,
        density: f64,
        friction: f64,
    ) -> usize {
        let id = self.geoms.len();
        self.geoms.push(Geom {
            name: name.to_string(),
            body,
            shape,
            friction,
        });
        self.densities.push(density);
        if let Some(b) = self.bodies.get_mut(body) {
            b.geoms.push(id);
        }
        id
    }

    /// Give `body` six unconstrained degrees of freedom.
    ///
    /// # Errors
    ///
    /// Fails if the body already has a joint or does not exist.
    pub fn add_free_joint(&mut self, body: usize, name: &str) -> Result<usize, PhysicsError> {
        self.add_joint(body, name, JointKind::Free, HingeParams::default())
    }

    /// Add a hinge about `axis` (body coordinates, normalized here).
    ///
    /// # Errors
    ///
    /// Fails if the body already has a joint, does not exist, or the axis is
    /// degenerate.
    pub fn add_hinge(
        &mut self,
        body: usize,
        name: &str,
        axis: Vector3<f64>,
        params: HingeParams,
    ) -> Result<usize, PhysicsError> {
        let axis = axis
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| PhysicsError::InvalidModel(format!("hinge '{name}' has a zero axis")))?;
        self.add_joint(body, name, JointKind::Hinge { axis }, params)
    }

    fn add_joint(
        &mut self,
        body: usize,
        name: &str,
        kind: JointKind,
        params: HingeParams,
    ) -> Result<usize, PhysicsError> {
        let id = self.joints.len();
        let target = self
            .bodies
            .get_mut(body)
            .filter(|_| body != WORLD)
            .ok_or_else(|| PhysicsError::InvalidModel(format!("joint '{name}' has no body")))?;
        if target.joint.is_some() {
            return Err(PhysicsError::InvalidModel(format!(
                "body '{}' already has a joint",
                target.name
            )));
        }
        target.joint = Some(id);
        self.joints.push(Joint {
            name: name.to_string(),
            body,
            kind,
            qpos_adr: 0,
            dof_adr: 0,
            range: params.range,
            damping: params.damping,
            armature: params.armature,
        });
        Ok(id)
    }

    /// Add a torque motor on `joint`.
    pub fn add_motor(
        &mut self,
        name: &str,
        joint: usize,
        gear: f64,
        ctrl_range: Option<(f64, f64)>,
    ) -> usize {
        self.actuators.push(Actuator {
            name: name.to_string(),
            joint,
            gear,
            ctrl_range,
        });
        self.actuators.len() - 1
    }

    /// Index of a joint by name.
    #[must_use]
    pub fn joint_id(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Derive body inertias from geoms and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidModel`] for massless bodies or broken
    /// cross-references.
    pub fn build(mut self) -> Result<Model, PhysicsError> {
        for body in self.bodies.iter_mut().skip(1) {
            let (mass, com, inertia) = composite_inertia(
                body.geoms
                    .iter()
                    .map(|&g| (&self.geoms[g].shape, self.densities[g])),
            );
            body.mass = mass;
            body.ipos = com;
            body.inertia = inertia;
        }
        Model::assemble(self.bodies, self.joints, self.geoms, self.actuators, self.opt)
    }
}

/// Mass, center of mass and inertia about that center for a set of uniform
/// solids.
fn composite_inertia<'a>(
    parts: impl Iterator<Item = (&'a GeomShape, f64)> + Clone,
) -> (f64, Vector3<f64>, Matrix3<f64>) {
    let mut mass = 0.0;
    let mut moment = Vector3::zeros();
    for (shape, density) in parts.clone() {
        let m = shape.volume() * density;
        mass += m;
        moment += shape.center() * m;
    }
    if mass <= 0.0 {
        return (0.0, Vector3::zeros(), Matrix3::zeros());
    }
    let com = moment / mass;
    let mut inertia = Matrix3::zeros();
    for (shape, density) in parts {
        let m = shape.volume() * density;
        let d = shape.center() - com;
        inertia +=
            shape.inertia(m) + (Matrix3::identity() * d.norm_squared() - d * d.transpose()) * m;
    }
    (mass, com, inertia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_body_mass_from_density() {
        let mut b = ModelBuilder::new(SimOptions::default());
        let body = b.add_body("ball", WORLD, Vector3::new(0.0, 0.0, 1.0));
        b.add_geom(
            body,
            "ball_geom",
            GeomShape::Sphere {
                center: Vector3::zeros(),
                radius: 0.5,
            },
            2.0,
            1.0,
        );
        b.add_free_joint(body, "root").unwrap();
        let model = b.build().unwrap();
        let expected = 2.0 * (4.0 / 3.0) * std::f64::consts::PI * 0.125;
        assert_relative_eq!(model.bodies[body].mass, expected, epsilon = 1e-12);
        assert_eq!(model.nq, 7);
        assert_eq!(model.nv, 6);
        assert_relative_eq!(model.qpos0[2], 1.0);
        assert_relative_eq!(model.qpos0[3], 1.0);
    }

    #[test]
    fn offset_geoms_shift_center_of_mass() {
        let mut b = ModelBuilder::new(SimOptions::default());
        let body = b.add_body("rod", WORLD, Vector3::zeros());
        b.add_geom(
            body,
            "rod_geom",
            GeomShape::Capsule {
                from: Vector3::zeros(),
                to: Vector3::new(1.0, 0.0, 0.0),
                radius: 0.1,
            },
            1.0,
            1.0,
        );
        let model = b.build().unwrap();
        assert_relative_eq!(model.bodies[body].ipos, Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(model.nv, 0);
    }

    #[test]
    fn rejects_second_joint_and_massless_body() {
        let mut b = ModelBuilder::new(SimOptions::default());
        let body = b.add_body("empty", WORLD, Vector3::zeros());
        b.add_free_joint(body, "root").unwrap();
        assert!(b.add_free_joint(body, "again").is_err());
        assert!(matches!(b.build(), Err(PhysicsError::InvalidModel(_))));
    }

    #[test]
    fn motor_must_target_hinge() {
        let mut b = ModelBuilder::new(SimOptions::default());
        let body = b.add_body("ball", WORLD, Vector3::zeros());
        b.add_geom(
            body,
            "g",
            GeomShape::Sphere {
                center: Vector3::zeros(),
                radius: 0.1,
            },
            1.0,
            1.0,
        );
        let root = b.add_free_joint(body, "root").unwrap();
        b.add_motor("m", root, 1.0, None);
        assert!(b.build().is_err());
    }
}
