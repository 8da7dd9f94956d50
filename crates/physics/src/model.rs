//! # Model
//!
//! Immutable description of an articulated system. Bodies are stored in
//! topological order (every parent precedes its children) and joint
//! coordinates are laid out in body order, so forward passes can run in index
//! order and backward passes in reverse.

use nalgebra::DVector;

use crate::error::PhysicsError;
use crate::types::{Actuator, Body, Geom, Joint, JointKind, SimOptions, WORLD};

#[derive(Clone, Debug)]
pub struct Model {
    pub bodies: Vec<Body>,
    pub joints: Vec<Joint>,
    pub geoms: Vec<Geom>,
    pub actuators: Vec<Actuator>,
    pub opt: SimOptions,
    /// Reference configuration.
    pub qpos0: DVector<f64>,
    /// Body owning each degree of freedom.
    pub dof_body: Vec<usize>,
    /// Number of position coordinates.
    pub nq: usize,
    /// Number of degrees of freedom.
    pub nv: usize,
}

impl Model {
    #[must_use]
    pub fn nbody(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn nu(&self) -> usize {
        self.actuators.len()
    }

    /// Look up a body index by name.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if no body has that name.
    pub fn body_id(&self, name: &str) -> Result<usize, PhysicsError> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| PhysicsError::UnknownBody(name.to_string()))
    }

    /// `true` if `ancestor` is `body` or lies on its path to the world.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, mut body: usize) -> bool {
        loop {
            if body == ancestor {
                return true;
            }
            if body == WORLD {
                return false;
            }
            body = self.bodies[body].parent;
        }
    }

    /// The child of the world whose subtree contains `body`.
    #[must_use]
    pub fn root_of(&self, mut body: usize) -> usize {
        while body != WORLD && self.bodies[body].parent != WORLD {
            body = self.bodies[body].parent;
        }
        body
    }

    /// Assemble a model from bodies already in topological order, assigning
    /// joint addresses and the reference configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidModel`] when the tree or the element
    /// cross-references are inconsistent.
    pub fn assemble(
        bodies: Vec<Body>,
        mut joints: Vec<Joint>,
        geoms: Vec<Geom>,
        actuators: Vec<Actuator>,
        opt: SimOptions,
    ) -> Result<Self, PhysicsError> {
        if bodies.first().map(|b| b.parent) != Some(WORLD) {
            return Err(PhysicsError::InvalidModel("missing world body".into()));
        }
        for (id, body) in bodies.iter().enumerate().skip(1) {
            if body.parent >= id {
                return Err(PhysicsError::InvalidModel(format!(
                    "body '{}' precedes its parent",
                    body.name
                )));
            }
            if body.mass <= 0.0 {
                return Err(PhysicsError::InvalidModel(format!(
                    "body '{}' has no mass",
                    body.name
                )));
            }
        }
        if opt.timestep <= 0.0 || opt.substeps == 0 {
            return Err(PhysicsError::InvalidModel(
                "timestep and substeps must be positive".into(),
            ));
        }

        let mut qpos0 = Vec::new();
        let mut dof_body = Vec::new();
        for (id, body) in bodies.iter().enumerate() {
            let Some(jnt) = body.joint else { continue };
            let joint = joints
                .get_mut(jnt)
                .ok_or_else(|| PhysicsError::InvalidModel(format!("no joint {jnt}")))?;
            if joint.body != id {
                return Err(PhysicsError::InvalidModel(format!(
                    "joint '{}' is not attached to body '{}'",
                    joint.name, body.name
                )));
            }
            joint.qpos_adr = qpos0.len();
            joint.dof_adr = dof_body.len();
            match joint.kind {
                JointKind::Free => {
                    if body.parent != WORLD {
                        return Err(PhysicsError::InvalidModel(format!(
                            "free joint '{}' must attach to a child of the world",
                            joint.name
                        )));
                    }
                    let q = body.quat.quaternion();
                    qpos0.extend_from_slice(&[
                        body.pos.x, body.pos.y, body.pos.z, q.w, q.i, q.j, q.k,
                    ]);
                }
                JointKind::Hinge { .. } => qpos0.push(0.0),
            }
            dof_body.extend(std::iter::repeat(id).take(joint.kind.nv()));
        }

        for act in &actuators {
            match joints.get(act.joint).map(|j| j.kind) {
                Some(JointKind::Hinge { .. }) => {}
                _ => {
                    return Err(PhysicsError::InvalidModel(format!(
                        "actuator '{}' must drive a hinge",
                        act.name
                    )))
                }
            }
        }

        Ok(Self {
            nq: qpos0.len(),
            nv: dof_body.len(),
            qpos0: DVector::from_vec(qpos0),
            dof_body,
            bodies,
            joints,
            geoms,
            actuators,
            opt,
        })
    }
}
