//! # Model Element Types
//!
//! Plain data describing the bodies, joints, geoms and actuators that make up
//! a [`Model`](crate::Model). Elements refer to each other by index.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Index of the implicit world body.
pub const WORLD: usize = 0;

/// A rigid body in the kinematic tree.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    /// Parent body index; the world body is its own parent.
    pub parent: usize,
    /// Position of the body frame in the parent frame.
    pub pos: Vector3<f64>,
    /// Orientation of the body frame relative to the parent frame.
    pub quat: UnitQuaternion<f64>,
    pub mass: f64,
    /// Center of mass in body coordinates.
    pub ipos: Vector3<f64>,
    /// Rotational inertia about the center of mass, body coordinates.
    pub inertia: Matrix3<f64>,
    pub joint: Option<usize>,
    pub geoms: Vec<usize>,
}

impl Body {
    /// The world body: massless, fixed, no geoms of its own.
    #[must_use]
    pub fn world() -> Self {
        Self {
            name: "world".to_string(),
            parent: WORLD,
            pos: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            mass: 0.0,
            ipos: Vector3::zeros(),
            inertia: Matrix3::zeros(),
            joint: None,
            geoms: Vec::new(),
        }
    }
}

/// Degrees of freedom a joint grants its body relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointKind {
    /// Six DOF. `qpos` holds world position then a `w, x, y, z` quaternion;
    /// `qvel` holds world linear velocity then body-local angular velocity.
    Free,
    /// Rotation about a unit axis in body coordinates, anchored at the body
    /// origin.
    Hinge { axis: Vector3<f64> },
}

impl JointKind {
    #[must_use]
    pub const fn nq(&self) -> usize {
        match self {
            Self::Free => 7,
            Self::Hinge { .. } => 1,
        }
    }

    #[must_use]
    pub const fn nv(&self) -> usize {
        match self {
            Self::Free => 6,
            Self::Hinge { .. } => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Joint {
    pub name: String,
    pub body: usize,
    pub kind: JointKind,
    pub qpos_adr: usize,
    pub dof_adr: usize,
    /// Position limits in radians, `None` when unlimited.
    pub range: Option<(f64, f64)>,
    pub damping: f64,
    /// Rotor inertia added to the mass matrix diagonal.
    pub armature: f64,
}

/// Collision shape in body coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeomShape {
    Sphere {
        center: Vector3<f64>,
        radius: f64,
    },
    /// Segment `from -> to` swept by a sphere.
    Capsule {
        from: Vector3<f64>,
        to: Vector3<f64>,
        radius: f64,
    },
}

impl GeomShape {
    #[must_use]
    pub fn volume(&self) -> f64 {
        match self {
            Self::Sphere { radius, .. } => sphere_volume(*radius),
            Self::Capsule { from, to, radius } => {
                let length = (to - from).norm();
                std::f64::consts::PI * radius.powi(2) * length + sphere_volume(*radius)
            }
        }
    }

    /// Center of the shape in body coordinates.
    #[must_use]
    pub fn center(&self) -> Vector3<f64> {
        match self {
            Self::Sphere { center, .. } => *center,
            Self::Capsule { from, to, .. } => (from + to) * 0.5,
        }
    }

    /// Rotational inertia about [`center`](Self::center) in body coordinates
    /// for a uniform solid of the given mass.
    #[must_use]
    pub fn inertia(&self, mass: f64) -> Matrix3<f64> {
        match self {
            Self::Sphere { radius, .. } => {
                Matrix3::identity() * (0.4 * mass * radius.powi(2))
            }
            Self::Capsule { from, to, radius } => {
                let axis_vec = to - from;
                let length = axis_vec.norm();
                let r2 = radius.powi(2);
                if length < f64::EPSILON {
                    return Matrix3::identity() * (0.4 * mass * r2);
                }
                // Cylinder of the segment length plus the two end caps as one
                // sphere split across the ends.
                let v_cyl = std::f64::consts::PI * r2 * length;
                let v_sph = sphere_volume(*radius);
                let total = v_cyl + v_sph;
                let m_cyl = mass * v_cyl / total;
                let m_sph = mass * v_sph / total;
                let half = 0.5 * length;
                let axial = 0.5 * m_cyl * r2 + 0.4 * m_sph * r2;
                let transverse = m_cyl * (3.0 * r2 + length.powi(2)) / 12.0
                    + 0.4 * m_sph * r2
                    + m_sph * (half.powi(2) + 0.75 * half * *radius);
                let u = axis_vec / length;
                Matrix3::identity() * transverse + (u * u.transpose()) * (axial - transverse)
            }
        }
    }
}

fn sphere_volume(radius: f64) -> f64 {
    (4.0 / 3.0) * std::f64::consts::PI * radius.powi(3)
}

#[derive(Clone, Debug)]
pub struct Geom {
    pub name: String,
    pub body: usize,
    pub shape: GeomShape,
    pub friction: f64,
}

/// A motor driving a hinge joint with torque `gear * ctrl`.
#[derive(Clone, Debug)]
pub struct Actuator {
    pub name: String,
    pub joint: usize,
    pub gear: f64,
    pub ctrl_range: Option<(f64, f64)>,
}

impl Actuator {
    /// Clamp a raw control to this actuator's range.
    #[must_use]
    pub fn clamp(&self, ctrl: f64) -> f64 {
        match self.ctrl_range {
            Some((lo, hi)) => ctrl.clamp(lo, hi),
            None => ctrl,
        }
    }
}

/// Penalty parameters for ground contact and joint limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    /// Normal stiffness in N/m.
    pub stiffness: f64,
    /// Normal damping in N·s/m.
    pub damping: f64,
    /// Tangential speed below which Coulomb friction is smoothed (m/s).
    pub slip_velocity: f64,
    /// Limit stiffness in generalized units.
    pub limit_stiffness: f64,
    pub limit_damping: f64,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            stiffness: 5_000.0,
            damping: 50.0,
            slip_velocity: 0.05,
            limit_stiffness: 2_500.0,
            limit_damping: 100.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Duration of one simulation timestep in seconds.
    pub timestep: f64,
    /// Integration sub-steps per timestep.
    pub substeps: usize,
    pub gravity: Vector3<f64>,
    /// Friction of the ground plane, combined with each geom's friction.
    pub floor_friction: f64,
    pub contact: ContactParams,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            timestep: 0.01,
            substeps: 10,
            gravity: Vector3::new(0.0, 0.0, -9.81),
            floor_friction: 1.0,
            contact: ContactParams::default(),
        }
    }
}
