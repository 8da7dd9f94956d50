//! Quadruped "ant" model.
//!
//! A spherical torso on a free joint with four three-segment legs. Each leg
//! has a hip hinge about the vertical axis and an ankle hinge about the
//! horizontal axis perpendicular to the leg, both driven by torque motors.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::builder::{HingeParams, ModelBuilder};
use crate::error::PhysicsError;
use crate::model::Model;
use crate::types::{ContactParams, GeomShape, SimOptions, WORLD};

/// Name of the torso body, the body tracked for locomotion.
pub const TORSO: &str = "torso";

/// Configuration for the ant model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntConfig {
    /// Initial torso height in meters.
    pub torso_height: f64,
    pub torso_radius: f64,
    pub limb_radius: f64,
    /// Planar offset (per axis) of the hip and knee segments.
    pub thigh_offset: f64,
    /// Planar offset (per axis) of the ankle segment.
    pub shin_offset: f64,
    pub density: f64,
    pub friction: f64,
    /// Hip limit in degrees, symmetric about zero.
    pub hip_range_deg: f64,
    /// Ankle limits in degrees, mirrored for the front-right and back legs.
    pub ankle_range_deg: (f64, f64),
    pub joint_damping: f64,
    pub joint_armature: f64,
    pub gear: f64,
    pub ctrl_limit: f64,
    pub timestep: f64,
    pub substeps: usize,
    pub contact: ContactParams,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            torso_height: 0.75,
            torso_radius: 0.25,
            limb_radius: 0.08,
            thigh_offset: 0.2,
            shin_offset: 0.4,
            density: 5.0,
            friction: 1.0,
            hip_range_deg: 30.0,
            ankle_range_deg: (30.0, 70.0),
            joint_damping: 1.0,
            joint_armature: 1.0,
            gear: 150.0,
            ctrl_limit: 1.0,
            timestep: 0.01,
            substeps: 10,
            contact: ContactParams::default(),
        }
    }
}

/// One leg: body names, planar direction and whether the ankle range is
/// mirrored.
struct LegSpec {
    root: &'static str,
    aux: &'static str,
    ankle: &'static str,
    index: usize,
    dir: (f64, f64),
    mirrored: bool,
}

const LEGS: [LegSpec; 4] = [
    LegSpec {
        root: "front_left_leg",
        aux: "aux_1",
        ankle: "front_left_foot",
        index: 1,
        dir: (1.0, 1.0),
        mirrored: false,
    },
    LegSpec {
        root: "front_right_leg",
        aux: "aux_2",
        ankle: "front_right_foot",
        index: 2,
        dir: (-1.0, 1.0),
        mirrored: true,
    },
    LegSpec {
        root: "back_leg",
        aux: "aux_3",
        ankle: "back_left_foot",
        index: 3,
        dir: (-1.0, -1.0),
        mirrored: true,
    },
    LegSpec {
        root: "right_back_leg",
        aux: "aux_4",
        ankle: "back_right_foot",
        index: 4,
        dir: (1.0, -1.0),
        mirrored: false,
    },
];

/// Motor order: the back-right leg first, then legs one to three.
const MOTOR_LEG_ORDER: [usize; 4] = [4, 1, 2, 3];

/// Build the ant model.
///
/// # Errors
///
/// Returns [`PhysicsError::InvalidModel`] if the configuration yields a
/// degenerate body (for example a non-positive density).
pub fn ant_model(config: &AntConfig) -> Result<Model, PhysicsError> {
    let opt = SimOptions {
        timestep: config.timestep,
        substeps: config.substeps,
        floor_friction: config.friction,
        contact: config.contact,
        ..SimOptions::default()
    };
    let mut b = ModelBuilder::new(opt);

    let torso = b.add_body(TORSO, WORLD, Vector3::new(0.0, 0.0, config.torso_height));
    b.add_geom(
        torso,
        "torso_geom",
        GeomShape::Sphere {
            center: Vector3::zeros(),
            radius: config.torso_radius,
        },
        config.density,
        config.friction,
    );
    b.add_free_joint(torso, "root")?;

    let hip = HingeParams {
        range: Some((
            (-config.hip_range_deg).to_radians(),
            config.hip_range_deg.to_radians(),
        )),
        damping: config.joint_damping,
        armature: config.joint_armature,
    };
    let (ankle_lo, ankle_hi) = config.ankle_range_deg;

    for leg in &LEGS {
        let (sx, sy) = leg.dir;
        let thigh = Vector3::new(sx, sy, 0.0) * config.thigh_offset;
        let shin = Vector3::new(sx, sy, 0.0) * config.shin_offset;
        let capsule = |to: Vector3<f64>| GeomShape::Capsule {
            from: Vector3::zeros(),
            to,
            radius: config.limb_radius,
        };

        let root = b.add_body(leg.root, torso, Vector3::zeros());
        b.add_geom(
            root,
            &format!("aux_{}_geom", leg.index),
            capsule(thigh),
            config.density,
            config.friction,
        );

        let aux = b.add_body(leg.aux, root, thigh);
        b.add_hinge(aux, &format!("hip_{}", leg.index), Vector3::z(), hip)?;
        b.add_geom(
            aux,
            &format!("leg_{}_geom", leg.index),
            capsule(thigh),
            config.density,
            config.friction,
        );

        let foot = b.add_body(leg.ankle, aux, thigh);
        // Horizontal, perpendicular to the leg; same axis for diagonal pairs.
        let axis = if sx * sy > 0.0 {
            Vector3::new(-1.0, 1.0, 0.0)
        } else {
            Vector3::new(1.0, 1.0, 0.0)
        };
        let range = if leg.mirrored {
            (-ankle_hi, -ankle_lo)
        } else {
            (ankle_lo, ankle_hi)
        };
        b.add_hinge(
            foot,
            &format!("ankle_{}", leg.index),
            axis,
            HingeParams {
                range: Some((range.0.to_radians(), range.1.to_radians())),
                ..hip
            },
        )?;
        b.add_geom(
            foot,
            &format!("ankle_{}_geom", leg.index),
            capsule(shin),
            config.density,
            config.friction,
        );
    }

    let limit = Some((-config.ctrl_limit, config.ctrl_limit));
    for index in MOTOR_LEG_ORDER {
        for joint in [format!("hip_{index}"), format!("ankle_{index}")] {
            let id = b
                .joint_id(&joint)
                .ok_or_else(|| PhysicsError::InvalidModel(format!("missing joint {joint}")))?;
            b.add_motor(&joint, id, config.gear, limit);
        }
    }

    b.build()
}
