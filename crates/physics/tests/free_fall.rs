use nalgebra::Vector3;
use physics::{GeomShape, ModelBuilder, PhysicsSim, SimOptions, WORLD};

fn falling_ball(height: f64) -> PhysicsSim {
    let mut builder = ModelBuilder::new(SimOptions::default());
    let ball = builder.add_body("ball", WORLD, Vector3::new(0.0, 0.0, height));
    builder.add_geom(
        ball,
        "ball_geom",
        GeomShape::Sphere {
            center: Vector3::zeros(),
            radius: 0.1,
        },
        1000.0,
        1.0,
    );
    builder.add_free_joint(ball, "root").unwrap();
    PhysicsSim::new(builder.build().unwrap())
}

#[test]
fn sphere_free_fall_matches_analytic() {
    // initial height 10 m, no initial velocity
    let mut sim = falling_ball(10.0);
    let frames = 100_usize; // 1 s at the default 10 ms timestep, well above ground
    sim.step(&[], frames).unwrap();

    let t = sim.time();
    assert!((t - 1.0).abs() < 1e-9, "t={t}");

    // analytic: h = h0 − ½ g t²  (g = 9.81), within one sub-step of drift
    let expected = 10.0 - 0.5 * 9.81 * t * t;
    let diff = (sim.qpos()[2] - expected).abs();
    assert!(diff < 1e-2, "diff={diff}");

    // semi-implicit Euler integrates constant acceleration exactly in velocity
    assert!((sim.qvel()[2] + 9.81 * t).abs() < 1e-9);
    assert!(sim.qvel()[0].abs() < 1e-12);
}

#[test]
fn spinning_ball_keeps_unit_quaternion() {
    let mut sim = falling_ball(10.0);
    let qpos = sim.qpos().to_vec();
    sim.set_state(&qpos, &[0.0, 0.0, 0.0, 3.0, -2.0, 1.0]).unwrap();
    sim.step(&[], 50).unwrap();
    let q = &sim.qpos()[3..7];
    let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((norm - 1.0).abs() < 1e-9, "norm={norm}");
}

#[test]
fn dropped_ball_comes_to_rest_on_ground() {
    let mut sim = falling_ball(0.5);
    sim.step(&[], 300).unwrap();
    let z = sim.qpos()[2];
    assert!(z > 0.08 && z < 0.1, "z={z}");
    assert!(sim.qvel()[2].abs() < 1e-2);
    assert_eq!(sim.data().contacts.len(), 1);
}
