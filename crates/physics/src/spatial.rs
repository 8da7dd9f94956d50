//! # Spatial Algebra
//!
//! Six-dimensional motion and force vectors in Featherstone's `[angular; linear]`
//! layout. Every spatial quantity in the engine is expressed in world
//! coordinates about the world origin, so composite inertias can be summed
//! without shifting and joint motion subspaces of different bodies can be
//! dotted directly.

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

/// Spatial motion or force vector: `[angular (3), linear (3)]`.
pub type SpatialVector = Vector6<f64>;

/// Assemble a spatial vector from its angular and linear halves.
#[inline]
#[must_use]
pub fn spatial(angular: Vector3<f64>, linear: Vector3<f64>) -> SpatialVector {
    SpatialVector::new(
        angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
    )
}

#[inline]
#[must_use]
pub fn angular(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

#[inline]
#[must_use]
pub fn linear(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[3], v[4], v[5])
}

/// Motion cross product `v × s`.
#[inline]
#[must_use]
pub fn cross_motion(v: &SpatialVector, s: &SpatialVector) -> SpatialVector {
    let w = angular(v);
    let v_lin = linear(v);
    let s_ang = angular(s);
    let s_lin = linear(s);
    spatial(w.cross(&s_ang), w.cross(&s_lin) + v_lin.cross(&s_ang))
}

/// Force cross product `v ×* f`.
#[inline]
#[must_use]
pub fn cross_force(v: &SpatialVector, f: &SpatialVector) -> SpatialVector {
    let w = angular(v);
    let v_lin = linear(v);
    let f_ang = angular(f);
    let f_lin = linear(f);
    spatial(w.cross(&f_ang) + v_lin.cross(&f_lin), w.cross(&f_lin))
}

/// Skew-symmetric matrix `[c]×` such that `[c]× x = c × x`.
#[inline]
#[must_use]
pub fn skew(c: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -c.z, c.y, c.z, 0.0, -c.x, -c.y, c.x, 0.0)
}

/// Spatial inertia about the world origin of a body with the given mass,
/// world-frame center of mass and world-frame rotational inertia about that
/// center of mass.
///
/// ```text
/// I = [ I_c - m [c]×[c]×   m [c]× ]
///     [ -m [c]×            m 1    ]
/// ```
#[must_use]
pub fn spatial_inertia(
    mass: f64,
    com: &Vector3<f64>,
    inertia_com: &Matrix3<f64>,
) -> Matrix6<f64> {
    let c = skew(com);
    let mc = c * mass;
    let mut out = Matrix6::zeros();
    out.fixed_view_mut::<3, 3>(0, 0).copy_from(&(inertia_com - mc * c));
    out.fixed_view_mut::<3, 3>(0, 3).copy_from(&mc);
    out.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-mc));
    out.fixed_view_mut::<3, 3>(3, 3).copy_from(&(Matrix3::identity() * mass));
    out
}

/// Spatial force at the world origin produced by a pure force `f` applied at
/// world point `p`.
#[inline]
#[must_use]
pub fn force_at(p: &Vector3<f64>, f: &Vector3<f64>) -> SpatialVector {
    spatial(p.cross(f), *f)
}

/// Linear velocity of the world point `p` moving with spatial velocity `v`.
#[inline]
#[must_use]
pub fn point_velocity(v: &SpatialVector, p: &Vector3<f64>) -> Vector3<f64> {
    linear(v) + angular(v).cross(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inertia_is_symmetric_and_matches_point_mass_momentum() {
        let com = Vector3::new(0.3, -0.2, 0.5);
        let inertia = Matrix3::from_diagonal(&Vector3::new(0.1, 0.2, 0.3));
        let i = spatial_inertia(2.0, &com, &inertia);
        assert_relative_eq!(i, i.transpose(), epsilon = 1e-12);

        // Pure translation: momentum is m * v, angular momentum c × (m v).
        let v = spatial(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0));
        let h = i * v;
        assert_relative_eq!(linear(&h), Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            angular(&h),
            com.cross(&Vector3::new(2.0, 0.0, 0.0)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn cross_products_are_dual() {
        let v = SpatialVector::new(0.1, -0.4, 0.2, 1.0, 0.5, -0.3);
        let m = SpatialVector::new(0.7, 0.1, -0.2, 0.3, 0.0, 0.9);
        let f = SpatialVector::new(-0.5, 0.2, 0.4, 0.1, -0.6, 0.8);
        // (v × m) · f = -m · (v ×* f)
        assert_relative_eq!(
            cross_motion(&v, &m).dot(&f),
            -m.dot(&cross_force(&v, &f)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn point_velocity_of_rotation_about_offset_axis() {
        // Rotation about z through (1, 0, 0): origin-point linear part is p × ω.
        let p = Vector3::new(1.0, 0.0, 0.0);
        let w = Vector3::new(0.0, 0.0, 2.0);
        let v = spatial(w, p.cross(&w));
        assert_relative_eq!(point_velocity(&v, &p), Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(
            point_velocity(&v, &Vector3::new(2.0, 0.0, 0.0)),
            Vector3::new(0.0, 2.0, 0.0),
            epsilon = 1e-12
        );
    }
}
