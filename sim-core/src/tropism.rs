//! Growth-direction bias applied when a node sprouts a child.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Below this horizontal distance a node counts as lying on the vertical axis.
const AXIS_EPSILON: f32 = 1e-6;

/// Direction-bias policy selected at construction.
///
/// Every variant returns a unit vector. `RadialAttract` and `Spin` need the
/// node's radial offset from the vertical axis; for nodes exactly on the axis
/// that offset has no direction, and they pass the direction through
/// unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tropism {
    /// Identity.
    #[default]
    None,
    /// Bend toward `-Y`.
    Gravity,
    /// Bend toward the vertical axis at the node's height.
    RadialAttract,
    /// Twist around the vertical axis.
    Spin,
}

impl Tropism {
    pub const ALL: [Tropism; 4] = [
        Tropism::None,
        Tropism::Gravity,
        Tropism::RadialAttract,
        Tropism::Spin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tropism::None => "None",
            Tropism::Gravity => "Gravity",
            Tropism::RadialAttract => "Radial attract",
            Tropism::Spin => "Spin",
        }
    }

    /// Biases `direction` for a node sitting at `position`.
    ///
    /// `strength` is the blend weight in `[0, 1]`. `Gravity` and
    /// `RadialAttract` rotate the direction toward their target by that
    /// fraction of the angle between them. `Spin` adds the horizontal tangent
    /// scaled by `strength * dot(direction, radial)`.
    ///
    /// A zero `direction` is returned as is.
    pub fn bias(self, direction: Vec3, position: Vec3, strength: f32) -> Vec3 {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return dir;
        }

        match self {
            Tropism::None => dir,
            Tropism::Gravity => blend_toward(dir, Vec3::NEG_Y, strength),
            Tropism::RadialAttract => match radial(position) {
                Some(r) => blend_toward(dir, -r, strength),
                None => dir,
            },
            Tropism::Spin => match radial(position) {
                Some(r) => {
                    let tangent = Vec3::Y.cross(r);
                    (dir + tangent * (dir.dot(r) * strength)).normalize_or(dir)
                }
                None => dir,
            },
        }
    }
}

/// Unit horizontal offset of `position` from the vertical axis.
fn radial(position: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(position.x, 0.0, position.z);
    (flat.length_squared() > AXIS_EPSILON * AXIS_EPSILON).then(|| flat.normalize())
}

/// Rotates unit `dir` toward unit `target` by `weight` of the angle between them.
///
/// When the two are exactly opposite the rotation axis is an arbitrary
/// perpendicular, so the result still tilts away from `dir`.
fn blend_toward(dir: Vec3, target: Vec3, weight: f32) -> Vec3 {
    let arc = Quat::from_rotation_arc(dir, target);
    (Quat::IDENTITY.slerp(arc, weight) * dir).normalize_or(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit(v: Vec3) {
        assert!((v.length() - 1.0).abs() < 1e-5, "not unit: {v:?}");
    }

    #[test]
    fn none_is_identity_on_unit_vectors() {
        let d = Vec3::new(1.0, 2.0, 3.0).normalize();
        let out = Tropism::None.bias(d, Vec3::new(1.0, 0.0, 0.0), 0.5);
        assert!((out - d).length() < 1e-6);
    }

    #[test]
    fn gravity_pulls_straight_up_direction_down() {
        let none = Tropism::None.bias(Vec3::Y, Vec3::new(0.5, 1.0, 0.0), 0.2);
        let gravity = Tropism::Gravity.bias(Vec3::Y, Vec3::new(0.5, 1.0, 0.0), 0.2);

        assert_unit(gravity);
        assert!(gravity.y < none.y, "gravity {gravity:?} vs none {none:?}");
    }

    #[test]
    fn gravity_with_zero_strength_is_identity() {
        let d = Vec3::new(1.0, 1.0, 0.0).normalize();
        let out = Tropism::Gravity.bias(d, Vec3::ZERO, 0.0);
        assert!((out - d).length() < 1e-5);
    }

    #[test]
    fn radial_attract_bends_toward_axis() {
        let pos = Vec3::new(2.0, 3.0, 0.0);
        let out = Tropism::RadialAttract.bias(Vec3::Y, pos, 0.3);

        assert_unit(out);
        assert!(out.x < 0.0);
        assert!(out.z.abs() < 1e-5);
    }

    #[test]
    fn spin_adds_tangential_component() {
        let pos = Vec3::new(1.0, 0.0, 0.0);
        let outward = Vec3::new(1.0, 1.0, 0.0).normalize();
        let out = Tropism::Spin.bias(outward, pos, 0.5);

        assert_unit(out);
        // Y x X = -Z
        assert!(out.z < 0.0);

        // A direction orthogonal to the radial offset gets no spin.
        let up = Tropism::Spin.bias(Vec3::Y, pos, 0.5);
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn radial_variants_pass_through_on_axis() {
        let d = Vec3::new(0.3, 1.0, 0.2).normalize();
        let on_axis = Vec3::new(0.0, 4.0, 0.0);

        assert!((Tropism::RadialAttract.bias(d, on_axis, 0.8) - d).length() < 1e-6);
        assert!((Tropism::Spin.bias(d, on_axis, 0.8) - d).length() < 1e-6);
    }

    #[test]
    fn zero_direction_stays_zero() {
        for t in Tropism::ALL {
            assert_eq!(t.bias(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), 0.5), Vec3::ZERO);
        }
    }
}
