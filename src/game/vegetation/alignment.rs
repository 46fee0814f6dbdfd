//! Surface Alignment
//!
//! Rotates an asset's authored up axis onto the local terrain normal, then
//! spins it about that original up axis by a yaw angle.

use glam::{Mat4, Quat, Vec3};

const PARALLEL_EPSILON: f32 = 1e-6;

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
///
/// Parallel inputs give the identity. Anti-parallel inputs rotate half a turn
/// about an axis perpendicular to `from`.
pub fn align_up_to_normal(from: Vec3, to: Vec3) -> Quat {
    let d = from.dot(to);
    if d >= 1.0 - PARALLEL_EPSILON {
        return Quat::IDENTITY;
    }
    if d <= -1.0 + PARALLEL_EPSILON {
        return Quat::from_axis_angle(from.any_orthonormal_vector(), std::f32::consts::PI);
    }
    let axis = from.cross(to).normalize();
    Quat::from_axis_angle(axis, d.clamp(-1.0, 1.0).acos())
}

/// Placement transform of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl InstanceTransform {
    /// Translate, align to `normal`, yaw about `model_up`, then scale.
    pub fn on_surface(position: Vec3, normal: Vec3, model_up: Vec3, yaw: f32, scale: f32) -> Self {
        let align = align_up_to_normal(model_up, normal);
        let spin = Quat::from_axis_angle(model_up, yaw);
        Self {
            position,
            rotation: (align * spin).normalize(),
            scale,
        }
    }

    /// `T * R * S`
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }

    /// Direction the model's up axis points after placement.
    pub fn up(&self, model_up: Vec3) -> Vec3 {
        self.rotation * model_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_is_identity() {
        assert_eq!(align_up_to_normal(Vec3::Y, Vec3::Y), Quat::IDENTITY);
    }

    #[test]
    fn test_maps_up_onto_normal() {
        let normal = Vec3::new(0.3, 0.9, -0.2).normalize();
        let q = align_up_to_normal(Vec3::Y, normal);
        assert!((q * Vec3::Y - normal).length() < 1e-5);
    }

    #[test]
    fn test_anti_parallel_flips() {
        let q = align_up_to_normal(Vec3::Y, Vec3::NEG_Y);
        assert!((q * Vec3::Y - Vec3::NEG_Y).length() < 1e-5);
        assert!(q.is_normalized());
    }

    #[test]
    fn test_flat_ground_rotation_is_pure_yaw() {
        let yaw = 1.1;
        let t = InstanceTransform::on_surface(Vec3::ZERO, Vec3::Y, Vec3::Y, yaw, 1.0);
        let expected = Quat::from_rotation_y(yaw);
        assert!(t.rotation.angle_between(expected) < 1e-4);
        assert!((t.up(Vec3::Y) - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_yaw_keeps_alignment() {
        let normal = Vec3::new(-0.4, 0.8, 0.45).normalize();
        for yaw in [0.0, 0.7, 2.5, 5.9] {
            let t = InstanceTransform::on_surface(Vec3::ZERO, normal, Vec3::Y, yaw, 1.0);
            assert!((t.up(Vec3::Y) - normal).length() < 1e-5);
        }
    }

    #[test]
    fn test_matrix_is_trs() {
        let t = InstanceTransform {
            position: Vec3::new(4.0, 2.0, -1.0),
            rotation: Quat::from_rotation_y(0.5),
            scale: 2.0,
        };
        let p = t.matrix().transform_point3(Vec3::X);
        let expected = t.position + t.rotation * Vec3::new(2.0, 0.0, 0.0);
        assert!((p - expected).length() < 1e-5);
    }
}
