//! Spherical projection math for equirectangular panoramas.
//!
//! Angles follow the panorama convention: yaw 0 is the centre of the image,
//! positive yaw turns right, positive pitch looks up. In 3D the camera looks
//! down -Z with +Y up, so yaw 0 maps to -Z and yaw 90 maps to +X.

use std::f32::consts::PI;

use nalgebra::{vector, SVector};

pub type Vec2u = SVector<u32, 2>;
pub type Vec2f = SVector<f32, 2>;
pub type Vec3f = SVector<f32, 3>;

/// Point on a sphere of `radius` for a (pitch, yaw) pair in degrees.
pub fn to_cartesian(pitch: f32, yaw: f32, radius: f32) -> Vec3f {
    let (sin_pitch, cos_pitch) = pitch.to_radians().sin_cos();
    let (sin_yaw, cos_yaw) = yaw.to_radians().sin_cos();
    vector![
        radius * cos_pitch * sin_yaw,
        radius * sin_pitch,
        -radius * cos_pitch * cos_yaw
    ]
}

/// Inverse of [`to_cartesian`]: (pitch, yaw) in degrees of a direction.
///
/// Yaw is returned in (-180, 180]. The zero vector maps to (0, 0).
pub fn to_angles(direction: &Vec3f) -> (f32, f32) {
    let norm = direction.norm();
    if norm <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let pitch = (direction.y / norm).clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = direction.x.atan2(-direction.z).to_degrees();
    (pitch, if yaw <= -180.0 { yaw + 360.0 } else { yaw })
}

/// Vertical field of view that preserves `hfov` on a viewport of `aspect`
/// (width / height).
pub fn horizontal_to_vertical_fov(hfov: f32, aspect: f32) -> f32 {
    let aspect = aspect.max(f32::EPSILON);
    let half = (hfov.to_radians() / 2.0).tan() / aspect;
    (2.0 * half.atan()).to_degrees()
}

/// Texel coordinates of a (pitch, yaw) pair on an equirectangular image.
pub fn angles_to_texel(pitch: f32, yaw: f32, image_size: Vec2f) -> Vec2f {
    let col = yaw / 360.0 + 0.5;
    let row = 0.5 - pitch / 180.0;
    vector![col, row].component_mul(&image_size)
}

/// Wraps a yaw in degrees into (-180, 180].
pub fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = (yaw + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Wraps an angle in radians into [0, 2π).
pub fn wrap_radians(angle: f32) -> f32 {
    angle.rem_euclid(2.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn points_lie_on_the_sphere() {
        for pitch in [-89.0, -45.0, -10.0, 0.0, 3.33, 30.0, 89.0] {
            for yaw in [-179.0, -124.78, -90.0, 0.0, 14.89, 90.0, 180.0] {
                let p = to_cartesian(pitch, yaw, 480.0);
                assert!((p.norm() - 480.0).abs() < EPS, "{pitch} {yaw}: {}", p.norm());
            }
        }
    }

    #[test]
    fn horizon_and_poles() {
        for yaw in [-150.0, 0.0, 42.0, 180.0] {
            assert_eq!(to_cartesian(0.0, yaw, 500.0).y, 0.0);
        }
        let top = to_cartesian(90.0, 0.0, 500.0);
        assert!((top - vector![0.0, 500.0, 0.0]).norm() < EPS);
        let bottom = to_cartesian(-90.0, 37.0, 500.0);
        assert!((bottom - vector![0.0, -500.0, 0.0]).norm() < EPS);
    }

    #[test]
    fn yaw_zero_faces_forward_and_positive_yaw_turns_right() {
        let front = to_cartesian(0.0, 0.0, 1.0);
        assert!((front - vector![0.0, 0.0, -1.0]).norm() < EPS);
        let right = to_cartesian(0.0, 90.0, 1.0);
        assert!((right - vector![1.0, 0.0, 0.0]).norm() < EPS);
    }

    #[test]
    fn equal_angles_collide() {
        assert_eq!(to_cartesian(7.39, 81.83, 480.0), to_cartesian(7.39, 81.83, 480.0));
    }

    #[test]
    fn angles_recover_from_direction() {
        for (pitch, yaw) in [(0.0, 0.0), (12.55, -3.79), (-21.58, -2.44), (45.0, 135.0), (0.0, 180.0)] {
            let (p, y) = to_angles(&to_cartesian(pitch, yaw, 3.0));
            assert!((p - pitch).abs() < EPS, "pitch {pitch} -> {p}");
            assert!(wrap_yaw(y - yaw).abs() < EPS, "yaw {yaw} -> {y}");
        }
    }

    #[test]
    fn vertical_fov_depends_on_aspect() {
        let wide = horizontal_to_vertical_fov(110.0, 16.0 / 9.0);
        let tall = horizontal_to_vertical_fov(110.0, 9.0 / 16.0);
        assert!(wide != tall);
        for v in [wide, tall] {
            assert!(v > 0.0 && v < 180.0);
        }
        assert!((horizontal_to_vertical_fov(90.0, 1.0) - 90.0).abs() < EPS);
    }

    #[test]
    fn vertical_fov_grows_with_inverse_aspect() {
        let mut last = 0.0;
        for inverse_aspect in [0.25, 0.5, 0.5625, 1.0, 1.7778, 3.0] {
            let v = horizontal_to_vertical_fov(110.0, 1.0 / inverse_aspect);
            assert!(v > last);
            last = v;
        }
    }

    #[test]
    fn texel_of_front_is_image_centre() {
        let t = angles_to_texel(0.0, 0.0, vector![4096.0, 2048.0]);
        assert_eq!(t, vector![2048.0, 1024.0]);
    }

    #[test]
    fn yaw_wraps_into_half_open_range() {
        assert_eq!(wrap_yaw(190.0), -170.0);
        assert_eq!(wrap_yaw(-180.0), 180.0);
        assert_eq!(wrap_yaw(540.0), 180.0);
        assert_eq!(wrap_yaw(-45.0), -45.0);
    }
}
