use image::{Pixel, RgbImage};
use nalgebra::{vector, Rotation3, Vector3};
use rayon::prelude::*;

use crate::{
    camera::CameraPose,
    projection::{angles_to_texel, horizontal_to_vertical_fov, to_angles, Vec2f, Vec2u, Vec3f},
};

type Vec3u8 = nalgebra::SVector<u8, 3>;

/// Maps between view pixels, sphere directions, and panorama texels for one
/// camera pose and sphere orientation.
pub struct ViewProjection {
    view_size: Vec2f,
    image_size: Vec2f,
    tan_half: Vec2f,
    camera_to_sphere: Rotation3<f32>,
}

impl ViewProjection {
    /// `sphere_yaw` is the sphere's rotation about +Y in radians.
    pub fn new(image_size: Vec2u, view_size: Vec2u, pose: &CameraPose, sphere_yaw: f32) -> Self {
        let view_size: Vec2f = view_size.cast();
        let aspect = view_size.x / view_size.y.max(1.0);
        let vfov = horizontal_to_vertical_fov(pose.hfov, aspect);
        let tan_half = vector![
            (pose.hfov.to_radians() / 2.0).tan(),
            (vfov.to_radians() / 2.0).tan()
        ];
        let sphere = Rotation3::from_axis_angle(&Vector3::y_axis(), sphere_yaw);
        ViewProjection {
            view_size,
            image_size: image_size.cast(),
            tan_half,
            camera_to_sphere: sphere.inverse() * pose.camera_to_world(),
        }
    }

    /// Panorama texel seen through view pixel `p`.
    pub fn proj(&self, p: Vec2f) -> Vec2f {
        let ndc = vector![
            2.0 * (p.x + 0.5) / self.view_size.x - 1.0,
            1.0 - 2.0 * (p.y + 0.5) / self.view_size.y
        ];
        let ray = vector![ndc.x * self.tan_half.x, ndc.y * self.tan_half.y, -1.0];
        let (pitch, yaw) = to_angles(&(self.camera_to_sphere * ray));
        angles_to_texel(pitch, yaw, self.image_size)
    }

    /// Where a point in sphere space appears, as a fraction of the viewport
    /// (0,0 top-left, 1,1 bottom-right). `None` when behind the camera or
    /// beyond `margin` outside the viewport.
    pub fn to_viewport(&self, point: &Vec3f, margin: f32) -> Option<Vec2f> {
        let p = self.camera_to_sphere.inverse_transform_vector(point);
        if p.z >= -f32::EPSILON {
            return None;
        }
        let depth = -p.z;
        let ndc = vector![
            p.x / depth / self.tan_half.x,
            p.y / depth / self.tan_half.y
        ];
        let limit = 1.0 + 2.0 * margin;
        if ndc.x.abs() > limit || ndc.y.abs() > limit {
            return None;
        }
        Some(vector![(ndc.x + 1.0) / 2.0, (1.0 - ndc.y) / 2.0])
    }
}

fn interpolation(q1: image::Rgb<u8>, x1: f32, q2: image::Rgb<u8>, x2: f32) -> image::Rgb<u8> {
    let q1: Vec3f = Vec3u8::from_iterator(q1.channels().iter().copied()).cast();
    let q2: Vec3f = Vec3u8::from_iterator(q2.channels().iter().copied()).cast();
    let q = q1.scale(x1) + q2.scale(x2);
    image::Rgb([q[0].round() as u8, q[1].round() as u8, q[2].round() as u8])
}

/// Samples an equirectangular image at texel `(x, y)`, wrapping across the
/// ±180° seam and clamping at the poles.
fn bilinear_interpolation(img: &RgbImage, x: f32, y: f32) -> image::Rgb<u8> {
    let (width, height) = img.dimensions();
    let x = x - 0.5;
    let y = (y - 0.5).clamp(0.0, (height - 1) as f32);

    let fx = x - x.floor();
    let fy = y - y.floor();
    let x1 = (x.floor() as i64).rem_euclid(width as i64) as u32;
    let x2 = (x1 + 1) % width;
    let y1 = y.floor() as u32;
    let y2 = (y1 + 1).min(height - 1);

    let q11 = *img.get_pixel(x1, y1);
    let q21 = *img.get_pixel(x2, y1);
    let q12 = *img.get_pixel(x1, y2);
    let q22 = *img.get_pixel(x2, y2);

    let r1 = interpolation(q11, 1.0 - fx, q21, fx);
    let r2 = interpolation(q12, 1.0 - fx, q22, fx);
    interpolation(r1, 1.0 - fy, r2, fy)
}

/// Renders the perspective view of `panorama` described by `proj` into `out`.
pub fn render_view(panorama: &RgbImage, out: &mut RgbImage, proj: &ViewProjection) {
    if panorama.width() == 0 || panorama.height() == 0 {
        return;
    }
    out.enumerate_pixels_mut()
        .par_bridge()
        .for_each(|(x, y, pixel)| {
            let p = proj.proj(vector![x as f32, y as f32]);
            *pixel = bilinear_interpolation(panorama, p.x, p.y);
        });
}
