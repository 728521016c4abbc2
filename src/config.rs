//! Viewer settings shared by every location of a tour.
//!
//! Read from the optional `viewer` section of the tour file; every field has
//! a default so an empty section (or none at all) is valid.

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Radius of the textured panorama sphere.
    pub sphere_radius: f32,
    /// Radius hotspot anchors are placed at; strictly inside the sphere.
    pub hotspot_radius: f32,
    /// Polar angle limits of the look direction, in degrees from straight up.
    pub min_polar_deg: f32,
    pub max_polar_deg: f32,
    /// Zoom range of the horizontal field of view, in degrees.
    pub min_hfov: f32,
    pub max_hfov: f32,
    /// Drag sensitivity. 1.0 keeps the panorama under the pointer.
    pub rotate_speed: f32,
    /// Degrees of horizontal fov per scroll point.
    pub zoom_speed: f32,
    /// Resolution of the CPU-rendered view relative to the viewport.
    pub render_scale: f32,
    /// Longest time step a single auto-rotate advance may apply.
    pub max_frame_seconds: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 500.0,
            hotspot_radius: 480.0,
            min_polar_deg: 5.0,
            max_polar_deg: 175.0,
            min_hfov: 30.0,
            max_hfov: 120.0,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            render_scale: 0.5,
            max_frame_seconds: 0.1,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: &str| Err(ConfigError::InvalidViewer(reason.to_string()));

        if !(self.sphere_radius > 0.0) {
            return fail("sphere_radius must be positive");
        }
        if !(self.hotspot_radius > 0.0 && self.hotspot_radius < self.sphere_radius) {
            return fail("hotspot_radius must lie strictly inside the sphere");
        }
        if !(0.0 <= self.min_polar_deg
            && self.min_polar_deg < self.max_polar_deg
            && self.max_polar_deg <= 180.0)
        {
            return fail("polar limits must satisfy 0 <= min < max <= 180");
        }
        if !(0.0 < self.min_hfov && self.min_hfov <= self.max_hfov && self.max_hfov < 180.0) {
            return fail("hfov range must satisfy 0 < min <= max < 180");
        }
        if !(self.render_scale > 0.0 && self.render_scale <= 1.0) {
            return fail("render_scale must be in (0, 1]");
        }
        if !(self.max_frame_seconds > 0.0) {
            return fail("max_frame_seconds must be positive");
        }
        Ok(())
    }
}
