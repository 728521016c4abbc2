use nalgebra::{Rotation3, Vector3};

use crate::{
    config::ViewerConfig,
    projection::{horizontal_to_vertical_fov, to_cartesian, wrap_yaw, Vec2f, Vec3f},
};

/// Look direction and zoom of the panorama camera, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub pitch: f32,
    pub yaw: f32,
    pub hfov: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            hfov: 110.0,
        }
    }
}

impl CameraPose {
    pub fn look_direction(&self) -> Vec3f {
        to_cartesian(self.pitch, self.yaw, 1.0)
    }

    /// Rotation taking camera space (looking down -Z, +Y up) to world space.
    pub fn camera_to_world(&self) -> Rotation3<f32> {
        Rotation3::look_at_rh(&self.look_direction(), &Vector3::y()).inverse()
    }

    pub fn vertical_fov(&self, aspect: f32) -> f32 {
        horizontal_to_vertical_fov(self.hfov, aspect)
    }
}

/// Orbit-style controller for a camera sitting at the sphere's centre.
///
/// Dragging turns the view, scrolling or pinching changes the field of
/// view. There is no panning.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pose: CameraPose,
    pending: Option<CameraPose>,
    min_pitch: f32,
    max_pitch: f32,
    min_hfov: f32,
    max_hfov: f32,
    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitControls {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            pose: CameraPose::default(),
            pending: None,
            min_pitch: 90.0 - config.max_polar_deg,
            max_pitch: 90.0 - config.min_polar_deg,
            min_hfov: config.min_hfov,
            max_hfov: config.max_hfov,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Queues a pose to snap to on the next [`begin_frame`](Self::begin_frame).
    /// A later call before that frame replaces the earlier one.
    pub fn set_initial_pose(&mut self, pitch: f32, yaw: f32, hfov: f32) {
        self.pending = Some(CameraPose { pitch, yaw, hfov });
    }

    /// Applies a queued initial pose. Must run before input is handled.
    pub fn begin_frame(&mut self) -> bool {
        let Some(pose) = self.pending.take() else {
            return false;
        };
        self.pose = CameraPose {
            pitch: pose.pitch.clamp(self.min_pitch, self.max_pitch),
            yaw: wrap_yaw(pose.yaw),
            hfov: pose.hfov.clamp(self.min_hfov, self.max_hfov),
        };
        log::debug!("camera snapped to {:?}", self.pose);
        true
    }

    /// Turns the view by a pointer drag of `delta` pixels over a viewport of
    /// `viewport` pixels, keeping the panorama under the pointer.
    pub fn drag(&mut self, delta: Vec2f, viewport: Vec2f) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let vfov = self.pose.vertical_fov(viewport.x / viewport.y);
        let yaw_per_px = self.pose.hfov / viewport.x;
        let pitch_per_px = vfov / viewport.y;

        self.pose.yaw = wrap_yaw(self.pose.yaw - delta.x * yaw_per_px * self.rotate_speed);
        self.pose.pitch = (self.pose.pitch + delta.y * pitch_per_px * self.rotate_speed)
            .clamp(self.min_pitch, self.max_pitch);
    }

    /// Scroll wheel zoom. Positive `points` zoom in.
    pub fn scroll(&mut self, points: f32) {
        self.set_hfov(self.pose.hfov - points * self.zoom_speed);
    }

    /// Pinch zoom. `factor > 1` zooms in.
    pub fn pinch(&mut self, factor: f32) {
        if factor > 0.0 {
            self.set_hfov(self.pose.hfov / factor);
        }
    }

    fn set_hfov(&mut self, hfov: f32) {
        self.pose.hfov = hfov.clamp(self.min_hfov, self.max_hfov);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    const EPS: f32 = 1e-4;

    fn controls() -> OrbitControls {
        OrbitControls::new(&ViewerConfig::default())
    }

    #[test]
    fn default_pose_looks_forward() {
        let rot = CameraPose::default().camera_to_world();
        let forward = rot * vector![0.0, 0.0, -1.0];
        assert!((forward - vector![0.0, 0.0, -1.0]).norm() < EPS);
    }

    #[test]
    fn camera_forward_matches_look_direction() {
        let pose = CameraPose {
            pitch: 20.0,
            yaw: 81.83,
            hfov: 90.0,
        };
        let forward = pose.camera_to_world() * vector![0.0, 0.0, -1.0];
        assert!((forward - pose.look_direction()).norm() < EPS);
        let up = pose.camera_to_world() * vector![0.0, 1.0, 0.0];
        assert!(up.y > 0.0);
    }

    #[test]
    fn initial_pose_applies_once() {
        let mut c = controls();
        c.set_initial_pose(10.0, 45.0, 90.0);
        assert_eq!(c.pose(), CameraPose::default());

        assert!(c.begin_frame());
        assert_eq!(c.pose().yaw, 45.0);
        assert_eq!(c.pose().pitch, 10.0);

        c.drag(vector![100.0, 0.0], vector![800.0, 600.0]);
        let moved = c.pose();
        assert!(!c.begin_frame());
        assert_eq!(c.pose(), moved);
    }

    #[test]
    fn pitch_is_kept_off_the_poles() {
        let mut c = controls();
        c.drag(vector![0.0, 1e6], vector![800.0, 600.0]);
        assert!((c.pose().pitch - 85.0).abs() < EPS);
        c.drag(vector![0.0, -1e7], vector![800.0, 600.0]);
        assert!((c.pose().pitch + 85.0).abs() < EPS);

        c.set_initial_pose(90.0, 0.0, 110.0);
        c.begin_frame();
        assert!((c.pose().pitch - 85.0).abs() < EPS);
    }

    #[test]
    fn dragging_right_turns_left() {
        let mut c = controls();
        // A full viewport width moves the view by one hfov.
        c.drag(vector![800.0, 0.0], vector![800.0, 450.0]);
        assert!((c.pose().yaw + 110.0).abs() < 1e-3);
        c.drag(vector![-1600.0, 0.0], vector![800.0, 450.0]);
        assert!((c.pose().yaw - 110.0).abs() < 1e-3);
    }

    #[test]
    fn smoothed_wheel_notch_adds_up_to_one_step() {
        let mut whole = controls();
        whole.scroll(50.0);
        let mut sliced = controls();
        for slice in [20.0, 15.0, 9.0, 4.0, 2.0] {
            sliced.scroll(slice);
        }
        assert!((whole.pose().hfov - sliced.pose().hfov).abs() < EPS);
        assert!((110.0 - sliced.pose().hfov - 2.5).abs() < EPS);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controls();
        c.scroll(50.0);
        assert!((c.pose().hfov - 107.5).abs() < EPS);
        c.scroll(1e6);
        assert_eq!(c.pose().hfov, 30.0);
        c.pinch(0.01);
        assert_eq!(c.pose().hfov, 120.0);
        c.pinch(0.0);
        assert_eq!(c.pose().hfov, 120.0);
    }

    #[test]
    fn empty_viewport_ignores_drag() {
        let mut c = controls();
        c.drag(vector![10.0, 10.0], vector![0.0, 0.0]);
        assert_eq!(c.pose(), CameraPose::default());
    }
}
