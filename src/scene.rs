//! Panorama scene controller: the textured sphere, its load cycle, auto
//! rotation, and the orbit camera looking at it from the centre.
//!
//! ```text
//! Unloaded --set_image--> Loading --complete(ok)--> Ready
//!                           ^   \--complete(err)--> Failed
//!                           |                         |
//!                           +-------set_image---------+
//! ```
//!
//! Only the most recent `set_image` can complete; older decodes are dropped.

use std::sync::Arc;

use image::RgbImage;

use crate::{
    camera::{CameraPose, OrbitControls},
    config::ViewerConfig,
    error::TourError,
    projection::{horizontal_to_vertical_fov, wrap_radians},
    redraw::Redraw,
    tour::ImageRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneState {
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub enum SceneEvent {
    LoadComplete(ImageRef),
    LoadFailed(TourError),
}

pub struct PanoramaScene {
    state: SceneState,
    next_ticket: u64,
    requested: Option<(LoadTicket, ImageRef)>,
    panorama: Option<Arc<RgbImage>>,
    controls: OrbitControls,
    auto_rotate: bool,
    auto_rotate_speed: f32,
    sphere_yaw: f32,
    aspect: f32,
    max_frame_seconds: f32,
    redraw: Redraw,
    events: Vec<SceneEvent>,
}

impl PanoramaScene {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            state: SceneState::Unloaded,
            next_ticket: 0,
            requested: None,
            panorama: None,
            controls: OrbitControls::new(config),
            auto_rotate: false,
            auto_rotate_speed: 0.0,
            sphere_yaw: 0.0,
            aspect: 16.0 / 9.0,
            max_frame_seconds: config.max_frame_seconds,
            redraw: Redraw::new(),
            events: Vec::new(),
        }
    }

    /// Starts showing `image`. The returned ticket must accompany the decode
    /// result passed to [`complete`](Self::complete).
    ///
    /// Auto rotation stops and the sphere returns to its rest orientation.
    pub fn set_image(&mut self, image: ImageRef) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        log::debug!("loading {image} ({ticket:?})");

        self.requested = Some((ticket, image));
        self.state = SceneState::Loading;
        self.auto_rotate = false;
        self.sphere_yaw = 0.0;
        self.redraw += true;
        ticket
    }

    /// Hands over a finished decode. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<Arc<RgbImage>, TourError>,
    ) -> bool {
        let Some((wanted, image)) = self.requested.clone() else {
            log::debug!("discarding decode {ticket:?}, nothing requested");
            return false;
        };
        if wanted != ticket || self.state != SceneState::Loading {
            log::debug!("discarding stale decode {ticket:?}");
            return false;
        }

        match result {
            Ok(panorama) => {
                log::info!(
                    "panorama {image} ready ({}x{})",
                    panorama.width(),
                    panorama.height()
                );
                self.panorama = Some(panorama);
                self.state = SceneState::Ready;
                self.events.push(SceneEvent::LoadComplete(image));
            }
            Err(err) => {
                log::warn!("{err}");
                self.state = SceneState::Failed(err.to_string());
                self.events.push(SceneEvent::LoadFailed(err));
            }
        }
        self.redraw += true;
        true
    }

    pub fn set_auto_rotate(&mut self, enabled: bool, speed: f32) {
        self.auto_rotate = enabled;
        self.auto_rotate_speed = speed;
    }

    pub fn set_initial_pose(&mut self, pitch: f32, yaw: f32, hfov: f32) {
        self.controls.set_initial_pose(pitch, yaw, hfov);
    }

    pub fn on_resize(&mut self, aspect: f32) {
        if aspect > 0.0 && aspect != self.aspect {
            self.aspect = aspect;
            self.redraw += true;
        }
    }

    /// Per-frame step, before input is applied: snaps a queued initial pose.
    pub fn begin_frame(&mut self) {
        self.redraw += self.controls.begin_frame();
    }

    /// Advances auto rotation by one rendered frame of `elapsed` seconds.
    pub fn advance(&mut self, elapsed: f32) {
        if !(self.auto_rotate && self.state == SceneState::Ready) {
            return;
        }
        let dt = elapsed.clamp(0.0, self.max_frame_seconds);
        if dt > 0.0 && self.auto_rotate_speed != 0.0 {
            self.sphere_yaw = wrap_radians(self.sphere_yaw - self.auto_rotate_speed * dt);
            self.redraw += true;
        }
    }

    /// Mutable camera access for input handling. Any use marks the view for
    /// redraw.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        self.redraw += true;
        &mut self.controls
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.controls.pose()
    }

    pub fn vertical_fov(&self) -> f32 {
        horizontal_to_vertical_fov(self.controls.pose().hfov, self.aspect)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Rotation of the sphere about the vertical axis, in radians.
    pub fn sphere_yaw(&self) -> f32 {
        self.sphere_yaw
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SceneState::Loading
    }

    pub fn is_rotating(&self) -> bool {
        self.auto_rotate && self.state == SceneState::Ready
    }

    /// Last successfully decoded panorama. Survives a failed load.
    pub fn panorama(&self) -> Option<&Arc<RgbImage>> {
        self.panorama.as_ref()
    }

    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
