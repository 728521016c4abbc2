//! Hotspot markers of the active location.
//!
//! In-scene hotspots get a 3D anchor slightly inside the panorama sphere so
//! they are never hidden by it; fixed hotspots stay out of the scene and are
//! drawn at constant screen positions. Hover is tracked here, one hotspot at
//! a time.

use crate::{
    projection::{to_cartesian, Vec2f, Vec3f},
    render::ViewProjection,
    tour::{Hotspot, HotspotKind, Location, LocationId},
};

/// How far outside the viewport (as a fraction of its size) a marker may be
/// and still be reported, so markers slide in instead of popping.
const VIEWPORT_MARGIN: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Walking icon, clickable.
    Navigate,
    /// Round "i" badge with a hover tooltip.
    Info,
    /// Screen-anchored button.
    Fixed,
}

#[derive(Debug, Clone)]
pub struct PlacedHotspot {
    /// Position in the location's hotspot list.
    pub index: usize,
    pub anchor: Vec3f,
    pub hotspot: Hotspot,
}

impl PlacedHotspot {
    pub fn style(&self) -> MarkerStyle {
        style_of(&self.hotspot)
    }
}

fn style_of(hotspot: &Hotspot) -> MarkerStyle {
    match hotspot.kind {
        HotspotKind::Navigation { .. } => MarkerStyle::Navigate,
        HotspotKind::Info { .. } => MarkerStyle::Info,
        HotspotKind::Fixed { .. } => MarkerStyle::Fixed,
    }
}

pub struct HotspotLayer {
    location: LocationId,
    placed: Vec<PlacedHotspot>,
    fixed: Vec<(usize, Hotspot)>,
    hovered: Option<usize>,
}

impl HotspotLayer {
    pub fn new(location: &Location, radius: f32) -> Self {
        let mut placed = Vec::new();
        let mut fixed = Vec::new();
        for (index, hotspot) in location.hot_spots.iter().enumerate() {
            if hotspot.is_fixed() {
                fixed.push((index, hotspot.clone()));
            } else {
                placed.push(PlacedHotspot {
                    index,
                    anchor: to_cartesian(hotspot.pitch, hotspot.yaw, radius),
                    hotspot: hotspot.clone(),
                });
            }
        }
        Self {
            location: location.id,
            placed,
            fixed,
            hovered: None,
        }
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn placed(&self) -> &[PlacedHotspot] {
        &self.placed
    }

    pub fn fixed(&self) -> &[(usize, Hotspot)] {
        &self.fixed
    }

    fn get(&self, index: usize) -> Option<&Hotspot> {
        self.placed
            .iter()
            .find(|p| p.index == index)
            .map(|p| &p.hotspot)
            .or_else(|| {
                self.fixed
                    .iter()
                    .find(|(i, _)| *i == index)
                    .map(|(_, h)| h)
            })
    }

    /// In-scene hotspots visible through `proj`, with their viewport
    /// fractions.
    pub fn screen_positions(&self, proj: &ViewProjection) -> Vec<(&PlacedHotspot, Vec2f)> {
        self.placed
            .iter()
            .filter_map(|p| {
                proj.to_viewport(&p.anchor, VIEWPORT_MARGIN)
                    .map(|pos| (p, pos))
            })
            .collect()
    }

    pub fn pointer_hover(&mut self, index: usize) {
        if self.get(index).is_some() && self.hovered != Some(index) {
            log::debug!("hover hotspot #{index} of {}", self.location);
            self.hovered = Some(index);
        }
    }

    /// Clears hover if `index` is the hovered hotspot.
    pub fn pointer_leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    /// Sets hover to exactly `hovered`, clearing any other. Meant to be
    /// called once per frame with whatever the pointer is over, so a missed
    /// leave can never leave a hotspot stuck hovered.
    pub fn sync_hover(&mut self, hovered: Option<usize>) {
        match hovered {
            Some(index) => self.pointer_hover(index),
            None => self.hovered = None,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }

    /// Tooltip text of the hovered hotspot.
    pub fn tooltip(&self) -> Option<&str> {
        self.hovered
            .and_then(|i| self.get(i))
            .map(Hotspot::message)
            .filter(|text| !text.is_empty())
    }

    /// Whether the pointer should show a "clickable" cursor.
    pub fn wants_pointer_cursor(&self) -> bool {
        self.hovered.is_some()
    }

    /// Handles a click on hotspot `index`, returning where to navigate.
    /// Info hotspots are inert.
    pub fn click(&self, index: usize) -> Option<LocationId> {
        let target = self.get(index)?.target();
        if let Some(target) = target {
            log::debug!("hotspot #{index} of {} leads to {target}", self.location);
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera::CameraPose, tour::ImageRef};
    use nalgebra::vector;

    fn location() -> Location {
        let mut fixed = Hotspot::info(0.0, 0.0, "Enter");
        fixed.kind = HotspotKind::Fixed {
            target: Some(LocationId(2)),
        };
        Location::new(
            LocationId(0),
            "Main",
            ImageRef::new("main.jpg"),
            vec![
                Hotspot::navigation(0.0, 10.0, "Go to Hall", LocationId(1)),
                Hotspot::info(5.0, -20.0, "Reception"),
                fixed,
                Hotspot::navigation(0.0, 170.0, "Go to Yard", LocationId(3)),
            ],
        )
    }

    #[test]
    fn anchors_sit_inside_the_sphere() {
        let layer = HotspotLayer::new(&location(), 480.0);
        assert_eq!(layer.placed().len(), 3);
        for p in layer.placed() {
            assert!((p.anchor.norm() - 480.0).abs() < 1e-2);
        }
        assert_eq!(layer.fixed().len(), 1);
        assert_eq!(layer.fixed()[0].0, 2);
    }

    #[test]
    fn marker_styles_follow_kind() {
        let layer = HotspotLayer::new(&location(), 480.0);
        let styles: Vec<_> = layer.placed().iter().map(PlacedHotspot::style).collect();
        assert_eq!(
            styles,
            vec![MarkerStyle::Navigate, MarkerStyle::Info, MarkerStyle::Navigate]
        );
        assert_eq!(style_of(&layer.fixed()[0].1), MarkerStyle::Fixed);
    }

    #[test]
    fn clicks_navigate_only_from_navigation_and_fixed() {
        let layer = HotspotLayer::new(&location(), 480.0);
        assert_eq!(layer.click(0), Some(LocationId(1)));
        assert_eq!(layer.click(1), None);
        assert_eq!(layer.click(2), Some(LocationId(2)));
        assert_eq!(layer.click(99), None);
    }

    #[test]
    fn hover_is_exclusive() {
        let mut layer = HotspotLayer::new(&location(), 480.0);
        layer.pointer_hover(0);
        layer.pointer_hover(1);
        assert!(!layer.is_hovered(0));
        assert!(layer.is_hovered(1));
        assert_eq!(layer.tooltip(), Some("Reception"));

        // Leaving a hotspot that is not hovered changes nothing.
        layer.pointer_leave(0);
        assert_eq!(layer.hovered(), Some(1));
        layer.pointer_leave(1);
        assert_eq!(layer.hovered(), None);
        assert!(!layer.wants_pointer_cursor());
    }

    #[test]
    fn frame_sync_clears_stale_hover() {
        let mut layer = HotspotLayer::new(&location(), 480.0);
        layer.sync_hover(Some(3));
        assert!(layer.wants_pointer_cursor());
        layer.sync_hover(None);
        assert_eq!(layer.hovered(), None);
        layer.sync_hover(Some(42));
        assert_eq!(layer.hovered(), None);
    }

    #[test]
    fn only_hotspots_in_view_are_placed_on_screen() {
        let layer = HotspotLayer::new(&location(), 480.0);
        let pose = CameraPose::default();
        let proj = ViewProjection::new(vector![4096, 2048], vector![1600, 900], &pose, 0.0);
        let visible: Vec<_> = layer
            .screen_positions(&proj)
            .into_iter()
            .map(|(p, _)| p.index)
            .collect();
        assert_eq!(visible, vec![0, 1]);
    }

    #[test]
    fn markers_just_past_the_edge_are_reported_outside_the_frame() {
        // 110° hfov: the right edge sits at yaw 55.
        let edge = Location::new(
            LocationId(0),
            "Edge",
            ImageRef::new("edge.jpg"),
            vec![
                Hotspot::navigation(0.0, 56.0, "Just outside", LocationId(1)),
                Hotspot::navigation(0.0, 70.0, "Far outside", LocationId(1)),
            ],
        );
        let layer = HotspotLayer::new(&edge, 480.0);
        let proj = ViewProjection::new(
            vector![4096, 2048],
            vector![1600, 900],
            &CameraPose::default(),
            0.0,
        );
        let placed = layer.screen_positions(&proj);
        assert_eq!(placed.len(), 1);
        let (spot, pos) = placed[0];
        assert_eq!(spot.index, 0);
        assert!(pos.x > 1.0 && pos.x < 1.0 + VIEWPORT_MARGIN);
        assert!((pos.y - 0.5).abs() < 1e-3);
    }
}
