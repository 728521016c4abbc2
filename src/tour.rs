//! Static tour table: locations, their hotspots, and the file format they are
//! read from.

use std::{
    collections::HashMap,
    fmt,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    config::ViewerConfig,
    error::ConfigError,
    graph::LocationGraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an equirectangular panorama on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    fn resolve_against(&mut self, base: &Path) {
        if self.0.is_relative() {
            self.0 = base.join(&self.0);
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotspotKind {
    /// Moves the tour to `target` when clicked.
    Navigation { target: LocationId },
    /// Shows its message on hover, never changes location.
    Info {
        #[serde(default)]
        message: Option<String>,
    },
    /// Drawn at a constant screen position instead of in the scene.
    Fixed {
        #[serde(default)]
        target: Option<LocationId>,
    },
}

impl Default for HotspotKind {
    fn default() -> Self {
        HotspotKind::Info { message: None }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hotspot {
    pub yaw: f32,
    pub pitch: f32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: HotspotKind,
}

impl Hotspot {
    pub fn navigation(pitch: f32, yaw: f32, label: &str, target: LocationId) -> Self {
        Self {
            yaw,
            pitch,
            label: label.to_string(),
            kind: HotspotKind::Navigation { target },
        }
    }

    pub fn info(pitch: f32, yaw: f32, label: &str) -> Self {
        Self {
            yaw,
            pitch,
            label: label.to_string(),
            kind: HotspotKind::default(),
        }
    }

    /// Location this hotspot leads to, if any.
    pub fn target(&self) -> Option<LocationId> {
        match self.kind {
            HotspotKind::Navigation { target } => Some(target),
            HotspotKind::Fixed { target } => target,
            HotspotKind::Info { .. } => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, HotspotKind::Fixed { .. })
    }

    /// Text revealed on hover.
    pub fn message(&self) -> &str {
        match &self.kind {
            HotspotKind::Info {
                message: Some(message),
            } => message,
            _ => &self.label,
        }
    }
}

fn default_hfov() -> f32 {
    110.0
}

fn default_auto_rotate_speed() -> f32 {
    0.005
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: ImageRef,
    #[serde(default)]
    pub initial_pitch: f32,
    #[serde(default)]
    pub initial_yaw: f32,
    #[serde(default = "default_hfov")]
    pub hfov: f32,
    #[serde(default)]
    pub auto_rotate: bool,
    /// Radians per second.
    #[serde(default = "default_auto_rotate_speed")]
    pub auto_rotate_speed: f32,
    #[serde(default, rename = "hotspots")]
    pub hot_spots: Vec<Hotspot>,
}

impl Location {
    pub fn new(id: LocationId, title: &str, image: ImageRef, hot_spots: Vec<Hotspot>) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: None,
            image,
            initial_pitch: 0.0,
            initial_yaw: 0.0,
            hfov: default_hfov(),
            auto_rotate: false,
            auto_rotate_speed: default_auto_rotate_speed(),
            hot_spots,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TourFile {
    start: LocationId,
    #[serde(default)]
    viewer: ViewerConfig,
    locations: Vec<Location>,
}

/// A validated tour. Immutable for the whole session.
#[derive(Debug)]
pub struct Tour {
    start: LocationId,
    viewer: ViewerConfig,
    locations: Vec<Location>,
    index: HashMap<LocationId, usize>,
    graph: LocationGraph,
}

impl Tour {
    /// Reads and validates a tour file. Relative image paths are resolved
    /// against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file: TourFile = serde_json::from_str(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for location in &mut file.locations {
            location.image.resolve_against(base);
        }

        let tour = Self::new(file.start, file.viewer, file.locations)?;
        log::info!(
            "loaded tour {} ({} locations, start {})",
            path.display(),
            tour.locations.len(),
            tour.start
        );
        Ok(tour)
    }

    pub fn new(
        start: LocationId,
        viewer: ViewerConfig,
        locations: Vec<Location>,
    ) -> Result<Self, ConfigError> {
        viewer.validate()?;
        if locations.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut index = HashMap::with_capacity(locations.len());
        for (i, location) in locations.iter().enumerate() {
            if index.insert(location.id, i).is_some() {
                return Err(ConfigError::DuplicateId(location.id));
            }
        }

        for location in &locations {
            for (i, spot) in location.hot_spots.iter().enumerate() {
                let yaw_ok = spot.yaw > -180.0 && spot.yaw <= 180.0;
                let pitch_ok = spot.pitch > -90.0 && spot.pitch < 90.0;
                if !(yaw_ok && pitch_ok) {
                    return Err(ConfigError::AngleOutOfRange {
                        location: location.id,
                        hotspot: i,
                        yaw: spot.yaw,
                        pitch: spot.pitch,
                    });
                }
                if let Some(target) = spot.target() {
                    if !index.contains_key(&target) {
                        return Err(ConfigError::DanglingTarget {
                            location: location.id,
                            hotspot: i,
                            target,
                        });
                    }
                }
            }
        }

        if !index.contains_key(&start) {
            return Err(ConfigError::UnknownStart(start));
        }

        let graph = LocationGraph::from_locations(&locations);
        let unreachable = graph.unreachable_from(start, index.keys().copied());
        if !unreachable.is_empty() {
            log::warn!(
                "locations {:?} cannot be reached through hotspots from {}",
                unreachable,
                start
            );
        }

        Ok(Self {
            start,
            viewer,
            locations,
            index,
            graph,
        })
    }

    /// Same tour starting somewhere else.
    pub fn with_start(mut self, start: LocationId) -> Result<Self, ConfigError> {
        if !self.contains(start) {
            return Err(ConfigError::UnknownStart(start));
        }
        self.start = start;
        Ok(self)
    }

    pub fn start(&self) -> LocationId {
        self.start
    }

    pub fn start_location(&self) -> &Location {
        &self.locations[self.index[&self.start]]
    }

    pub fn viewer(&self) -> &ViewerConfig {
        &self.viewer
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.index.get(&id).map(|&i| &self.locations[i])
    }

    /// Locations in table order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }
}
