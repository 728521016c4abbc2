pub mod camera;
pub mod config;
pub mod error;
pub mod graph;
pub mod hotspot;
pub mod loader;
pub mod navigation;
pub mod projection;
pub mod redraw;
pub mod render;
pub mod scene;
pub mod tour;

pub use error::{ConfigError, TourError};
pub use navigation::{NavigationEvent, Navigator};
pub use scene::{PanoramaScene, SceneEvent};
pub use tour::{Hotspot, HotspotKind, Location, LocationId, Tour};
