use std::{fs, sync::Arc};

use panotour::{
    hotspot::HotspotLayer, ConfigError, LocationId, Navigator, Tour, TourError,
};

const MAIN_HALL: &str = r#"{
    "start": 0,
    "locations": [
        {
            "id": 0,
            "title": "Main",
            "image": "main.jpg",
            "hotspots": [
                { "yaw": 14.89, "pitch": -0.28, "label": "Go to Hall",
                  "kind": { "type": "navigation", "target": 1 } },
                { "yaw": -38.5, "pitch": 1.65, "label": "Faculty parking" }
            ]
        },
        {
            "id": 1,
            "title": "Hall",
            "image": "panoramas/hall.jpg",
            "initial_yaw": 90,
            "auto_rotate": true,
            "hotspots": [
                { "yaw": -165.0, "pitch": 2.0, "label": "Go to Main",
                  "kind": { "type": "navigation", "target": 0 } }
            ]
        }
    ]
}"#;

fn write_tour(json: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tour.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

#[test]
fn click_through_and_go_home() {
    let (_dir, path) = write_tour(MAIN_HALL);
    let tour = Arc::new(Tour::load(&path).unwrap());
    let mut nav = Navigator::new(Arc::clone(&tour));
    assert_eq!(nav.current(), LocationId(0));

    let main = tour.location(nav.current()).unwrap();
    let layer = HotspotLayer::new(main, tour.viewer().hotspot_radius);
    let target = layer.click(0).unwrap();
    assert!(layer.click(1).is_none());

    nav.navigate(target).unwrap();
    assert_eq!(nav.current(), LocationId(1));
    assert_eq!(nav.history(), &[LocationId(0), LocationId(1)]);
    assert!(nav.can_go_back());

    nav.go_home(nav.home()).unwrap();
    assert_eq!(nav.history(), &[LocationId(0)]);
    assert!(!nav.can_go_back());

    let events = nav.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].history, vec![LocationId(0)]);
}

#[test]
fn graph_and_location_settings_come_from_the_file() {
    let (dir, path) = write_tour(MAIN_HALL);
    let tour = Tour::load(&path).unwrap();

    assert!(tour.graph().has_edge(LocationId(0), LocationId(1)));
    assert!(tour.graph().has_edge(LocationId(1), LocationId(0)));

    let hall = tour.location(LocationId(1)).unwrap();
    assert_eq!(hall.initial_yaw, 90.0);
    assert_eq!(hall.hfov, 110.0);
    assert!(hall.auto_rotate);
    assert_eq!(hall.image.path(), dir.path().join("panoramas/hall.jpg"));
}

#[test]
fn unknown_target_leaves_tour_state_alone() {
    let (_dir, path) = write_tour(MAIN_HALL);
    let mut nav = Navigator::new(Arc::new(Tour::load(&path).unwrap()));
    nav.navigate(LocationId(1)).unwrap();

    let err = nav.navigate(LocationId(999)).unwrap_err();
    assert!(matches!(err, TourError::InvalidTarget(LocationId(999))));
    assert_eq!(nav.current(), LocationId(1));
    assert_eq!(nav.history(), &[LocationId(0), LocationId(1)]);
}

#[test]
fn dangling_reference_fails_at_load() {
    let broken = MAIN_HALL.replace(r#""target": 0"#, r#""target": 5"#);
    let (_dir, path) = write_tour(&broken);
    let err = Tour::load(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DanglingTarget {
            location: LocationId(1),
            target: LocationId(5),
            ..
        }
    ));
}

#[test]
fn missing_and_malformed_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = Tour::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));

    let (_dir, path) = write_tour("{ \"start\": 0, ");
    assert!(matches!(Tour::load(&path).unwrap_err(), ConfigError::Parse(_)));
}

#[test]
fn bundled_campus_tour_is_valid() {
    let tour = Tour::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tours/campus.json")).unwrap();
    assert_eq!(tour.start(), LocationId(13));
    assert_eq!(tour.viewer().min_hfov, 40.0);

    let entrance = tour.start_location();
    let layer = HotspotLayer::new(entrance, tour.viewer().hotspot_radius);
    assert_eq!(layer.fixed().len(), 1);
    assert_eq!(layer.click(6), Some(LocationId(2)));
}

#[test]
fn bundled_panoramas_decode() {
    let tour = Tour::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tours/campus.json")).unwrap();
    for location in tour.locations() {
        let image = image::open(location.image.path()).unwrap();
        assert_eq!(image.width(), 2 * image.height(), "{}", location.image);
    }
}
