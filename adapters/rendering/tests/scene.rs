use glam::Vec2;
use path_planner_core::{Command, DisplayPoint, PathMode, Pose, Settings};
use path_planner_rendering::{MarkerRole, Palette, Presentation, Scene};
use path_planner_system_curve::PathCurveGenerator;
use path_planner_world::{self as world, query, World};

fn planned(settings: Settings, points: &[(f64, f64)]) -> World {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfigureSettings { settings }, &mut events);
    for &(x, y) in points {
        world::apply(
            &mut world,
            Command::PlaceWaypoint {
                point: DisplayPoint::new(x, y),
            },
            &mut events,
        );
    }
    world
}

fn compose(world: &World, pose: Option<Pose>) -> Scene {
    let settings = query::settings(world);
    let curve = PathCurveGenerator.generate(query::waypoints(world), settings.path_type);
    Scene::compose(
        query::mapper(world),
        query::waypoints(world),
        settings,
        &curve,
        pose,
    )
    .expect("valid settings compose")
}

#[test]
fn default_scene_lists_every_layer() {
    let world = planned(
        Settings::default(),
        &[(0.0, 600.0), (400.0, 300.0), (800.0, 300.0)],
    );
    let scene = compose(&world, Some(query::waypoints(&world)[1].pose()));

    assert_eq!(scene.size, Vec2::new(800.0, 600.0));
    assert_eq!(scene.grid_lines.len(), 41 + 31);
    assert_eq!(scene.axis_labels.len(), 18);
    assert_eq!(scene.arrows.len(), 2);

    let path = scene.path.as_ref().expect("path drawn for two or more waypoints");
    assert_eq!(path.points.len(), 2 * 21);
    assert_eq!(path.thickness, 4.0);

    let roles: Vec<MarkerRole> = scene.markers.iter().map(|marker| marker.role).collect();
    assert_eq!(roles, vec![MarkerRole::Start, MarkerRole::Interior, MarkerRole::End]);
    let label = scene.markers[1].label.as_ref().expect("coordinates shown");
    assert_eq!(label.text, "(7.00, 4.00)");
    assert_eq!(label.position, Vec2::new(410.0, 280.0));
    assert_eq!(scene.markers[1].radius, 9.0);

    let agent = scene.agent.expect("agent shown for a pose");
    assert_eq!(agent.position, Vec2::new(400.0, 300.0));
}

#[test]
fn toggles_hide_optional_layers() {
    let world = planned(
        Settings {
            show_grid: false,
            show_coordinates: false,
            show_direction_arrows: false,
            path_type: PathMode::Linear,
            ..Settings::default()
        },
        &[(100.0, 100.0), (300.0, 100.0)],
    );
    let scene = compose(&world, None);

    assert!(scene.grid_lines.is_empty());
    assert!(scene.axis_labels.is_empty());
    assert!(scene.arrows.is_empty());
    assert!(scene.markers.iter().all(|marker| marker.label.is_none()));
    assert_eq!(scene.path.map(|path| path.points.len()), Some(2));
    assert!(scene.agent.is_none());
}

#[test]
fn single_waypoint_has_no_path() {
    let world = planned(Settings::default(), &[(100.0, 100.0)]);
    let scene = compose(&world, None);

    assert!(scene.path.is_none());
    assert_eq!(scene.markers.len(), 1);
    assert_eq!(scene.markers[0].role, MarkerRole::Start);
}

#[test]
fn presentation_carries_palette_colors_per_role() {
    let world = planned(Settings::default(), &[(100.0, 100.0), (300.0, 100.0)]);
    let palette = Palette::default();
    let presentation = Presentation::new("planner", palette, compose(&world, None));

    assert_eq!(presentation.title, "planner");
    assert_ne!(
        presentation.palette.marker(MarkerRole::Start),
        presentation.palette.marker(MarkerRole::End)
    );
}
