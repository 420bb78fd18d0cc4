use path_planner_core::{heading_between, Command, DisplayPoint, Pose, Settings, Waypoint};
use path_planner_system_simulation::{SimulationEngine, SimulationPhase, TickOutcome};
use path_planner_world::{self as world, query, World};

fn world_with(points: &[(f64, f64)]) -> World {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSettings {
            settings: Settings {
                snap_to_grid: false,
                ..Settings::default()
            },
        },
        &mut events,
    );
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

fn square() -> World {
    world_with(&[(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)])
}

fn run_to_completion(engine: &mut SimulationEngine, waypoints: &[Waypoint]) -> Vec<TickOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..1_000 {
        let outcome = engine.tick(waypoints);
        outcomes.push(outcome);
        if !matches!(outcome, TickOutcome::Advanced(_)) {
            break;
        }
    }
    outcomes
}

#[test]
fn four_waypoints_complete_after_six_ticks() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));

    let mut previous = engine.state().progress;
    let mut ticks = 0;
    while engine.is_running() {
        let _ = engine.tick(waypoints);
        ticks += 1;
        let progress = engine.state().progress;
        assert!(progress > previous, "progress must strictly increase");
        previous = progress;
    }

    assert_eq!(ticks, 6);
    assert_eq!(engine.state().progress, 3.0);
    assert_eq!(engine.phase(), SimulationPhase::Completed);
    assert_eq!(engine.pose(), Some(waypoints[3].pose()));
}

#[test]
fn poses_interpolate_within_segments_and_snap_heading() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));

    assert_eq!(
        engine.tick(waypoints),
        TickOutcome::Advanced(Pose::new(DisplayPoint::new(200.0, 100.0), 0.0))
    );
    assert_eq!(
        engine.tick(waypoints),
        TickOutcome::Advanced(Pose::new(
            DisplayPoint::new(300.0, 100.0),
            heading_between(waypoints[1].display(), waypoints[2].display())
        ))
    );

    let TickOutcome::Advanced(pose) = engine.tick(waypoints) else {
        panic!("expected an advanced pose");
    };
    assert_eq!(pose.position, DisplayPoint::new(300.0, 200.0));
    assert!((pose.heading - 90.0).abs() < 1e-9);
}

#[test]
fn ticks_after_pause_are_ignored_and_start_resumes() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));
    let _ = engine.tick(waypoints);
    let _ = engine.tick(waypoints);

    assert!(engine.pause());
    let paused = *engine.state();
    assert_eq!(engine.tick(waypoints), TickOutcome::Skipped);
    assert_eq!(*engine.state(), paused);

    assert!(engine.start(waypoints));
    assert_eq!(engine.phase(), SimulationPhase::Running);
    assert_eq!(engine.state().progress, 1.0);
    let _ = engine.tick(waypoints);
    assert_eq!(engine.state().progress, 1.5);
}

#[test]
fn ticks_after_reset_are_ignored() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));
    let _ = engine.tick(waypoints);

    engine.reset();

    assert_eq!(engine.tick(waypoints), TickOutcome::Skipped);
    assert_eq!(engine.phase(), SimulationPhase::Idle);
    assert_eq!(engine.state().progress, 0.0);
    assert!(engine.pose().is_none());
}

#[test]
fn speed_changes_apply_on_next_tick() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));
    let _ = engine.tick(waypoints);

    engine
        .set_speed_multiplier(0.2)
        .expect("positive multiplier");
    let _ = engine.tick(waypoints);

    assert!((engine.state().progress - 0.6).abs() < 1e-12);
}

#[test]
fn completed_playback_restarts_from_the_beginning() {
    let world = square();
    let waypoints = query::waypoints(&world);
    let mut engine = SimulationEngine::new();
    assert!(engine.start(waypoints));
    let outcomes = run_to_completion(&mut engine, waypoints);
    assert!(matches!(outcomes.last(), Some(TickOutcome::Completed(_))));
    assert_eq!(engine.tick(waypoints), TickOutcome::Skipped);

    assert!(engine.start(waypoints));
    assert_eq!(engine.state().progress, 0.0);
    assert_eq!(engine.pose(), Some(waypoints[0].pose()));
}

#[test]
fn playback_is_deterministic_across_replays() {
    let world = world_with(&[
        (40.0, 560.0),
        (220.0, 420.0),
        (380.0, 460.0),
        (620.0, 120.0),
        (760.0, 60.0),
    ]);
    let waypoints = query::waypoints(&world);

    let replay = || {
        let mut engine = SimulationEngine::new();
        engine
            .set_speed_multiplier(0.3)
            .expect("positive multiplier");
        assert!(engine.start(waypoints));
        run_to_completion(&mut engine, waypoints)
    };

    let first = replay();
    let second = replay();
    assert_eq!(first, second);
    assert_eq!(first.len(), 27);
    assert_eq!(
        first.last(),
        Some(&TickOutcome::Completed(waypoints[4].pose()))
    );
}
