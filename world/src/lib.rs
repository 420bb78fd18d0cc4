#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative planning state: the waypoint sequence, the coordinate
//! mapper and the active settings.

mod waypoints;

pub use waypoints::WaypointStore;

use path_planner_core::{Command, CoordinateMapper, EditError, Event, FieldDimensions, Settings};

/// Represents the authoritative planning state of a session.
#[derive(Debug)]
pub struct World {
    mapper: CoordinateMapper,
    waypoints: WaypointStore,
    settings: Settings,
    playback_active: bool,
}

impl World {
    /// Creates an empty world bound to the provided field dimensions.
    #[must_use]
    pub fn new(dimensions: FieldDimensions) -> Self {
        Self {
            mapper: CoordinateMapper::new(dimensions),
            waypoints: WaypointStore::new(),
            settings: Settings::default(),
            playback_active: false,
        }
    }

    fn reject_while_running(&self, out_events: &mut Vec<Event>) -> bool {
        if self.playback_active {
            out_events.push(Event::EditRejected {
                reason: EditError::SimulationRunning,
            });
        }
        self.playback_active
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(FieldDimensions::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Waypoint edits are refused with [`EditError::SimulationRunning`] while
/// playback is active; settings may change at any time.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSettings { settings } => match settings.validate() {
            Ok(()) => {
                world.settings = settings;
                out_events.push(Event::SettingsChanged { settings });
            }
            Err(error) => out_events.push(Event::EditRejected {
                reason: error.into(),
            }),
        },
        Command::PlaceWaypoint { point } => {
            if world.reject_while_running(out_events) {
                return;
            }
            let snap = world.settings.snap_cell();
            let index = world.waypoints.append(point, snap, &world.mapper);
            if let Some(waypoint) = world.waypoints.get(index) {
                out_events.push(Event::WaypointPlaced {
                    index,
                    waypoint: *waypoint,
                });
            }
        }
        Command::MoveWaypoint { index, point } => {
            if world.reject_while_running(out_events) {
                return;
            }
            let snap = world.settings.snap_cell();
            match world.waypoints.move_at(index, point, snap, &world.mapper) {
                Ok(waypoint) => out_events.push(Event::WaypointMoved { index, waypoint }),
                Err(reason) => out_events.push(Event::EditRejected { reason }),
            }
        }
        Command::RemoveLastWaypoint => {
            if world.reject_while_running(out_events) {
                return;
            }
            if world.waypoints.remove_last().is_some() {
                out_events.push(Event::WaypointRemoved {
                    index: world.waypoints.len(),
                });
            }
        }
        Command::ClearWaypoints => {
            world.waypoints.clear();
            world.playback_active = false;
            out_events.push(Event::WaypointsCleared);
        }
        Command::ReplaceWaypoints { waypoints } => {
            if world.reject_while_running(out_events) {
                return;
            }
            let count = waypoints.len();
            world.waypoints.replace(waypoints);
            out_events.push(Event::WaypointsReplaced { count });
        }
        Command::SetPlaybackActive { active } => {
            if world.playback_active != active {
                world.playback_active = active;
                out_events.push(Event::PlaybackLockChanged { active });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{World, WaypointStore};
    use path_planner_core::{CoordinateMapper, Settings, Waypoint};

    /// Mapper converting between display and field coordinates.
    #[must_use]
    pub fn mapper(world: &World) -> &CoordinateMapper {
        &world.mapper
    }

    /// Waypoints in sequence order.
    #[must_use]
    pub fn waypoints(world: &World) -> &[Waypoint] {
        world.waypoints.as_slice()
    }

    /// Underlying waypoint store.
    #[must_use]
    pub fn waypoint_store(world: &World) -> &WaypointStore {
        &world.waypoints
    }

    /// Settings currently in effect.
    #[must_use]
    pub fn settings(world: &World) -> &Settings {
        &world.settings
    }

    /// Reports whether editing is locked by a running simulation.
    #[must_use]
    pub fn is_playback_active(world: &World) -> bool {
        world.playback_active
    }
}
