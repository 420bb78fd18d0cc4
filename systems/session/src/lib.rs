#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Coordinator that owns the world and the playback engine of one planning
//! session and routes user intents between them.
//!
//! All waypoint mutations travel through [`world::apply`]; the resulting
//! events are fed to the simulation so that clearing or replacing the path
//! cancels playback. Editing is locked while playback runs and unlocked on
//! pause, reset, completion or abort.

use path_planner_core::{
    Command, CoordinateMapper, DisplayPoint, EditError, Event, FieldDimensions, FieldPoint,
    Pose, Settings, Waypoint,
};
use path_planner_snapshot::{Snapshot, SnapshotError};
use path_planner_system_curve::PathCurveGenerator;
use path_planner_system_export::program_text;
use path_planner_system_simulation::{
    SimulationEngine, SimulationError, SimulationState, TickOutcome,
};
use path_planner_world::{self as world, query, World};

/// One interactive planning session.
#[derive(Debug)]
pub struct Session {
    world: World,
    simulation: SimulationEngine,
    curve: PathCurveGenerator,
}

impl Session {
    /// Creates an empty session bound to the provided field dimensions.
    #[must_use]
    pub fn new(dimensions: FieldDimensions) -> Self {
        Self {
            world: World::new(dimensions),
            simulation: SimulationEngine::new(),
            curve: PathCurveGenerator,
        }
    }

    /// Waypoints in sequence order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        query::waypoints(&self.world)
    }

    /// Settings currently in effect.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        query::settings(&self.world)
    }

    /// Mapper between display and field units.
    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        query::mapper(&self.world)
    }

    /// Observable playback state.
    #[must_use]
    pub fn simulation(&self) -> &SimulationState {
        self.simulation.state()
    }

    /// Appends a waypoint at a raw pointer location and returns its index.
    pub fn place_waypoint(&mut self, point: DisplayPoint) -> Result<usize, EditError> {
        rejection(&self.dispatch(Command::PlaceWaypoint { point }))?;
        Ok(query::waypoints(&self.world).len().saturating_sub(1))
    }

    /// Drags the waypoint at `index` to a raw pointer location.
    pub fn move_waypoint(
        &mut self,
        index: usize,
        point: DisplayPoint,
    ) -> Result<Waypoint, EditError> {
        rejection(&self.dispatch(Command::MoveWaypoint { index, point }))?;
        let store = query::waypoint_store(&self.world);
        store.get(index).copied().ok_or(EditError::MissingWaypoint {
            index,
            len: store.len(),
        })
    }

    /// Removes the final waypoint. Returns `false` when there was none.
    pub fn undo_waypoint(&mut self) -> Result<bool, EditError> {
        let events = self.dispatch(Command::RemoveLastWaypoint);
        rejection(&events)?;
        Ok(events
            .iter()
            .any(|event| matches!(event, Event::WaypointRemoved { .. })))
    }

    /// Removes every waypoint and stops any playback.
    pub fn clear_waypoints(&mut self) {
        let _ = self.dispatch(Command::ClearWaypoints);
    }

    /// Replaces the active settings after validating them.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), EditError> {
        rejection(&self.dispatch(Command::ConfigureSettings { settings }))
    }

    /// Starts or resumes playback and locks editing.
    ///
    /// Returns `false` when fewer than two waypoints exist or playback is
    /// already running.
    pub fn start(&mut self) -> bool {
        let started = self.simulation.start(query::waypoints(&self.world));
        if started {
            tracing::debug!(
                progress = self.simulation.state().progress,
                "simulation running"
            );
            let _ = self.dispatch(Command::SetPlaybackActive { active: true });
        }
        started
    }

    /// Pauses playback and unlocks editing.
    pub fn pause(&mut self) -> bool {
        let paused = self.simulation.pause();
        if paused {
            tracing::debug!(
                progress = self.simulation.state().progress,
                "simulation paused"
            );
            let _ = self.dispatch(Command::SetPlaybackActive { active: false });
        }
        paused
    }

    /// Returns playback to idle and unlocks editing.
    pub fn reset(&mut self) {
        self.simulation.reset();
        tracing::debug!("simulation reset");
        let _ = self.dispatch(Command::SetPlaybackActive { active: false });
    }

    /// Sets the playback speed multiplier.
    pub fn set_speed_multiplier(&mut self, value: f64) -> Result<(), SimulationError> {
        self.simulation.set_speed_multiplier(value)
    }

    /// Raises the speed by one slider step.
    pub fn increase_speed(&mut self) -> f64 {
        self.simulation.increase_speed()
    }

    /// Lowers the speed by one slider step.
    pub fn decrease_speed(&mut self) -> f64 {
        self.simulation.decrease_speed()
    }

    /// Advances playback by one scheduling tick.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.simulation.tick(query::waypoints(&self.world));
        match outcome {
            TickOutcome::Completed(pose) => {
                tracing::debug!(
                    x = pose.position.x,
                    y = pose.position.y,
                    "simulation completed"
                );
                let _ = self.dispatch(Command::SetPlaybackActive { active: false });
            }
            TickOutcome::Aborted => {
                tracing::warn!("simulation aborted, fewer than two waypoints remain");
                let _ = self.dispatch(Command::SetPlaybackActive { active: false });
            }
            TickOutcome::Skipped | TickOutcome::Advanced(_) => {}
        }
        outcome
    }

    /// Polyline previewing the path in the active path mode.
    #[must_use]
    pub fn curve(&self) -> Vec<DisplayPoint> {
        self.curve.generate(
            query::waypoints(&self.world),
            query::settings(&self.world).path_type,
        )
    }

    /// Agent pose in display units, absent while idle.
    #[must_use]
    pub fn pose(&self) -> Option<Pose> {
        self.simulation.pose()
    }

    /// Agent position converted to field units.
    #[must_use]
    pub fn pose_in_field(&self) -> Option<FieldPoint> {
        self.simulation
            .pose()
            .map(|pose| query::mapper(&self.world).to_field(pose.position))
    }

    /// Serialises the waypoints and settings as snapshot JSON.
    pub fn save_snapshot(&self) -> Result<String, SnapshotError> {
        let snapshot = Snapshot::capture(
            query::waypoints(&self.world),
            query::settings(&self.world),
        );
        let json = snapshot.to_json()?;
        tracing::info!(waypoints = snapshot.waypoints.len(), "snapshot saved");
        Ok(json)
    }

    /// Replaces the session contents with a snapshot and returns the number of
    /// waypoints loaded.
    ///
    /// Playback is reset first. A malformed snapshot leaves the session
    /// untouched.
    pub fn load_snapshot(&mut self, text: &str) -> Result<usize, SnapshotError> {
        let snapshot = match Snapshot::from_json(text, query::settings(&self.world)) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "rejected malformed snapshot");
                return Err(error);
            }
        };
        let (waypoints, settings) = snapshot.restore(query::mapper(&self.world));
        let count = waypoints.len();

        self.reset();
        let _ = self.dispatch(Command::ConfigureSettings { settings });
        let _ = self.dispatch(Command::ReplaceWaypoints { waypoints });
        tracing::info!(waypoints = count, "snapshot loaded");
        Ok(count)
    }

    /// Control-script text for the current path, absent below two waypoints.
    #[must_use]
    pub fn export_program(&self) -> Option<String> {
        program_text(query::waypoints(&self.world))
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        tracing::debug!(?command, "routing command");
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.simulation.handle(&events);
        for event in &events {
            if let Event::EditRejected { reason } = event {
                tracing::warn!(%reason, "edit rejected");
            }
        }
        events
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FieldDimensions::default())
    }
}

fn rejection(events: &[Event]) -> Result<(), EditError> {
    match events.iter().find_map(|event| match event {
        Event::EditRejected { reason } => Some(*reason),
        _ => None,
    }) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_on_empty_session_reports_nothing_removed() {
        let mut session = Session::default();
        assert_eq!(session.undo_waypoint(), Ok(false));
    }

    #[test]
    fn rejection_surfaces_the_reason() {
        let events = [
            Event::PlaybackLockChanged { active: true },
            Event::EditRejected {
                reason: EditError::SimulationRunning,
            },
        ];
        assert_eq!(rejection(&events), Err(EditError::SimulationRunning));
        assert_eq!(rejection(&events[..1]), Ok(()));
    }
}
