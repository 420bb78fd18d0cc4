#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic playback system that advances a virtual agent along the
//! waypoint sequence one scheduling tick at a time.
//!
//! The engine never reads a clock. A cooperative scheduler (or a test) calls
//! [`SimulationEngine::tick`] at a fixed cadence and every call re-checks the
//! current phase, so ticks that arrive after a pause or reset are no-ops.

use path_planner_core::{heading_between, Event, Pose, Waypoint};
use thiserror::Error;

/// Progress advanced per tick at a speed multiplier of one, in index units.
pub const BASE_STEP_RATE: f64 = 0.5;

/// Lower bound of the stepped speed control.
pub const MIN_STEPPED_SPEED: f64 = 0.1;

/// Upper bound of the stepped speed control.
pub const MAX_STEPPED_SPEED: f64 = 1.0;

/// Increment applied by the stepped speed control.
pub const SPEED_STEP: f64 = 0.1;

/// Lifecycle phase of the playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationPhase {
    /// Nothing has been played since the last reset.
    #[default]
    Idle,
    /// Ticks advance progress.
    Running,
    /// Playback halted mid-way; `start` resumes.
    Paused,
    /// Progress reached the final waypoint.
    Completed,
}

/// Observable playback state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    /// Current lifecycle phase.
    pub phase: SimulationPhase,
    /// Continuous index into the waypoint sequence.
    pub progress: f64,
    /// Multiplier applied to [`BASE_STEP_RATE`] each tick.
    pub speed_multiplier: f64,
    /// Latest interpolated pose, absent while idle.
    pub pose: Option<Pose>,
}

impl SimulationState {
    /// Reports whether ticks currently advance progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == SimulationPhase::Running
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            phase: SimulationPhase::Idle,
            progress: 0.0,
            speed_multiplier: 1.0,
            pose: None,
        }
    }
}

/// Result of a single scheduling tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Skipped,
    /// Progress advanced to a new interpolated pose.
    Advanced(Pose),
    /// Progress reached the final waypoint and playback stopped.
    Completed(Pose),
    /// The sequence shrank below two waypoints and playback stopped.
    Aborted,
}

/// Errors raised by playback controls.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// Speed multipliers must be positive and finite.
    #[error("speed multiplier must be positive and finite (received {value})")]
    InvalidSpeed {
        /// Rejected multiplier.
        value: f64,
    },
}

/// Playback state machine driven by explicit ticks.
#[derive(Clone, Debug, Default)]
pub struct SimulationEngine {
    state: SimulationState,
}

impl SimulationEngine {
    /// Creates an idle engine with a unit speed multiplier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SimulationPhase {
        self.state.phase
    }

    /// Reports whether ticks currently advance progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Latest interpolated pose.
    #[must_use]
    pub fn pose(&self) -> Option<Pose> {
        self.state.pose
    }

    /// Starts or resumes playback.
    ///
    /// Requires at least two waypoints; otherwise, or when already running,
    /// nothing changes and `false` is returned. A paused run resumes from its
    /// progress; idle or completed runs restart at the first waypoint.
    pub fn start(&mut self, waypoints: &[Waypoint]) -> bool {
        if waypoints.len() < 2 || self.state.is_running() {
            return false;
        }

        if self.state.phase != SimulationPhase::Paused {
            self.state.progress = 0.0;
            self.state.pose = Some(waypoints[0].pose());
        }
        self.state.phase = SimulationPhase::Running;
        true
    }

    /// Halts a running playback, keeping its progress.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.phase = SimulationPhase::Paused;
        true
    }

    /// Returns to idle from any phase. The speed multiplier is kept.
    pub fn reset(&mut self) {
        self.state = SimulationState {
            speed_multiplier: self.state.speed_multiplier,
            ..SimulationState::default()
        };
    }

    /// Sets the speed multiplier used from the next tick on.
    pub fn set_speed_multiplier(&mut self, value: f64) -> Result<(), SimulationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(SimulationError::InvalidSpeed { value });
        }
        self.state.speed_multiplier = value;
        Ok(())
    }

    /// Raises the multiplier by one step, capped at [`MAX_STEPPED_SPEED`].
    pub fn increase_speed(&mut self) -> f64 {
        self.step_speed(SPEED_STEP)
    }

    /// Lowers the multiplier by one step, floored at [`MIN_STEPPED_SPEED`].
    pub fn decrease_speed(&mut self) -> f64 {
        self.step_speed(-SPEED_STEP)
    }

    /// Advances playback by one scheduling tick.
    pub fn tick(&mut self, waypoints: &[Waypoint]) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Skipped;
        }

        let Some(last_index) = waypoints.len().checked_sub(1).filter(|last| *last > 0) else {
            self.reset();
            return TickOutcome::Aborted;
        };
        let end = last_index as f64;

        let progress = self.state.progress + BASE_STEP_RATE * self.state.speed_multiplier;
        if progress >= end {
            let pose = waypoints[last_index].pose();
            self.state.progress = end;
            self.state.pose = Some(pose);
            self.state.phase = SimulationPhase::Completed;
            return TickOutcome::Completed(pose);
        }

        let current = progress.floor() as usize;
        let next = (current + 1).min(last_index);
        let fraction = progress - current as f64;
        let from = waypoints[current].display();
        let to = waypoints[next].display();
        let pose = Pose::new(from.lerp(to, fraction), heading_between(from, to));

        self.state.progress = progress;
        self.state.pose = Some(pose);
        TickOutcome::Advanced(pose)
    }

    /// Reacts to world events that invalidate the current playback.
    pub fn handle(&mut self, events: &[Event]) {
        if events.iter().any(|event| {
            matches!(
                event,
                Event::WaypointsCleared | Event::WaypointsReplaced { .. }
            )
        }) {
            self.reset();
        }
    }

    fn step_speed(&mut self, delta: f64) -> f64 {
        let stepped = ((self.state.speed_multiplier + delta) / SPEED_STEP).round() * SPEED_STEP;
        self.state.speed_multiplier = stepped.clamp(MIN_STEPPED_SPEED, MAX_STEPPED_SPEED);
        self.state.speed_multiplier
    }
}
