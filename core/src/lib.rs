#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the path planner.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative world, and the pure systems. Adapters submit
//! [`Command`] values describing desired waypoint or settings mutations, the
//! world executes them via its `apply` entry point and broadcasts [`Event`]
//! values, and systems (simulation, curve generation, export) consume
//! immutable waypoint slices.

mod mapping;

pub use mapping::{AxisTick, CoordinateMapper, TickAxis};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speed factor assigned to newly placed waypoints.
pub const DEFAULT_SPEED_FACTOR: f64 = 1.0;

/// Point expressed in display units, Y growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, increasing toward the bottom of the display.
    pub y: f64,
}

impl DisplayPoint {
    /// Creates a new display-space point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds both coordinates to the nearest multiple of `cell`.
    #[must_use]
    pub fn snapped(self, cell: f64) -> Self {
        Self {
            x: (self.x / cell).round() * cell,
            y: (self.y / cell).round() * cell,
        }
    }

    /// Linear interpolation toward `other` by `fraction`.
    #[must_use]
    pub fn lerp(self, other: Self, fraction: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
        }
    }

    /// Euclidean distance to `other` in display units.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Point expressed in field units, Y growing away from the near edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, increasing away from the near edge.
    pub y: f64,
}

impl FieldPoint {
    /// Creates a new field-space point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Direction from `from` toward `to` in degrees, measured in display space.
///
/// Zero points along +X; positive angles turn toward +Y (clockwise on screen).
/// Coincident points yield zero.
#[must_use]
pub fn heading_between(from: DisplayPoint, to: DisplayPoint) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Sizes of the display surface and the physical field it depicts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDimensions")]
pub struct FieldDimensions {
    display_width: f64,
    display_height: f64,
    field_width: f64,
    field_height: f64,
}

impl FieldDimensions {
    /// Creates a dimension set, rejecting non-positive or non-finite values.
    pub fn new(
        display_width: f64,
        display_height: f64,
        field_width: f64,
        field_height: f64,
    ) -> Result<Self, DimensionError> {
        for (name, value) in [
            ("display_width", display_width),
            ("display_height", display_height),
            ("field_width", field_width),
            ("field_height", field_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DimensionError::NonPositive { name, value });
            }
        }

        Ok(Self {
            display_width,
            display_height,
            field_width,
            field_height,
        })
    }

    /// Width of the display surface in display units.
    #[must_use]
    pub const fn display_width(&self) -> f64 {
        self.display_width
    }

    /// Height of the display surface in display units.
    #[must_use]
    pub const fn display_height(&self) -> f64 {
        self.display_height
    }

    /// Width of the physical field in field units.
    #[must_use]
    pub const fn field_width(&self) -> f64 {
        self.field_width
    }

    /// Height of the physical field in field units.
    #[must_use]
    pub const fn field_height(&self) -> f64 {
        self.field_height
    }
}

#[derive(Deserialize)]
struct RawFieldDimensions {
    display_width: f64,
    display_height: f64,
    field_width: f64,
    field_height: f64,
}

impl TryFrom<RawFieldDimensions> for FieldDimensions {
    type Error = DimensionError;

    fn try_from(raw: RawFieldDimensions) -> Result<Self, Self::Error> {
        Self::new(
            raw.display_width,
            raw.display_height,
            raw.field_width,
            raw.field_height,
        )
    }
}

impl Default for FieldDimensions {
    fn default() -> Self {
        Self {
            display_width: 800.0,
            display_height: 600.0,
            field_width: 14.0,
            field_height: 8.0,
        }
    }
}

/// Reasons a [`FieldDimensions`] value may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum DimensionError {
    /// A dimension was zero, negative, or not a finite number.
    #[error("{name} must be a positive finite value (received {value})")]
    NonPositive {
        /// Name of the offending dimension.
        name: &'static str,
        /// Value that failed validation.
        value: f64,
    },
}

/// User-placed target point stored in both coordinate spaces.
///
/// The display and field points always describe the same location: a waypoint
/// can only be created or relocated through a [`CoordinateMapper`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    display: DisplayPoint,
    field: FieldPoint,
    heading: f64,
    speed_factor: f64,
}

impl Waypoint {
    /// Creates a waypoint from a display-space location.
    #[must_use]
    pub fn from_display(display: DisplayPoint, mapper: &CoordinateMapper, heading: f64) -> Self {
        Self {
            display,
            field: mapper.to_field(display),
            heading,
            speed_factor: DEFAULT_SPEED_FACTOR,
        }
    }

    /// Creates a waypoint from a field-space location, deriving its display point.
    ///
    /// Negative speed factors are clamped to zero.
    #[must_use]
    pub fn from_field(
        field: FieldPoint,
        mapper: &CoordinateMapper,
        heading: f64,
        speed_factor: f64,
    ) -> Self {
        Self {
            display: mapper.to_display(field),
            field,
            heading,
            speed_factor: speed_factor.max(0.0),
        }
    }

    /// Location in display units.
    #[must_use]
    pub const fn display(&self) -> DisplayPoint {
        self.display
    }

    /// Location in field units.
    #[must_use]
    pub const fn field(&self) -> FieldPoint {
        self.field
    }

    /// Heading in degrees toward the next waypoint.
    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Non-negative speed multiplier attached to the waypoint.
    #[must_use]
    pub const fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Moves the waypoint, updating both coordinate representations together.
    pub fn relocate(&mut self, display: DisplayPoint, mapper: &CoordinateMapper) {
        self.display = display;
        self.field = mapper.to_field(display);
    }

    /// Overwrites the derived heading.
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = heading;
    }

    /// Pose of an agent standing on the waypoint.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose::new(self.display, self.heading)
    }
}

/// Interpolated position and heading of the simulated agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in display units.
    pub position: DisplayPoint,
    /// Heading in degrees, display-space convention.
    pub heading: f64,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: DisplayPoint, heading: f64) -> Self {
        Self { position, heading }
    }
}

/// Shape used when drawing the path through the waypoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathMode {
    /// Straight segments between consecutive waypoints.
    #[serde(rename = "line")]
    Linear,
    /// Catmull-Rom spline through the waypoints.
    #[default]
    #[serde(rename = "spline")]
    Smoothed,
}

/// Display and editing configuration for a planning session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether grid lines are drawn over the field.
    pub show_grid: bool,
    /// Whether placed and dragged points snap to grid intersections.
    pub snap_to_grid: bool,
    /// Grid cell size in display units; always positive.
    pub grid_size: f64,
    /// Whether coordinate labels and axis ticks are drawn.
    pub show_coordinates: bool,
    /// Curve shape used for the path preview.
    pub path_type: PathMode,
    /// Stroke thickness of the path preview.
    pub path_thickness: f64,
    /// Radius of waypoint markers.
    pub waypoint_radius: f64,
    /// Whether heading arrows are drawn along path segments.
    pub show_direction_arrows: bool,
}

impl Settings {
    /// Verifies the settings invariants.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(SettingsError::NonPositiveGridSize {
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }

    /// Grid cell used for snapping, or `None` when snapping is disabled.
    #[must_use]
    pub fn snap_cell(&self) -> Option<f64> {
        self.snap_to_grid.then_some(self.grid_size)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_grid: true,
            snap_to_grid: true,
            grid_size: 20.0,
            show_coordinates: true,
            path_type: PathMode::Smoothed,
            path_thickness: 3.0,
            waypoint_radius: 8.0,
            show_direction_arrows: true,
        }
    }
}

/// Reasons a [`Settings`] value may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SettingsError {
    /// Grid cells must have a positive, finite size.
    #[error("grid size must be positive (received {grid_size})")]
    NonPositiveGridSize {
        /// Grid size that failed validation.
        grid_size: f64,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active settings.
    ConfigureSettings {
        /// Settings to activate.
        settings: Settings,
    },
    /// Appends a waypoint at a raw display-space location.
    PlaceWaypoint {
        /// Pointer location before grid snapping.
        point: DisplayPoint,
    },
    /// Relocates an existing waypoint.
    MoveWaypoint {
        /// Index of the waypoint to move.
        index: usize,
        /// Pointer location before grid snapping.
        point: DisplayPoint,
    },
    /// Removes the final waypoint, if any.
    RemoveLastWaypoint,
    /// Removes every waypoint.
    ClearWaypoints,
    /// Replaces the whole sequence with previously captured waypoints.
    ReplaceWaypoints {
        /// Waypoints to install, headings kept verbatim.
        waypoints: Vec<Waypoint>,
    },
    /// Locks or unlocks editing while a simulation is running.
    SetPlaybackActive {
        /// Whether playback is running.
        active: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that new settings became active.
    SettingsChanged {
        /// Settings now in effect.
        settings: Settings,
    },
    /// Confirms that a waypoint was appended.
    WaypointPlaced {
        /// Index assigned to the new waypoint.
        index: usize,
        /// Waypoint as stored, after snapping.
        waypoint: Waypoint,
    },
    /// Confirms that a waypoint moved.
    WaypointMoved {
        /// Index of the moved waypoint.
        index: usize,
        /// Waypoint as stored, after snapping.
        waypoint: Waypoint,
    },
    /// Confirms that the final waypoint was removed.
    WaypointRemoved {
        /// Index the removed waypoint occupied.
        index: usize,
    },
    /// Confirms that the sequence was emptied.
    WaypointsCleared,
    /// Confirms that the sequence was replaced wholesale.
    WaypointsReplaced {
        /// Number of waypoints installed.
        count: usize,
    },
    /// Announces that the editing lock changed.
    PlaybackLockChanged {
        /// Whether playback is running and editing locked.
        active: bool,
    },
    /// Reports that a mutation was refused and state left untouched.
    EditRejected {
        /// Specific reason the edit failed.
        reason: EditError,
    },
}

/// Reasons a world mutation may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum EditError {
    /// Waypoints cannot change while a simulation is running.
    #[error("waypoints cannot be edited while the simulation is running")]
    SimulationRunning,
    /// The referenced waypoint does not exist.
    #[error("waypoint {index} does not exist (sequence holds {len})")]
    MissingWaypoint {
        /// Requested index.
        index: usize,
        /// Number of waypoints currently stored.
        len: usize,
    },
    /// The provided settings violate their invariants.
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
}
