#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for path planner adapters.
//!
//! A [`Scene`] is a declarative description of everything drawn over the
//! field. Backends only draw what it lists; no planning state is consulted
//! while rendering.

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_planner_core::{
    heading_between, CoordinateMapper, DisplayPoint, Pose, Settings, TickAxis, Waypoint,
};
use std::{error::Error, fmt};

/// Number of divisions along each axis of the coordinate labels.
pub const AXIS_LABEL_DIVISIONS: u32 = 8;

/// Segments shorter than this, in display units, carry no direction arrow.
pub const MIN_ARROW_SEGMENT_LENGTH: f64 = 50.0;

/// Edge length of the square drawn for the simulated agent.
pub const AGENT_SIZE: f32 = 30.0;

/// Smallest grid spacing, in display units, for which grid lines are laid out.
pub const MIN_GRID_SPACING: f64 = 1.0;

const HORIZONTAL_LABEL_INSET: f32 = 20.0;
const VERTICAL_LABEL_INSET: f32 = 10.0;
const MARKER_LABEL_OFFSET: Vec2 = Vec2::new(10.0, -20.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Colors used for every element of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Field background.
    pub background: Color,
    /// Grid lines.
    pub grid: Color,
    /// Axis and marker label text.
    pub label: Color,
    /// Path preview stroke.
    pub path: Color,
    /// Marker of the first waypoint.
    pub start_marker: Color,
    /// Markers between the first and the last waypoint.
    pub interior_marker: Color,
    /// Marker of the last waypoint.
    pub end_marker: Color,
    /// Direction arrows.
    pub arrow: Color,
    /// Simulated agent body.
    pub agent: Color,
}

impl Palette {
    /// Fill color for a marker of the provided role.
    #[must_use]
    pub fn marker(&self, role: MarkerRole) -> Color {
        match role {
            MarkerRole::Start => self.start_marker,
            MarkerRole::Interior => self.interior_marker,
            MarkerRole::End => self.end_marker,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0xf5, 0xf5, 0xf5),
            grid: Color::from_rgb_u8(0xaa, 0xaa, 0xaa).with_alpha(0.4),
            label: Color::from_rgb_u8(0, 0, 0),
            path: Color::from_rgb_u8(0x4f, 0xc3, 0xf7),
            start_marker: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            interior_marker: Color::from_rgb_u8(0xff, 0xd7, 0x00),
            end_marker: Color::from_rgb_u8(0xf4, 0x43, 0x36),
            arrow: Color::from_rgb_u8(0xff, 0xd7, 0x00),
            agent: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
        }
    }
}

/// Straight grid line spanning the whole field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    /// Start point in display units.
    pub from: Vec2,
    /// End point in display units.
    pub to: Vec2,
}

/// Field-unit label drawn along one edge of the field.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
    /// Edge the label belongs to.
    pub axis: TickAxis,
    /// Anchor of the text in display units.
    pub position: Vec2,
    /// Field value formatted with one decimal.
    pub text: String,
}

/// Position of a waypoint within the sequence, used to pick its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// First waypoint.
    Start,
    /// Any waypoint between the first and the last.
    Interior,
    /// Last waypoint of a sequence with at least two entries.
    End,
}

impl MarkerRole {
    /// Role of the waypoint at `index` in a sequence of `len` waypoints.
    #[must_use]
    pub fn for_index(index: usize, len: usize) -> Self {
        if index == 0 {
            Self::Start
        } else if index + 1 == len {
            Self::End
        } else {
            Self::Interior
        }
    }
}

/// Circle drawn for a waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointMarker {
    /// Index of the waypoint in the sequence.
    pub index: usize,
    /// Center in display units.
    pub center: Vec2,
    /// Radius in display units.
    pub radius: f32,
    /// Role that determines the fill color.
    pub role: MarkerRole,
    /// Field coordinates rendered as `"(x.xx, y.yy)"` when labels are shown.
    pub label: Option<MarkerLabel>,
}

/// Text attached to a waypoint marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerLabel {
    /// Anchor of the text in display units.
    pub position: Vec2,
    /// Formatted field coordinates.
    pub text: String,
}

/// Chevron marking the travel direction of a path segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionArrow {
    /// Midpoint of the segment in display units.
    pub position: Vec2,
    /// Rotation in degrees, display-space convention.
    pub rotation_degrees: f32,
}

/// Polyline previewing the path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStroke {
    /// Points of the polyline in display units.
    pub points: Vec<Vec2>,
    /// Stroke thickness in display units.
    pub thickness: f32,
}

/// Square drawn for the simulated agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Center of the agent in display units.
    pub position: Vec2,
    /// Rotation in degrees, display-space convention.
    pub rotation_degrees: f32,
    /// Edge length of the agent square.
    pub size: f32,
}

/// Scene description combining grid, labels, path, markers and the agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the field in display units.
    pub size: Vec2,
    /// Grid lines, vertical lines first.
    pub grid_lines: Vec<GridLine>,
    /// Axis labels, horizontal axis first.
    pub axis_labels: Vec<AxisLabel>,
    /// Path preview, absent below two waypoints.
    pub path: Option<PathStroke>,
    /// Direction arrows along sufficiently long segments.
    pub arrows: Vec<DirectionArrow>,
    /// One marker per waypoint in sequence order.
    pub markers: Vec<WaypointMarker>,
    /// Simulated agent, absent while playback is idle.
    pub agent: Option<AgentPresentation>,
}

impl Scene {
    /// Composes the scene for the current planning state.
    ///
    /// `curve` is the preview polyline produced for the active path mode and
    /// `pose` the latest simulated pose.
    pub fn compose(
        mapper: &CoordinateMapper,
        waypoints: &[Waypoint],
        settings: &Settings,
        curve: &[DisplayPoint],
        pose: Option<Pose>,
    ) -> Result<Self, RenderingError> {
        if settings.validate().is_err() {
            return Err(RenderingError::InvalidGridSize {
                grid_size: settings.grid_size,
            });
        }

        let dimensions = mapper.dimensions();
        let width = dimensions.display_width();
        let height = dimensions.display_height();

        let grid_lines = if settings.show_grid {
            if settings.grid_size < MIN_GRID_SPACING {
                return Err(RenderingError::GridTooDense {
                    grid_size: settings.grid_size,
                });
            }
            grid_lines(width, height, settings.grid_size)
        } else {
            Vec::new()
        };

        let axis_labels = if settings.show_coordinates {
            axis_labels(mapper, height as f32)
        } else {
            Vec::new()
        };

        let path = (waypoints.len() > 1).then(|| PathStroke {
            points: curve.iter().copied().map(to_vec2).collect(),
            thickness: settings.path_thickness as f32 + 1.0,
        });

        let arrows = if settings.show_direction_arrows {
            direction_arrows(waypoints)
        } else {
            Vec::new()
        };

        let markers = waypoints
            .iter()
            .enumerate()
            .map(|(index, waypoint)| {
                let center = to_vec2(waypoint.display());
                WaypointMarker {
                    index,
                    center,
                    radius: settings.waypoint_radius as f32 + 1.0,
                    role: MarkerRole::for_index(index, waypoints.len()),
                    label: settings.show_coordinates.then(|| MarkerLabel {
                        position: center + MARKER_LABEL_OFFSET,
                        text: format!("({:.2}, {:.2})", waypoint.field().x, waypoint.field().y),
                    }),
                }
            })
            .collect();

        let agent = pose.map(|pose| AgentPresentation {
            position: to_vec2(pose.position),
            rotation_degrees: pose.heading as f32,
            size: AGENT_SIZE,
        });

        Ok(Self {
            size: Vec2::new(width as f32, height as f32),
            grid_lines,
            axis_labels,
            path,
            arrows,
            markers,
            agent,
        })
    }
}

fn to_vec2(point: DisplayPoint) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

fn grid_lines(width: f64, height: f64, grid_size: f64) -> Vec<GridLine> {
    let columns = (width / grid_size).floor() as u32;
    let rows = (height / grid_size).floor() as u32;

    let vertical = (0..=columns).map(|column| {
        let x = (f64::from(column) * grid_size) as f32;
        GridLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, height as f32),
        }
    });
    let horizontal = (0..=rows).map(|row| {
        let y = (f64::from(row) * grid_size) as f32;
        GridLine {
            from: Vec2::new(0.0, y),
            to: Vec2::new(width as f32, y),
        }
    });
    vertical.chain(horizontal).collect()
}

fn axis_labels(mapper: &CoordinateMapper, height: f32) -> Vec<AxisLabel> {
    mapper
        .axis_ticks(AXIS_LABEL_DIVISIONS)
        .into_iter()
        .map(|tick| {
            let offset = tick.display_offset as f32;
            let position = match tick.axis {
                TickAxis::Horizontal => Vec2::new(offset, height - HORIZONTAL_LABEL_INSET),
                TickAxis::Vertical => Vec2::new(VERTICAL_LABEL_INSET, offset),
            };
            AxisLabel {
                axis: tick.axis,
                position,
                text: format!("{:.1}", tick.field_value),
            }
        })
        .collect()
}

fn direction_arrows(waypoints: &[Waypoint]) -> Vec<DirectionArrow> {
    waypoints
        .windows(2)
        .filter_map(|pair| {
            let from = pair[0].display();
            let to = pair[1].display();
            if from.distance_to(to) < MIN_ARROW_SEGMENT_LENGTH {
                return None;
            }
            Some(DirectionArrow {
                position: to_vec2(from.lerp(to, 0.5)),
                rotation_degrees: heading_between(from, to) as f32,
            })
        })
        .collect()
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Colors used for every scene element.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting path planner scenes.
pub trait RenderingBackend {
    /// Draws one presentation.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grid cells must have a positive size to lay out grid lines.
    InvalidGridSize {
        /// Provided grid size that failed validation.
        grid_size: f64,
    },
    /// Grid cells are smaller than [`MIN_GRID_SPACING`] while the grid is shown.
    GridTooDense {
        /// Provided grid size.
        grid_size: f64,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSize { grid_size } => {
                write!(f, "grid_size must be positive (received {grid_size})")
            }
            Self::GridTooDense { grid_size } => write!(
                f,
                "grid_size {grid_size} is below the minimum drawable spacing of {MIN_GRID_SPACING}"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use path_planner_core::FieldDimensions;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(FieldDimensions::default())
    }

    fn waypoints(points: &[(f64, f64)]) -> Vec<Waypoint> {
        let mapper = mapper();
        points
            .iter()
            .map(|&(x, y)| Waypoint::from_display(DisplayPoint::new(x, y), &mapper, 0.0))
            .collect()
    }

    #[test]
    fn marker_roles_follow_sequence_position() {
        assert_eq!(MarkerRole::for_index(0, 1), MarkerRole::Start);
        assert_eq!(MarkerRole::for_index(0, 3), MarkerRole::Start);
        assert_eq!(MarkerRole::for_index(1, 3), MarkerRole::Interior);
        assert_eq!(MarkerRole::for_index(2, 3), MarkerRole::End);
    }

    #[test]
    fn grid_covers_field_edges_inclusive() {
        let lines = grid_lines(800.0, 600.0, 20.0);
        assert_eq!(lines.len(), 41 + 31);
        assert_eq!(lines[40].from, Vec2::new(800.0, 0.0));
        assert_eq!(lines.last().map(|line| line.to), Some(Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn short_segments_carry_no_arrow() {
        let arrows = direction_arrows(&waypoints(&[(0.0, 0.0), (40.0, 0.0), (40.0, 100.0)]));
        assert_eq!(arrows.len(), 1);
        assert_eq!(arrows[0].position, Vec2::new(40.0, 50.0));
        assert!((arrows[0].rotation_degrees - 90.0).abs() < 1e-4);
    }

    #[test]
    fn axis_labels_use_one_decimal() {
        let labels = axis_labels(&mapper(), 600.0);
        assert_eq!(labels.len(), 18);
        assert_eq!(labels[0].text, "0.0");
        assert_eq!(labels[8].text, "14.0");
        assert_eq!(labels[8].position, Vec2::new(800.0, 580.0));
        assert_eq!(labels[9].text, "8.0");
        assert_eq!(labels[9].position, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn invalid_grid_size_is_rejected() {
        let settings = Settings {
            grid_size: 0.0,
            ..Settings::default()
        };
        let error = Scene::compose(&mapper(), &[], &settings, &[], None)
            .expect_err("zero grid size must be rejected");
        assert_eq!(error, RenderingError::InvalidGridSize { grid_size: 0.0 });
    }

    #[test]
    fn sub_unit_grid_is_rejected_only_when_shown() {
        let settings = Settings {
            grid_size: 1e-9,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
        let error = Scene::compose(&mapper(), &[], &settings, &[], None)
            .expect_err("grid too dense to lay out");
        assert_eq!(error, RenderingError::GridTooDense { grid_size: 1e-9 });

        let hidden = Settings {
            show_grid: false,
            ..settings
        };
        let scene = Scene::compose(&mapper(), &[], &hidden, &[], None)
            .expect("hidden grid needs no layout");
        assert!(scene.grid_lines.is_empty());
    }
}
