#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! JSON persistence for a planning session.
//!
//! Snapshots carry field coordinates only; display coordinates are always
//! re-derived through the active [`CoordinateMapper`] when a snapshot is
//! restored, so a saved path survives a change of canvas size.

use path_planner_core::{
    CoordinateMapper, FieldPoint, Settings, SettingsError, Waypoint, DEFAULT_SPEED_FACTOR,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const WAYPOINTS_KEY: &str = "waypoints";
const SETTINGS_KEY: &str = "settings";

/// Persisted form of a planning session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Waypoints in sequence order.
    pub waypoints: Vec<SnapshotWaypoint>,
    /// Settings active when the snapshot was taken.
    pub settings: Settings,
}

/// Persisted form of a single waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotWaypoint {
    /// Field X coordinate.
    #[serde(rename = "realX")]
    pub real_x: f64,
    /// Field Y coordinate.
    #[serde(rename = "realY")]
    pub real_y: f64,
    /// Heading in degrees.
    #[serde(default)]
    pub angle: f64,
    /// Speed multiplier attached to the waypoint.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_FACTOR
}

impl Snapshot {
    /// Captures the waypoints and settings of a session.
    #[must_use]
    pub fn capture(waypoints: &[Waypoint], settings: &Settings) -> Self {
        Self {
            waypoints: waypoints
                .iter()
                .map(|waypoint| SnapshotWaypoint {
                    real_x: waypoint.field().x,
                    real_y: waypoint.field().y,
                    angle: waypoint.heading(),
                    speed: waypoint.speed_factor(),
                })
                .collect(),
            settings: *settings,
        }
    }

    /// Rebuilds waypoints for the provided mapper. Headings are kept verbatim.
    #[must_use]
    pub fn restore(&self, mapper: &CoordinateMapper) -> (Vec<Waypoint>, Settings) {
        let waypoints = self
            .waypoints
            .iter()
            .map(|entry| {
                Waypoint::from_field(
                    FieldPoint::new(entry.real_x, entry.real_y),
                    mapper,
                    entry.angle,
                    entry.speed,
                )
            })
            .collect();
        (waypoints, self.settings)
    }

    /// Serialises the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }

    /// Parses a snapshot, merging any settings it carries over `current`.
    ///
    /// The `settings` object is optional and may name only some keys; missing
    /// keys keep their current values. Nothing partial is ever returned: any
    /// structural problem fails the whole load.
    pub fn from_json(text: &str, current: &Settings) -> Result<Self, SnapshotError> {
        let root: Value = serde_json::from_str(text).map_err(SnapshotError::InvalidJson)?;
        let Value::Object(mut root) = root else {
            return Err(SnapshotError::NotAnObject);
        };

        let Some(Value::Array(entries)) = root.remove(WAYPOINTS_KEY) else {
            return Err(SnapshotError::MissingWaypoints);
        };
        let waypoints = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<SnapshotWaypoint>(entry)
                    .map_err(|source| SnapshotError::InvalidWaypoint { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let settings = match root.remove(SETTINGS_KEY) {
            None | Some(Value::Null) => *current,
            Some(Value::Object(partial)) => merge_settings(current, partial)?,
            Some(_) => return Err(SnapshotError::SettingsNotAnObject),
        };
        settings.validate()?;

        Ok(Self {
            waypoints,
            settings,
        })
    }
}

fn merge_settings(
    current: &Settings,
    partial: Map<String, Value>,
) -> Result<Settings, SnapshotError> {
    let mut merged = match serde_json::to_value(current).map_err(SnapshotError::Encode)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(partial);
    serde_json::from_value(Value::Object(merged)).map_err(SnapshotError::InvalidSettings)
}

/// Reasons a snapshot could not be produced or loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The text was not valid JSON.
    #[error("snapshot is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// The JSON root was not an object.
    #[error("snapshot root must be an object")]
    NotAnObject,
    /// The `waypoints` key was absent or not an array.
    #[error("snapshot must contain a `waypoints` array")]
    MissingWaypoints,
    /// A waypoint entry lacked numeric `realX`/`realY` or had mistyped fields.
    #[error("waypoint {index} is malformed: {source}")]
    InvalidWaypoint {
        /// Position of the entry within the array.
        index: usize,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The `settings` value was present but not an object.
    #[error("snapshot `settings` must be an object")]
    SettingsNotAnObject,
    /// A settings key had the wrong type or an unknown value.
    #[error("snapshot settings are malformed: {0}")]
    InvalidSettings(#[source] serde_json::Error),
    /// The merged settings violate their invariants.
    #[error(transparent)]
    SettingsRejected(#[from] SettingsError),
    /// The snapshot could not be serialised.
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_planner_core::PathMode;

    #[test]
    fn missing_angle_and_speed_take_defaults() {
        let snapshot = Snapshot::from_json(
            r#"{"waypoints":[{"realX":1.5,"realY":2.0}]}"#,
            &Settings::default(),
        )
        .expect("snapshot parses");

        assert_eq!(
            snapshot.waypoints,
            vec![SnapshotWaypoint {
                real_x: 1.5,
                real_y: 2.0,
                angle: 0.0,
                speed: DEFAULT_SPEED_FACTOR,
            }]
        );
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn partial_settings_merge_over_current() {
        let current = Settings {
            grid_size: 40.0,
            ..Settings::default()
        };
        let snapshot = Snapshot::from_json(
            r#"{"waypoints":[],"settings":{"pathType":"line","showGrid":false}}"#,
            &current,
        )
        .expect("snapshot parses");

        assert_eq!(
            snapshot.settings,
            Settings {
                path_type: PathMode::Linear,
                show_grid: false,
                ..current
            }
        );
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let snapshot = Snapshot {
            waypoints: vec![SnapshotWaypoint {
                real_x: 7.0,
                real_y: 4.0,
                angle: 90.0,
                speed: 1.0,
            }],
            settings: Settings::default(),
        };
        let json = snapshot.to_json().expect("snapshot encodes");

        for key in [
            "\"realX\"",
            "\"realY\"",
            "\"angle\"",
            "\"speed\"",
            "\"snapToGrid\"",
            "\"pathType\": \"spline\"",
        ] {
            assert!(json.contains(key), "{key} missing from {json}");
        }
    }
}
