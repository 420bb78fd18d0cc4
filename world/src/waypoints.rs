//! Ordered waypoint sequence with derived headings.

use path_planner_core::{heading_between, CoordinateMapper, DisplayPoint, EditError, Waypoint};

/// Ordered, mutable list of waypoints.
///
/// Heading invariant: every waypoint with a successor points at it. The final
/// waypoint keeps the direction of the edge that leads into it, and a lone
/// waypoint faces zero degrees. Loaded sequences installed through
/// [`WaypointStore::replace`] keep their stored headings until edited.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
}

impl WaypointStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a waypoint at `raw`, snapped to `snap` when provided.
    ///
    /// Returns the index of the new waypoint.
    pub fn append(
        &mut self,
        raw: DisplayPoint,
        snap: Option<f64>,
        mapper: &CoordinateMapper,
    ) -> usize {
        let point = snap_point(raw, snap);
        let heading = self
            .waypoints
            .last()
            .map_or(0.0, |previous| heading_between(previous.display(), point));
        self.waypoints.push(Waypoint::from_display(point, mapper, heading));

        let index = self.waypoints.len() - 1;
        if index > 0 {
            self.refresh_heading(index - 1);
        }
        index
    }

    /// Relocates the waypoint at `index`, recomputing the headings of the
    /// edges that touch it.
    ///
    /// The waypoint after `index` keeps its own heading, including the tail.
    pub fn move_at(
        &mut self,
        index: usize,
        raw: DisplayPoint,
        snap: Option<f64>,
        mapper: &CoordinateMapper,
    ) -> Result<Waypoint, EditError> {
        let len = self.waypoints.len();
        let point = snap_point(raw, snap);
        let waypoint = self
            .waypoints
            .get_mut(index)
            .ok_or(EditError::MissingWaypoint { index, len })?;
        waypoint.relocate(point, mapper);

        if index > 0 {
            self.refresh_heading(index - 1);
        }
        if index + 1 < len {
            self.refresh_heading(index);
        }

        Ok(self.waypoints[index])
    }

    /// Drops the final waypoint and returns it, if any.
    pub fn remove_last(&mut self) -> Option<Waypoint> {
        let removed = self.waypoints.pop()?;
        if let Some(tail) = self.waypoints.len().checked_sub(1) {
            self.refresh_heading(tail);
        }
        Some(removed)
    }

    /// Removes every waypoint.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Installs a new sequence verbatim.
    pub fn replace(&mut self, waypoints: Vec<Waypoint>) {
        self.waypoints = waypoints;
    }

    /// Number of stored waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` when no waypoints are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Final waypoint, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Read-only view of the sequence in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    fn refresh_heading(&mut self, index: usize) {
        let heading = match (
            index.checked_sub(1).and_then(|i| self.waypoints.get(i)),
            self.waypoints.get(index),
            self.waypoints.get(index + 1),
        ) {
            (_, Some(current), Some(next)) => heading_between(current.display(), next.display()),
            (Some(previous), Some(current), None) => {
                heading_between(previous.display(), current.display())
            }
            _ => 0.0,
        };
        if let Some(waypoint) = self.waypoints.get_mut(index) {
            waypoint.set_heading(heading);
        }
    }
}

fn snap_point(raw: DisplayPoint, snap: Option<f64>) -> DisplayPoint {
    match snap {
        Some(cell) if cell > 0.0 => raw.snapped(cell),
        _ => raw,
    }
}
