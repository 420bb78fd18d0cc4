#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns the waypoint sequence into a dense display polyline.

use path_planner_core::{DisplayPoint, PathMode, Waypoint};

/// Number of sub-steps each smoothed segment is sampled at.
pub const SAMPLES_PER_SEGMENT: u32 = 20;

/// Stateless generator for the path preview curve.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathCurveGenerator;

impl PathCurveGenerator {
    /// Produces the polyline for `waypoints` in the requested mode.
    ///
    /// Linear mode returns the waypoints' display points unchanged. Smoothed
    /// mode evaluates a Catmull-Rom spline per segment, duplicating the end
    /// points as outer control points, and concatenates
    /// `SAMPLES_PER_SEGMENT + 1` samples per segment. Fewer than two waypoints
    /// produce an empty smoothed curve.
    #[must_use]
    pub fn generate(&self, waypoints: &[Waypoint], mode: PathMode) -> Vec<DisplayPoint> {
        match mode {
            PathMode::Linear => waypoints.iter().map(Waypoint::display).collect(),
            PathMode::Smoothed => smoothed(waypoints),
        }
    }
}

/// Flattens a polyline into interleaved `[x0, y0, x1, y1, ...]` coordinates.
#[must_use]
pub fn flatten(points: &[DisplayPoint]) -> Vec<f64> {
    points.iter().flat_map(|point| [point.x, point.y]).collect()
}

fn smoothed(waypoints: &[Waypoint]) -> Vec<DisplayPoint> {
    if waypoints.len() < 2 {
        return Vec::new();
    }

    let segments = waypoints.len() - 1;
    let mut points = Vec::with_capacity(segments * (SAMPLES_PER_SEGMENT as usize + 1));
    for i in 0..segments {
        let p0 = waypoints[i.saturating_sub(1)].display();
        let p1 = waypoints[i].display();
        let p2 = waypoints[i + 1].display();
        let p3 = waypoints.get(i + 2).unwrap_or(&waypoints[i + 1]).display();

        for step in 0..=SAMPLES_PER_SEGMENT {
            let t = f64::from(step) / f64::from(SAMPLES_PER_SEGMENT);
            points.push(DisplayPoint::new(
                catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
                catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            ));
        }
    }
    points
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catmull_rom_hits_inner_control_points() {
        assert_eq!(catmull_rom(3.0, 10.0, 20.0, 7.0, 0.0), 10.0);
        assert!((catmull_rom(3.0, 10.0, 20.0, 7.0, 1.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_controls_stay_on_the_line() {
        let value = catmull_rom(0.0, 10.0, 20.0, 30.0, 0.5);
        assert!((value - 15.0).abs() < 1e-12);
    }

    #[test]
    fn flatten_interleaves_coordinates() {
        let flat = flatten(&[DisplayPoint::new(1.0, 2.0), DisplayPoint::new(3.0, 4.0)]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
