#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates the waypoint sequence into program text for an external
//! motion-control runtime.
//!
//! The generated script is never executed or validated here. The only
//! contract with the runtime is the list of `(x, y, angle)` triples in field
//! units embedded in the template.

use path_planner_core::Waypoint;

const WAYPOINTS_MARKER: &str = "{{waypoints}}";

const PROGRAM_TEMPLATE: &str = r#"import math
import runloop
import motor_pair
from hub import motion_sensor, port

# Waypoints in field units: (x, y, heading in degrees)
waypoints = [
{{waypoints}}
]

DEGREES_PER_UNIT = 360


class PathFollower:
    def __init__(self, start):
        self.x, self.y, _ = start

    async def drive_to(self, x, y):
        dx, dy = x - self.x, y - self.y
        distance = math.sqrt(dx * dx + dy * dy)
        target = math.degrees(math.atan2(dy, dx))
        await self.turn_to(target)
        await motor_pair.move_for_degrees(
            motor_pair.PAIR_1, int(distance * DEGREES_PER_UNIT), 0, velocity=500
        )
        self.x, self.y = x, y

    async def turn_to(self, heading):
        motion_sensor.reset_yaw(0)
        steering = 100 if heading > 0 else -100
        motor_pair.move(motor_pair.PAIR_1, steering, velocity=200)
        while abs(motion_sensor.tilt_angles()[0] / 10) < abs(heading):
            await runloop.sleep_ms(5)
        motor_pair.stop(motor_pair.PAIR_1)


async def main():
    motor_pair.pair(motor_pair.PAIR_1, port.A, port.B)
    follower = PathFollower(waypoints[0])
    for x, y, _ in waypoints[1:]:
        await follower.drive_to(x, y)


runloop.run(main())
"#;

/// Field-space position and heading of one exported waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaypointTriple {
    /// Field X coordinate.
    pub x: f64,
    /// Field Y coordinate.
    pub y: f64,
    /// Heading in degrees.
    pub angle: f64,
}

/// Extracts the `(x, y, angle)` triples of the sequence in order.
#[must_use]
pub fn waypoint_triples(waypoints: &[Waypoint]) -> Vec<WaypointTriple> {
    waypoints
        .iter()
        .map(|waypoint| WaypointTriple {
            x: waypoint.field().x,
            y: waypoint.field().y,
            angle: waypoint.heading(),
        })
        .collect()
}

/// Renders the control script, or `None` when fewer than two waypoints exist.
#[must_use]
pub fn program_text(waypoints: &[Waypoint]) -> Option<String> {
    if waypoints.len() < 2 {
        return None;
    }

    let lines = waypoint_triples(waypoints)
        .iter()
        .map(format_triple)
        .collect::<Vec<_>>()
        .join("\n");
    Some(PROGRAM_TEMPLATE.replace(WAYPOINTS_MARKER, &lines))
}

fn format_triple(triple: &WaypointTriple) -> String {
    format!("    ({:.2}, {:.2}, {:.1}),", triple.x, triple.y, triple.angle)
}
