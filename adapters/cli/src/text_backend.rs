use std::io::Write;

use anyhow::Result;
use path_planner_rendering::{Color, MarkerRole, Presentation, RenderingBackend};

/// Backend that writes a plain-text summary of each presented scene.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`.
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let scene = &presentation.scene;
        let palette = &presentation.palette;
        writeln!(
            self.out,
            "{}: {}x{} display units on {}",
            presentation.title,
            scene.size.x,
            scene.size.y,
            hex(palette.background)
        )?;
        writeln!(self.out, "grid lines: {}", scene.grid_lines.len())?;
        writeln!(self.out, "axis labels: {}", scene.axis_labels.len())?;
        match &scene.path {
            Some(path) => writeln!(
                self.out,
                "path: {} points, thickness {}, {}",
                path.points.len(),
                path.thickness,
                hex(palette.path)
            )?,
            None => writeln!(self.out, "path: none")?,
        }
        writeln!(self.out, "direction arrows: {}", scene.arrows.len())?;

        for marker in &scene.markers {
            let role = match marker.role {
                MarkerRole::Start => "start",
                MarkerRole::Interior => "waypoint",
                MarkerRole::End => "end",
            };
            let label = marker
                .label
                .as_ref()
                .map_or("", |label| label.text.as_str());
            writeln!(
                self.out,
                "  #{} {role} {} at ({:.1}, {:.1}) r={} {label}",
                marker.index,
                hex(palette.marker(marker.role)),
                marker.center.x,
                marker.center.y,
                marker.radius
            )?;
        }

        if let Some(agent) = &scene.agent {
            writeln!(
                self.out,
                "agent at ({:.1}, {:.1}) heading {:.1}",
                agent.position.x, agent.position.y, agent.rotation_degrees
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn hex(color: Color) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.red),
        channel(color.green),
        channel(color.blue)
    )
}
