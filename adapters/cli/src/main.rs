#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for planning, previewing and exporting waypoint paths.

mod config;
mod text_backend;

use std::{
    fs, io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use path_planner_core::{DisplayPoint, PathMode, Settings};
use path_planner_rendering::{Palette, Presentation, RenderingBackend, Scene};
use path_planner_session::Session;
use path_planner_system_simulation::TickOutcome;
use tracing_subscriber::EnvFilter;

use crate::{config::PlannerConfig, text_backend::TextBackend};

const DEFAULT_LOG_DIRECTIVE: &str = "path_planner=info";

/// Plans waypoint paths over a rectangular field.
#[derive(Debug, Parser)]
#[command(name = "path-planner", version)]
struct Cli {
    /// TOML file describing the field and initial settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: PlannerCommand,
}

#[derive(Debug, Subcommand)]
enum PlannerCommand {
    /// Places display-space points in order and writes the snapshot JSON.
    Plan {
        /// Display-space point as `X,Y`; repeat for every waypoint.
        #[arg(long = "point", value_parser = parse_point, required = true)]
        points: Vec<DisplayPoint>,
        /// File receiving the snapshot; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Prints the preview polyline of a saved path.
    Curve {
        /// Snapshot JSON to load.
        #[arg(long)]
        snapshot: PathBuf,
        /// Overrides the path type stored in the snapshot.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Plays a saved path back to completion, printing one pose per tick.
    Simulate {
        /// Snapshot JSON to load.
        #[arg(long)]
        snapshot: PathBuf,
        /// Speed multiplier applied to every tick.
        #[arg(long)]
        speed: Option<f64>,
        /// Delay between ticks in milliseconds.
        #[arg(long, default_value_t = 0)]
        frame_ms: u64,
    },
    /// Generates the control program for a saved path.
    Export {
        /// Snapshot JSON to load.
        #[arg(long)]
        snapshot: PathBuf,
        /// File receiving the program; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Prints a summary of the scene composed for a saved path.
    Scene {
        /// Snapshot JSON to load.
        #[arg(long)]
        snapshot: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Line,
    Spline,
}

impl From<ModeArg> for PathMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Line => PathMode::Linear,
            ModeArg::Spline => PathMode::Smoothed,
        }
    }
}

/// Entry point for the path planner command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref())?;
    let mut session = Session::new(config.dimensions);
    session
        .update_settings(config.settings)
        .context("configured settings were rejected")?;

    match cli.command {
        PlannerCommand::Plan { points, output } => {
            plan(&mut session, &points, output.as_deref())
        }
        PlannerCommand::Curve { snapshot, mode } => {
            load(&mut session, &snapshot)?;
            curve(&mut session, mode)
        }
        PlannerCommand::Simulate {
            snapshot,
            speed,
            frame_ms,
        } => {
            load(&mut session, &snapshot)?;
            simulate(&mut session, speed, Duration::from_millis(frame_ms))
        }
        PlannerCommand::Export { snapshot, output } => {
            load(&mut session, &snapshot)?;
            let Some(program) = session.export_program() else {
                bail!("export needs at least two waypoints");
            };
            emit(&program, output.as_deref())
        }
        PlannerCommand::Scene { snapshot } => {
            load(&mut session, &snapshot)?;
            scene(&session)
        }
    }
}

fn parse_point(value: &str) -> Result<DisplayPoint, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `X,Y`, received `{value}`"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid x coordinate `{x}`: {error}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid y coordinate `{y}`: {error}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite, received `{value}`"));
    }
    Ok(DisplayPoint::new(x, y))
}

fn load(session: &mut Session, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot at {}", path.display()))?;
    let _ = session
        .load_snapshot(&text)
        .with_context(|| format!("failed to load snapshot at {}", path.display()))?;
    Ok(())
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn plan(session: &mut Session, points: &[DisplayPoint], output: Option<&Path>) -> Result<()> {
    for point in points {
        let _ = session.place_waypoint(*point).with_context(|| {
            format!("failed to place waypoint at ({}, {})", point.x, point.y)
        })?;
    }
    let json = session.save_snapshot().context("failed to encode snapshot")?;
    emit(&json, output)
}

fn curve(session: &mut Session, mode: Option<ModeArg>) -> Result<()> {
    if let Some(mode) = mode {
        session
            .update_settings(Settings {
                path_type: mode.into(),
                ..*session.settings()
            })
            .context("failed to switch path mode")?;
    }
    for point in session.curve() {
        println!("{:.2}\t{:.2}", point.x, point.y);
    }
    Ok(())
}

fn simulate(session: &mut Session, speed: Option<f64>, frame: Duration) -> Result<()> {
    if let Some(speed) = speed {
        session
            .set_speed_multiplier(speed)
            .context("invalid speed multiplier")?;
    }
    if !session.start() {
        bail!("simulation needs at least two waypoints");
    }

    let mut tick = 0_u32;
    loop {
        if !frame.is_zero() {
            thread::sleep(frame);
        }
        let outcome = session.tick();
        let pose = match outcome {
            TickOutcome::Advanced(pose) | TickOutcome::Completed(pose) => pose,
            TickOutcome::Aborted => bail!("simulation aborted"),
            TickOutcome::Skipped => break,
        };
        tick += 1;

        let field = session.mapper().to_field(pose.position);
        println!(
            "{tick}\t{:.2}\t{:.2}\t{:.1}\t({:.2}, {:.2})",
            pose.position.x, pose.position.y, pose.heading, field.x, field.y
        );
        if matches!(outcome, TickOutcome::Completed(_)) {
            break;
        }
    }
    tracing::info!(ticks = tick, "simulation completed");
    Ok(())
}

fn scene(session: &Session) -> Result<()> {
    let scene = Scene::compose(
        session.mapper(),
        session.waypoints(),
        session.settings(),
        &session.curve(),
        session.pose(),
    )?;
    let presentation = Presentation::new("path-planner", Palette::default(), scene);
    TextBackend::new(io::stdout().lock()).present(&presentation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_with_optional_whitespace() {
        assert_eq!(parse_point("12.5, 40"), Ok(DisplayPoint::new(12.5, 40.0)));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,1").is_err());
        assert!(parse_point("inf,1").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_accepts_repeated_points() {
        let cli = Cli::try_parse_from([
            "path-planner",
            "plan",
            "--point",
            "0,600",
            "--point",
            "400,300",
        ])
        .expect("arguments parse");
        match cli.command {
            PlannerCommand::Plan { points, output } => {
                assert_eq!(points.len(), 2);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
