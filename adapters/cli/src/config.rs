use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use path_planner_core::{FieldDimensions, PathMode, Settings};
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Configuration file consulted when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "planner.toml";

/// Field geometry and initial settings for a planning session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlannerConfig {
    /// Display and field sizes handed to the coordinate mapper.
    pub(crate) dimensions: FieldDimensions,
    /// Settings activated before any command runs.
    pub(crate) settings: Settings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dimensions: FieldDimensions::default(),
            settings: Settings::default(),
        }
    }
}

impl PlannerConfig {
    /// Loads the explicit configuration file, or the default one when present.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !fallback.is_file() {
                    tracing::debug!("no configuration file found, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read planner config at {}", path.display()))?;
        let config = parse_config(&contents)
            .with_context(|| format!("invalid planner config at {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded planner config");
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    version: u32,
    #[serde(default)]
    field: Option<RawField>,
    #[serde(default)]
    settings: RawSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    display_width: f64,
    display_height: f64,
    field_width: f64,
    field_height: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    show_grid: Option<bool>,
    snap_to_grid: Option<bool>,
    grid_size: Option<f64>,
    show_coordinates: Option<bool>,
    path_type: Option<PathMode>,
    path_thickness: Option<f64>,
    waypoint_radius: Option<f64>,
    show_direction_arrows: Option<bool>,
}

impl RawSettings {
    fn apply_to(self, base: Settings) -> Settings {
        Settings {
            show_grid: self.show_grid.unwrap_or(base.show_grid),
            snap_to_grid: self.snap_to_grid.unwrap_or(base.snap_to_grid),
            grid_size: self.grid_size.unwrap_or(base.grid_size),
            show_coordinates: self.show_coordinates.unwrap_or(base.show_coordinates),
            path_type: self.path_type.unwrap_or(base.path_type),
            path_thickness: self.path_thickness.unwrap_or(base.path_thickness),
            waypoint_radius: self.waypoint_radius.unwrap_or(base.waypoint_radius),
            show_direction_arrows: self
                .show_direction_arrows
                .unwrap_or(base.show_direction_arrows),
        }
    }
}

fn parse_config(contents: &str) -> Result<PlannerConfig> {
    let raw: RawConfig =
        toml::from_str(contents).context("failed to parse planner config toml contents")?;
    if raw.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported planner config version {}; expected {}",
            raw.version,
            SUPPORTED_CONFIG_VERSION
        );
    }

    let dimensions = match raw.field {
        Some(field) => FieldDimensions::new(
            field.display_width,
            field.display_height,
            field.field_width,
            field.field_height,
        )
        .context("planner config contains invalid field dimensions")?,
        None => FieldDimensions::default(),
    };

    let settings = raw.settings.apply_to(Settings::default());
    settings
        .validate()
        .context("planner config contains invalid settings")?;

    Ok(PlannerConfig {
        dimensions,
        settings,
    })
}
