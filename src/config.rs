//! Editor configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::{CUT_TOLERANCE, MAX_COORDINATE};
use crate::plan::OverrideScope;

/// Tunables shared by the validator, segmenter and resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels per grid unit, used when snapping pointer input.
    pub grid_size: f64,
    /// Manhattan radius of the nearest-valid-position search.
    pub search_radius: i32,
    /// Largest overlap two rooms may share as a common wall.
    pub wall_thickness: i32,
    /// Cut points closer than this along a wall are merged.
    pub cut_tolerance: f64,
    /// Where the owning room's wall override is looked up.
    pub override_lookup: OverrideScope,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            search_radius: 10,
            wall_thickness: 1,
            cut_tolerance: CUT_TOLERANCE,
            override_lookup: OverrideScope::Wall,
        }
    }
}

impl EditorConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML and `ConfigError::Invalid`
    /// when a value is out of range.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, or any error
    /// from [`EditorConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let cfg = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?cfg, "loaded editor config");
        Ok(cfg)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(invalid("grid_size", format!("{} is not positive", self.grid_size)));
        }
        if !(0..=MAX_COORDINATE).contains(&self.search_radius) {
            return Err(invalid(
                "search_radius",
                format!("{} is outside 0..={MAX_COORDINATE}", self.search_radius),
            ));
        }
        if self.wall_thickness < 0 {
            return Err(invalid(
                "wall_thickness",
                format!("{} is negative", self.wall_thickness),
            ));
        }
        if !self.cut_tolerance.is_finite() || self.cut_tolerance <= 0.0 {
            return Err(invalid(
                "cut_tolerance",
                format!("{} is not positive", self.cut_tolerance),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: String) -> crate::error::PlanError {
    ConfigError::Invalid { field, message }.into()
}
