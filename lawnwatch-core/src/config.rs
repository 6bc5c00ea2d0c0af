use crate::coordinates::WorldPoint;
use crate::grid::{GridError, LawnGrid};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POSITION_FILE: &str = "position.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("`{key}` must be a finite number")]
    NonFinite { key: &'static str },
    #[error("refresh interval must be at least 1 ms")]
    ZeroInterval,
    #[error("colour range is empty: min {min} >= max {max}")]
    EmptyColorRange { min: f32, max: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LawnConfig {
    pub width: f64,
    pub height: f64,
    pub resolution: f64,
    pub uncut_height: f32,
    pub cut_height: f32,
    /// Cells painted on each side of the mower's cell.
    pub mow_half_width: usize,
    pub position_file: PathBuf,
    pub refresh_interval_ms: u64,
    pub obstacles: Vec<WorldPoint>,
    pub dock: WorldPoint,
    pub color_min: f32,
    pub color_max: f32,
}

impl Default for LawnConfig {
    fn default() -> Self {
        let scene = Scene::default();
        Self {
            width: 10.0,
            height: 10.0,
            resolution: 0.1,
            uncut_height: 5.0,
            cut_height: 2.0,
            mow_half_width: 3,
            position_file: PathBuf::from(DEFAULT_POSITION_FILE),
            refresh_interval_ms: 200,
            obstacles: scene.obstacles,
            dock: scene.dock,
            color_min: 0.0,
            color_max: 5.0,
        }
    }
}

impl LawnConfig {
    /// Reads and validates a config file. A relative `position_file` is
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if config.position_file.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.position_file = base.join(&config.position_file);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LawnConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("width", self.width),
            ("height", self.height),
            ("uncut_height", f64::from(self.uncut_height)),
            ("cut_height", f64::from(self.cut_height)),
        ];
        if let Some(&(key, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite { key });
        }
        self.grid_dimensions()?;
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !(self.color_min < self.color_max) {
            return Err(ConfigError::EmptyColorRange {
                min: self.color_min,
                max: self.color_max,
            });
        }
        Ok(())
    }

    /// `(rows, cols)` of the lawn grid.
    pub fn grid_dimensions(&self) -> Result<(usize, usize), GridError> {
        LawnGrid::dimensions_for(self.width, self.height, self.resolution)
    }

    pub fn build_grid(&self) -> Result<LawnGrid, GridError> {
        LawnGrid::from_extent(self.width, self.height, self.resolution, self.uncut_height)
    }

    pub fn scene(&self) -> Scene {
        Scene::new(self.obstacles.clone(), self.dock)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
