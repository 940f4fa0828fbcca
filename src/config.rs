//! Configuration file handling for ascii-cam.
//!
//! Loads configuration from `~/.config/ascii-cam/config.toml` (platform
//! config dir) or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ascii::{
    GlyphRamp, PipelineSettings, DEFAULT_CELL_ASPECT, DEFAULT_EDGE_THRESHOLD, DEFAULT_GAMMA,
    DEFAULT_GRID_WIDTH, DEFAULT_VISIBILITY_THRESHOLD, STANDARD_RAMP,
};
use crate::camera::CameraSettings;
use crate::renderer::{RenderSettings, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};

/// Default delay between render ticks in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 1;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    #[serde(default = "default_cell_aspect")]
    pub cell_aspect: f32,
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: u8,
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: u8,
    #[serde(default = "default_ramp")]
    pub ramp: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            gamma: default_gamma(),
            cell_aspect: default_cell_aspect(),
            visibility_threshold: default_visibility_threshold(),
            edge_threshold: default_edge_threshold(),
            ramp: default_ramp(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_cell_width")]
    pub cell_width: u16,
    #[serde(default = "default_cell_height")]
    pub cell_height: u16,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_width() -> u16 {
    DEFAULT_GRID_WIDTH
}

fn default_gamma() -> f32 {
    DEFAULT_GAMMA
}

fn default_cell_aspect() -> f32 {
    DEFAULT_CELL_ASPECT
}

fn default_visibility_threshold() -> u8 {
    DEFAULT_VISIBILITY_THRESHOLD
}

fn default_edge_threshold() -> u8 {
    DEFAULT_EDGE_THRESHOLD
}

fn default_ramp() -> String {
    STANDARD_RAMP.to_string()
}

fn default_cell_width() -> u16 {
    DEFAULT_CELL_WIDTH
}

fn default_cell_height() -> u16 {
    DEFAULT_CELL_HEIGHT
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

impl Config {
    /// Load configuration from the default location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a path that must exist.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load_from(path)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pipeline;
        if p.width == 0 {
            return Err(invalid("pipeline.width", "must be greater than 0"));
        }
        if !(p.gamma.is_finite() && p.gamma > 0.0) {
            return Err(invalid("pipeline.gamma", "must be a positive number"));
        }
        if !(p.cell_aspect.is_finite() && p.cell_aspect > 0.0) {
            return Err(invalid("pipeline.cell_aspect", "must be a positive number"));
        }
        if p.visibility_threshold == 255 {
            return Err(invalid("pipeline.visibility_threshold", "must be below 255"));
        }
        if p.ramp.is_empty() {
            return Err(invalid("pipeline.ramp", "must contain at least one character"));
        }

        let r = &self.render;
        if r.cell_width == 0 || r.cell_height == 0 {
            return Err(invalid("render.cell_width/cell_height", "must be greater than 0"));
        }
        if r.tick_ms == 0 {
            return Err(invalid("render.tick_ms", "must be greater than 0"));
        }
        Ok(())
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.camera.device,
            mirror: self.camera.mirror,
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        let p = &self.pipeline;
        PipelineSettings {
            width: p.width,
            gamma: p.gamma,
            cell_aspect: p.cell_aspect,
            visibility_threshold: p.visibility_threshold,
            edge_threshold: p.edge_threshold,
            ramp: GlyphRamp::new(&p.ramp).unwrap_or_default(),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            cell_width: self.render.cell_width,
            cell_height: self.render.cell_height,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.render.tick_ms)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "ascii-cam", "ascii-cam")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-cam/config.toml")
        })
}

/// Commented default configuration, written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-cam configuration

[camera]
# Camera device index (see `ascii-cam list-cameras`)
device = 0
# Mirror horizontally (selfie mode)
mirror = false

[pipeline]
# Grid width in cells
width = 150
# Gamma applied to the raw frame (> 1.0 brightens midtones)
gamma = 1.3
# Row scale for glyph cells being taller than wide
cell_aspect = 0.55
# Cells darker than this are not drawn
visibility_threshold = 10
# Laplacian magnitude that counts as an edge
edge_threshold = 20
# Glyphs from densest to sparsest
ramp = "@%#*+=-:. "

[render]
# Cell size in pixels (font advance x line height)
cell_width = 5
cell_height = 9
# Delay between render ticks in milliseconds
tick_ms = 1
"#;
