//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};

/// Live webcam viewer that renders the feed as colored ASCII glyphs
#[derive(Parser, Debug)]
#[command(name = "ascii-cam")]
#[command(version, about = "Live ASCII camera viewer for the terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long, short = 'c')]
    pub camera: Option<u32>,

    /// Grid width in cells
    #[arg(long, short = 'w', value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,

    /// Gamma applied before mapping (> 1.0 brightens midtones)
    #[arg(long, value_parser = parse_gamma)]
    pub gamma: Option<f32>,

    /// Mirror camera horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the screen is busy with video)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Merge command-line overrides into `config` (CLI > file > defaults).
    pub fn apply_to(&self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if self.mirror {
            config.camera.mirror = true;
        }
        if let Some(width) = self.width {
            config.pipeline.width = width;
        }
        if let Some(gamma) = self.gamma {
            config.pipeline.gamma = gamma;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse and validate gamma (positive, finite)
fn parse_gamma(s: &str) -> Result<f32, String> {
    let gamma: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(format!("Gamma must be greater than 0, got {}", gamma));
    }
    Ok(gamma)
}
