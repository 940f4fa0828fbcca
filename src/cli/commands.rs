//! Subcommand handlers for list-cameras and config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::camera;
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG_TOML};

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), camera::CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config: &Config) -> Result<(), ConfigError> {
    let config_path = default_path();
    match action {
        ConfigAction::Show => {
            let p = &config.pipeline;
            println!("Current configuration:");
            println!("  Camera: {}", config.camera.device);
            println!("  Mirror: {}", if config.camera.mirror { "yes" } else { "no" });
            println!("  Width: {} cells", p.width);
            println!("  Gamma: {}", p.gamma);
            println!("  Cell aspect: {}", p.cell_aspect);
            println!("  Visibility threshold: {}", p.visibility_threshold);
            println!("  Edge threshold: {}", p.edge_threshold);
            println!("  Ramp: \"{}\"", p.ramp);
            println!(
                "  Cell size: {}x{} px",
                config.render.cell_width, config.render.cell_height
            );
            println!("  Tick: {} ms", config.render.tick_ms);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            write_default_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the commented default config to `path`, refusing to overwrite.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        return Err(io_err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_default_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        write_default_config(&path).unwrap();
        let config = Config::load_from_explicit(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_write_default_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_default_config(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
