use std::fs::File;
use std::io;
use std::path::Path;

use ascii_cam::camera::FrameSource;
use ascii_cam::cli::{self, Args, Command};
use ascii_cam::config::Config;
use ascii_cam::error::AppError;
use ascii_cam::event_loop::{self, setup_ctrlc_handler, RenderTask};
use ascii_cam::terminal::{TerminalGuard, TerminalSurface};
use clap::Parser;

/// Route logs to a file when asked; the terminal itself shows the video.
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.format_timestamp_millis().init();
    Ok(())
}

/// Load the config file. An explicit `--config` must exist; a broken
/// default file only produces a warning.
fn load_config(args: &Args) -> Result<Config, AppError> {
    let cfg = match args.config {
        Some(ref path) => Config::load_from_explicit(path)?,
        None => match Config::load() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                log::warn!("Ignoring config file: {}", e);
                Config::default()
            }
        },
    };
    Ok(args.apply_to(cfg)?)
}

/// Open the camera, take over the terminal and render until quit.
fn run_viewer(config: &Config) -> Result<(), AppError> {
    setup_ctrlc_handler()?;

    let mut source = FrameSource::open(config.camera_settings())?;
    source.start()?;

    let mut guard = TerminalGuard::enter()?;
    let (cols, rows) = crossterm::terminal::size()?;
    let mut surface = TerminalSurface::new(io::stdout(), cols, rows, config.render_settings());
    let mut task = RenderTask::new(config.pipeline_settings(), config.render_settings());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(event_loop::run(
        &source,
        &mut surface,
        &mut task,
        config.tick_interval(),
    ));

    // Camera first, then the screen
    source.stop();
    drop(surface);
    guard.restore()?;

    log::info!("Session ended after {} frames", task.frames_rendered());
    result
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("Warning: Failed to open log file: {}", e);
    }

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Some(Command::ListCameras) => cli::list_cameras().map_err(AppError::from),
        Some(Command::Config { ref action }) => {
            cli::handle_config_action(action.clone(), &config).map_err(AppError::from)
        }
        None => run_viewer(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
