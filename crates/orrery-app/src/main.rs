//! Opens the solar system window.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p orrery-app -- --width 1920 --height 1080` to override size.

use clap::Parser;
use orrery_app::{AppError, PlatformDirs};
use orrery_config::{CliArgs, Config};
use tracing::info;

fn try_main(args: CliArgs) -> Result<(), AppError> {
    let mut dirs = PlatformDirs::resolve()?;
    if let Some(config_dir) = args.config.clone() {
        dirs = dirs.with_config_dir(config_dir);
    }
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    if let Some(log_file) =
        orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config))
    {
        info!("Writing JSON log to {}", log_file.display());
    }
    info!("Config directory: {}", dirs.config_dir.display());

    orrery_app::run(config)
}

fn main() {
    if let Err(err) = try_main(CliArgs::parse()) {
        eprintln!("orrery: {err}");
        std::process::exit(-1);
    }
}
