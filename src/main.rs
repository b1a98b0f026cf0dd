use std::path::PathBuf;

use clap::Parser;
use dot_stages::config::{AppConfig, StageKind};

/// # Global Arguments
#[derive(Debug, Parser)]
#[command(version, about = "Window, bitmap, key-select and moving dot demos", long_about = None)]
struct Cli {
    /// Stage to run
    #[arg(value_enum)]
    stage: Option<StageKind>,

    /// JSON config file, CLI flags take precedence
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Directory the images are loaded from
    #[arg(short = 'a', long = "assets", value_name = "ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Text drawn in the top-left corner
    #[arg(long = "caption", value_name = "TEXT")]
    caption: Option<String>,

    /// Present frames as fast as possible
    #[arg(long = "no-vsync")]
    no_vsync: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig, dot_stages::error::ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(stage) = self.stage {
            config.stage = stage;
        }
        if let Some(assets_dir) = &self.assets_dir {
            config.assets_dir = assets_dir.clone();
        }
        if let Some(caption) = &self.caption {
            config.caption = Some(caption.clone());
        }
        if self.no_vsync {
            config.vsync = false;
        }
        Ok(config)
    }
}

fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .format_file(false)
        .format_line_number(true)
        .init();

    let cli_args = Cli::parse();
    log::info!("Got args: '{:?}'.", cli_args);

    let config = match cli_args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    log::debug!("Running with {config:?}");

    match dot_stages::app::run(config) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Stopped with error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[test]
fn test_cli_overrides_defaults() {
    let cli = Cli::parse_from(["dot_stages", "key-select", "--assets", "data", "--caption", "Hi", "--no-vsync"]);
    let config = cli.resolve_config().unwrap();
    assert_eq!(config.stage, StageKind::KeySelect);
    assert_eq!(config.assets_dir, PathBuf::from("data"));
    assert_eq!(config.caption.as_deref(), Some("Hi"));
    assert!(!config.vsync);
}

#[test]
fn test_cli_without_args_uses_defaults() {
    let cli = Cli::parse_from(["dot_stages"]);
    assert_eq!(cli.resolve_config().unwrap(), AppConfig::default());
}
