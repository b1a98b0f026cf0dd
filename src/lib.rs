pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod rendering;

pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;
pub const DEFAULT_WINDOW_TITLE: &str = "SDL Tutorial";
pub const DEFAULT_ASSETS_DIR: &str = "assets";
