use std::path::{Path, PathBuf};

use serde::{
    Deserialize,
    Serialize
};

use crate::{
    error::ConfigError,
    rendering::texture::ColorKey,
    DEFAULT_ASSETS_DIR,
    DEFAULT_WINDOW_TITLE,
    SCREEN_HEIGHT,
    SCREEN_WIDTH
};

/// Which tutorial program to run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Empty white window
    Hello,
    /// A bitmap stretched over the window
    Bitmap,
    /// Arrow keys choose the displayed image
    KeySelect,
    /// Arrow keys move a dot around
    #[default]
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub assets_dir: PathBuf,
    pub vsync: bool,
    pub clear_color: [u8; 3],
    /// Applied to the dot bitmap only.
    pub color_key: Option<ColorKey>,
    pub caption: Option<String>,
    pub stage: StageKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::from(DEFAULT_WINDOW_TITLE),
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            vsync: true,
            clear_color: [0xFF, 0xFF, 0xFF],
            color_key: Some([0x00, 0xFF, 0xFF]),
            caption: None,
            stage: StageKind::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|reason| ConfigError::Parse { path: origin.to_path_buf(), reason })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Screen sides end up as signed pixel coordinates.
    pub fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let fits = |side: u32| side > 0 && i32::try_from(side).is_ok();
        if fits(self.screen_width) && fits(self.screen_height) {
            return Ok(());
        }
        Err(ConfigError::InvalidScreenSize {
            path: origin.to_path_buf(),
            width: self.screen_width,
            height: self.screen_height,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|reason| ConfigError::Read { path: path.to_path_buf(), reason })?;
        let config = Self::from_json_str(&json, path)?;
        log::info!("Config loaded from '{}'", path.display());
        Ok(config)
    }

    pub fn asset_path<S: AsRef<Path>>(&self, file_name: S) -> PathBuf {
        self.assets_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tutorial_window() {
        let config = AppConfig::default();
        assert_eq!(config.title, "SDL Tutorial");
        assert_eq!((config.screen_width, config.screen_height), (640, 480));
        assert_eq!(config.stage, StageKind::Dot);
        assert!(config.vsync);
        assert_eq!(config.caption, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"stage":"key-select","caption":"Hi","vsync":false}"#,
            Path::new("inline.json")
        ).unwrap();
        assert_eq!(config.stage, StageKind::KeySelect);
        assert_eq!(config.caption.as_deref(), Some("Hi"));
        assert!(!config.vsync);
        assert_eq!(config.screen_width, 640);
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_invalid_json_reports_origin() {
        let err = AppConfig::from_json_str("{not json", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_screen_size_must_fit_pixel_coordinates() {
        let err = AppConfig::from_json_str(r#"{"screen_width":4294967295}"#, Path::new("huge.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScreenSize { width: 4294967295, height: 480, .. }));
        assert!(err.to_string().contains("huge.json"));

        let err = AppConfig::from_json_str(r#"{"screen_height":0}"#, Path::new("flat.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScreenSize { height: 0, .. }));

        let largest = format!(r#"{{"screen_width":{}}}"#, i32::MAX);
        assert!(AppConfig::from_json_str(&largest, Path::new("wide.json")).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_asset_path_joins_dir() {
        let config = AppConfig {
            assets_dir: PathBuf::from("data"),
            ..Default::default()
        };
        assert_eq!(config.asset_path("dot.bmp"), PathBuf::from("data").join("dot.bmp"));
    }
}
