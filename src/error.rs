use std::path::PathBuf;

use crate::rendering::TextureId;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Unable to load image '{path}', reason='{reason}'")]
    Decode {
        path: PathBuf,
        reason: image::ImageError,
    },
    #[error("Unable to create texture from '{path}', reason='{reason}'")]
    Create {
        path: PathBuf,
        reason: RenderError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Nothing loaded to render")]
    NothingLoaded,
    #[error("Unknown texture {0:?}")]
    UnknownTexture(TextureId),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Image {width}x{height} exceeds device limit {limit}")]
    TextureTooLarge {
        width: u32,
        height: u32,
        limit: u32,
    },
    #[error("Could not acquire surface texture, reason='{0}'")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("Text overlay failed, reason='{0}'")]
    Caption(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config '{path}', reason='{reason}'")]
    Read {
        path: PathBuf,
        reason: std::io::Error,
    },
    #[error("Could not parse config '{path}', reason='{reason}'")]
    Parse {
        path: PathBuf,
        reason: serde_json::Error,
    },
    #[error("Invalid screen size {width}x{height} in '{path}', both sides must be within 1..={max}", max = i32::MAX)]
    InvalidScreenSize {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Initialization failed, reason='{0}'")]
    Initialization(String),
    #[error("Event loop error, reason='{0}'")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
