#![allow(dead_code)]

use std::{collections::HashMap, path::PathBuf};

use dot_stages::{
    error::RenderError,
    game::math::Rect2I,
    rendering::{ClearColor, SpriteDraw, TextureCanvas, TextureId}
};
use image::{Rgb, RgbImage, RgbaImage};

/// Canvas double that keeps every call for inspection.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    next_id: u32,
    pub live: HashMap<TextureId, (u32, u32)>,
    pub destroyed: Vec<TextureId>,
    pub draws: Vec<SpriteDraw>,
    pub clear_color: Option<ClearColor>,
    pub uploaded_alpha: Vec<Vec<u8>>,
    pub fail_create: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextureCanvas for RecordingCanvas {
    fn create_texture(&mut self, image: &RgbaImage, _label: &str) -> Result<TextureId, RenderError> {
        if self.fail_create {
            return Err(RenderError::TextureTooLarge { width: image.width(), height: image.height(), limit: 0 });
        }
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, image.dimensions());
        self.uploaded_alpha.push(image.pixels().map(|p| p.0[3]).collect());
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        assert!(self.live.remove(&id).is_some(), "double destroy of {id:?}");
        self.destroyed.push(id);
    }

    fn draw_texture(&mut self, id: TextureId, dest: Rect2I) -> Result<(), RenderError> {
        if !self.live.contains_key(&id) {
            return Err(RenderError::UnknownTexture(id));
        }
        self.draws.push(SpriteDraw { texture: id, dest });
        Ok(())
    }

    fn set_clear_color(&mut self, color: ClearColor) {
        self.clear_color = Some(color);
    }
}

/// Fresh directory under the system temp dir, unique per test name.
pub fn test_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dot_stages_{}_{}", std::process::id(), test_name));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_bmp(dir: &PathBuf, file_name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
    let path = dir.join(file_name);
    RgbImage::from_pixel(width, height, Rgb(color)).save(&path).unwrap();
    path
}
