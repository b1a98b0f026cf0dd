pub mod caption;
pub mod renderer;
pub mod texture;

use image::RgbaImage;

use crate::{
    error::RenderError,
    game::math::Rect2I
};

/// Handle to a texture living inside a [`TextureCanvas`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ClearColor {
    pub const WHITE: ClearColor = ClearColor { r: 1.0, g: 1.0, b: 1.0 };

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f64 / 255.0,
            g: rgb[1] as f64 / 255.0,
            b: rgb[2] as f64 / 255.0,
        }
    }
}

/// Something textures can be uploaded to and drawn on.
///
/// Stages and entities only talk to this trait, the wgpu renderer is one
/// implementation and tests use a recording one.
pub trait TextureCanvas {
    fn create_texture(&mut self, image: &RgbaImage, label: &str) -> Result<TextureId, RenderError>;

    fn destroy_texture(&mut self, id: TextureId);

    /// `dest` is in screen pixels, origin top-left.
    fn draw_texture(&mut self, id: TextureId, dest: Rect2I) -> Result<(), RenderError>;

    fn set_clear_color(&mut self, color: ClearColor);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureId,
    pub dest: Rect2I,
}

/// Draw commands collected during one frame.
#[derive(Debug)]
pub struct RenderBatch {
    pub clear_color: ClearColor,
    pub sprites: Vec<SpriteDraw>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self { clear_color: ClearColor::WHITE, sprites: vec![] }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn push(&mut self, sprite: SpriteDraw) {
        self.sprites.push(sprite);
    }
}

impl Default for RenderBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a screen space rect to normalized device coordinates,
/// returned as (left, bottom, width, height).
pub fn screen_rect_to_ndc(rect: Rect2I, screen_width: u32, screen_height: u32) -> (f32, f32, f32, f32) {
    let width = screen_width as f32;
    let height = screen_height as f32;
    (
        (rect.pos.x as f32 / width) * 2.0 - 1.0,
        1.0 - ((rect.pos.y + rect.size.y) as f32 / height) * 2.0,
        (rect.size.x as f32 / width) * 2.0,
        (rect.size.y as f32 / height) * 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_screen_rect_covers_ndc() {
        let (x, y, w, h) = screen_rect_to_ndc(Rect2I::new(0, 0, 640, 480), 640, 480);
        assert_eq!((x, y, w, h), (-1.0, -1.0, 2.0, 2.0));
    }

    #[test]
    fn test_top_left_quarter() {
        let (x, y, w, h) = screen_rect_to_ndc(Rect2I::new(0, 0, 320, 240), 640, 480);
        assert_eq!((x, y, w, h), (-1.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_clear_color_from_rgb() {
        assert_eq!(ClearColor::from_rgb([0xFF, 0xFF, 0xFF]), ClearColor::WHITE);
        let black = ClearColor::from_rgb([0, 0, 0]);
        assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_batch_clear_keeps_color() {
        let mut batch = RenderBatch::new();
        batch.clear_color = ClearColor::from_rgb([0, 0, 0]);
        batch.push(SpriteDraw { texture: TextureId(1), dest: Rect2I::new(0, 0, 1, 1) });
        batch.clear();
        assert!(batch.sprites.is_empty());
        assert_eq!(batch.clear_color, ClearColor::from_rgb([0, 0, 0]));
    }
}
