use std::path::Path;

use image::RgbaImage;

use crate::{
    error::{RenderError, TextureError},
    game::math::Rect2I
};

use super::{TextureCanvas, TextureId};

pub type ColorKey = [u8; 3];

/// Decodes any format the `image` crate knows (bmp, png, pnm, ...) into RGBA.
pub fn decode_image(path: &Path, color_key: Option<ColorKey>) -> Result<RgbaImage, TextureError> {
    let mut rgba = image::open(path)
        .map_err(|reason| TextureError::Decode { path: path.to_path_buf(), reason })?
        .to_rgba8();

    if let Some(key) = color_key {
        apply_color_key(&mut rgba, key);
    }
    Ok(rgba)
}

/// Every pixel matching `key` becomes fully transparent.
pub fn apply_color_key(image: &mut RgbaImage, key: ColorKey) {
    for pixel in image.pixels_mut() {
        if pixel.0[..3] == key {
            pixel.0[3] = 0;
        }
    }
}

/// Owns at most one texture of a [`TextureCanvas`] along with its size.
///
/// The handle keeps no reference to its canvas, so dropping it does not free
/// the texture. Call [`TextureHandle::release`] first, otherwise the texture
/// stays alive until the canvas itself goes away.
#[derive(Debug, Default)]
pub struct TextureHandle {
    texture: Option<TextureId>,
    width: u32,
    height: u32,
}

impl TextureHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current texture with the image at `path`.
    ///
    /// The previous texture is released before anything is decoded, so on
    /// error the handle is always left empty.
    pub fn load<C: TextureCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        path: &Path,
        color_key: Option<ColorKey>,
    ) -> Result<(), TextureError> {
        self.release(canvas);

        let rgba = decode_image(path, color_key)?;
        let (width, height) = rgba.dimensions();

        let label = path.display().to_string();
        let id = canvas.create_texture(&rgba, &label)
            .map_err(|reason| TextureError::Create { path: path.to_path_buf(), reason })?;

        log::info!("Loaded texture {id:?} {width}x{height} from '{label}'");
        self.texture = Some(id);
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn release<C: TextureCanvas + ?Sized>(&mut self, canvas: &mut C) {
        if let Some(id) = self.texture.take() {
            log::debug!("Releasing texture {id:?}");
            canvas.destroy_texture(id);
        }
        self.width = 0;
        self.height = 0;
    }

    /// Draws with the top-left corner at (`x`, `y`) at the image's own size.
    pub fn render<C: TextureCanvas + ?Sized>(&self, canvas: &mut C, x: i32, y: i32) -> Result<(), RenderError> {
        self.render_stretched(canvas, Rect2I::new(x, y, self.width as i32, self.height as i32))
    }

    pub fn render_stretched<C: TextureCanvas + ?Sized>(&self, canvas: &mut C, dest: Rect2I) -> Result<(), RenderError> {
        let id = self.texture.ok_or(RenderError::NothingLoaded)?;
        canvas.draw_texture(id, dest)
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    pub fn id(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for TextureHandle {
    fn drop(&mut self) {
        if let Some(id) = self.texture {
            log::warn!("Texture {id:?} dropped without release, it lives until its canvas is dropped");
        }
    }
}
