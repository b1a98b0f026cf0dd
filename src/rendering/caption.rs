use glyphon::{
    Attrs, Buffer, Cache, Color as GlyphonColor, Family, FontSystem, Metrics, Resolution, Shaping,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use crate::error::RenderError;

const CAPTION_FONT_SIZE: f32 = 18.0;
const CAPTION_MARGIN: f32 = 8.0;

/// Single line of text drawn over the top-left corner of the window.
pub struct CaptionOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    text_atlas: TextAtlas,
    text_renderer: TextRenderer,
    viewport: Viewport,
    text_buffer: Buffer,
}

impl CaptionOverlay {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        text: &str,
        width: u32,
        height: u32,
    ) -> Self {
        // System fonts
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let mut text_atlas = TextAtlas::new(device, queue, &cache, format);
        let text_renderer = TextRenderer::new(
            &mut text_atlas,
            device,
            wgpu::MultisampleState::default(),
            None,
        );
        let viewport = Viewport::new(device, &cache);

        let mut text_buffer = Buffer::new(
            &mut font_system,
            Metrics::new(CAPTION_FONT_SIZE, CAPTION_FONT_SIZE * 1.2)
        );
        text_buffer.set_size(&mut font_system, Some(width as f32), Some(height as f32));
        text_buffer.set_text(&mut font_system, text, Attrs::new().family(Family::SansSerif), Shaping::Advanced);
        text_buffer.shape_until_scroll(&mut font_system, false);

        log::info!("Caption overlay enabled: '{text}'");

        Self {
            font_system,
            swash_cache,
            text_atlas,
            text_renderer,
            viewport,
            text_buffer,
        }
    }

    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) -> Result<(), RenderError> {
        self.viewport.update(queue, Resolution { width, height });

        self.text_renderer
            .prepare(
                device,
                queue,
                &mut self.font_system,
                &mut self.text_atlas,
                &self.viewport,
                [TextArea {
                    buffer: &self.text_buffer,
                    left: CAPTION_MARGIN,
                    top: CAPTION_MARGIN,
                    scale: 1.0,
                    bounds: TextBounds {
                        left: 0,
                        top: 0,
                        right: width as i32,
                        bottom: height as i32,
                    },
                    default_color: GlyphonColor::rgb(0, 0, 0),
                    custom_glyphs: &[],
                }],
                &mut self.swash_cache,
            )
            .map_err(|e| RenderError::Caption(e.to_string()))
    }

    pub fn render(&self, renderpass: &mut wgpu::RenderPass<'_>) -> Result<(), RenderError> {
        self.text_renderer
            .render(&self.text_atlas, &self.viewport, renderpass)
            .map_err(|e| RenderError::Caption(e.to_string()))
    }

    /// Frees glyphs not used in the last frame.
    pub fn trim(&mut self) {
        self.text_atlas.trim();
    }
}
