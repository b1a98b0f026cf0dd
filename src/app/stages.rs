use crate::{
    config::{AppConfig, StageKind},
    error::{RenderError, TextureError},
    game::{
        dot::Dot,
        input::{KeyCode, KeyInput, KeyState, MoveDirection},
        math::Rect2I
    },
    rendering::{
        texture::TextureHandle,
        ClearColor,
        TextureCanvas
    }
};

pub const HELLO_WORLD_IMAGE: &str = "hello_world.bmp";
pub const DOT_IMAGE: &str = "dot.bmp";

/// One tutorial program: owns its textures and reacts to keys.
pub trait Stage {
    fn load(&mut self, canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError>;

    fn handle_key(&mut self, _input: KeyInput) { }

    /// Once per frame, before drawing.
    fn update(&mut self) { }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError>;

    /// Safe to call on a stage that failed to load or was already released.
    fn release(&mut self, canvas: &mut dyn TextureCanvas);
}

fn screen_rect(config: &AppConfig) -> Rect2I {
    // Sizes past i32::MAX are rejected by AppConfig::validate
    let side = |value: u32| i32::try_from(value).unwrap_or(i32::MAX);
    Rect2I::new(0, 0, side(config.screen_width), side(config.screen_height))
}

#[derive(Debug)]
pub struct HelloStage {
    background: ClearColor,
}

impl HelloStage {
    pub fn new() -> Self {
        Self { background: ClearColor::WHITE }
    }
}

impl Default for HelloStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for HelloStage {
    fn load(&mut self, _canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError> {
        self.background = ClearColor::from_rgb(config.clear_color);
        Ok(())
    }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError> {
        canvas.set_clear_color(self.background);
        Ok(())
    }

    fn release(&mut self, _canvas: &mut dyn TextureCanvas) { }
}

#[derive(Debug, Default)]
pub struct BitmapStage {
    image: TextureHandle,
    screen: Rect2I,
}

impl BitmapStage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for BitmapStage {
    fn load(&mut self, canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError> {
        self.screen = screen_rect(config);
        self.image.load(canvas, &config.asset_path(HELLO_WORLD_IMAGE), None)
    }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError> {
        self.image.render_stretched(canvas, self.screen)
    }

    fn release(&mut self, canvas: &mut dyn TextureCanvas) {
        self.image.release(canvas);
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum KeyPressImage {
    #[default]
    Default,
    Up,
    Down,
    Left,
    Right,
}

impl KeyPressImage {
    pub const ALL: [KeyPressImage; 5] = [
        KeyPressImage::Default,
        KeyPressImage::Up,
        KeyPressImage::Down,
        KeyPressImage::Left,
        KeyPressImage::Right,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            KeyPressImage::Default => "press.bmp",
            KeyPressImage::Up => "up.bmp",
            KeyPressImage::Down => "down.bmp",
            KeyPressImage::Left => "left.bmp",
            KeyPressImage::Right => "right.bmp",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<MoveDirection> for KeyPressImage {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => KeyPressImage::Up,
            MoveDirection::Down => KeyPressImage::Down,
            MoveDirection::Left => KeyPressImage::Left,
            MoveDirection::Right => KeyPressImage::Right,
        }
    }
}

#[derive(Debug, Default)]
pub struct KeySelectStage {
    images: [TextureHandle; 5],
    current: KeyPressImage,
    screen: Rect2I,
}

impl KeySelectStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> KeyPressImage {
        self.current
    }

    pub fn image(&self, which: KeyPressImage) -> &TextureHandle {
        &self.images[which.index()]
    }
}

impl Stage for KeySelectStage {
    fn load(&mut self, canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError> {
        self.screen = screen_rect(config);
        for which in KeyPressImage::ALL {
            self.images[which.index()].load(canvas, &config.asset_path(which.file_name()), None)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, input: KeyInput) {
        if input.state != KeyState::Pressed {
            return;
        }
        self.current = match input.key {
            KeyCode::Arrow(direction) => direction.into(),
            KeyCode::Escape => return,
            KeyCode::Other => KeyPressImage::Default,
        };
        log::debug!("Showing {:?} image", self.current);
    }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError> {
        self.images[self.current.index()].render_stretched(canvas, self.screen)
    }

    fn release(&mut self, canvas: &mut dyn TextureCanvas) {
        for image in self.images.iter_mut() {
            image.release(canvas);
        }
    }
}

#[derive(Debug)]
pub struct DotStage {
    dot: Dot,
    background: ClearColor,
}

impl DotStage {
    pub fn new(config: &AppConfig) -> Self {
        let bounds = screen_rect(config).size;
        Self {
            dot: Dot::new(bounds),
            background: ClearColor::from_rgb(config.clear_color),
        }
    }

    pub fn dot(&self) -> &Dot {
        &self.dot
    }
}

impl Stage for DotStage {
    fn load(&mut self, canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError> {
        self.dot.load_texture(canvas, &config.asset_path(DOT_IMAGE), config.color_key)
    }

    fn handle_key(&mut self, input: KeyInput) {
        // Held keys already adjusted the velocity
        if input.repeat {
            return;
        }
        self.dot.handle_key(input);
    }

    fn update(&mut self) {
        self.dot.step();
    }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError> {
        canvas.set_clear_color(self.background);
        self.dot.render(canvas)
    }

    fn release(&mut self, canvas: &mut dyn TextureCanvas) {
        self.dot.release_texture(canvas);
    }
}

#[derive(Debug)]
pub enum AppStage {
    Hello(HelloStage),
    Bitmap(BitmapStage),
    KeySelect(KeySelectStage),
    Dot(DotStage),
}

impl AppStage {
    pub fn new(kind: StageKind, config: &AppConfig) -> Self {
        match kind {
            StageKind::Hello => AppStage::Hello(HelloStage::new()),
            StageKind::Bitmap => AppStage::Bitmap(BitmapStage::new()),
            StageKind::KeySelect => AppStage::KeySelect(KeySelectStage::new()),
            StageKind::Dot => AppStage::Dot(DotStage::new(config)),
        }
    }

    pub fn kind(&self) -> StageKind {
        match self {
            AppStage::Hello(_) => StageKind::Hello,
            AppStage::Bitmap(_) => StageKind::Bitmap,
            AppStage::KeySelect(_) => StageKind::KeySelect,
            AppStage::Dot(_) => StageKind::Dot,
        }
    }

    fn as_stage_mut(&mut self) -> &mut dyn Stage {
        match self {
            AppStage::Hello(stage) => stage,
            AppStage::Bitmap(stage) => stage,
            AppStage::KeySelect(stage) => stage,
            AppStage::Dot(stage) => stage,
        }
    }

    fn as_stage(&self) -> &dyn Stage {
        match self {
            AppStage::Hello(stage) => stage,
            AppStage::Bitmap(stage) => stage,
            AppStage::KeySelect(stage) => stage,
            AppStage::Dot(stage) => stage,
        }
    }
}

impl Stage for AppStage {
    fn load(&mut self, canvas: &mut dyn TextureCanvas, config: &AppConfig) -> Result<(), TextureError> {
        log::info!("Loading stage {:?}", self.kind());
        self.as_stage_mut().load(canvas, config)
    }

    fn handle_key(&mut self, input: KeyInput) {
        self.as_stage_mut().handle_key(input)
    }

    fn update(&mut self) {
        self.as_stage_mut().update()
    }

    fn draw(&self, canvas: &mut dyn TextureCanvas) -> Result<(), RenderError> {
        self.as_stage().draw(canvas)
    }

    fn release(&mut self, canvas: &mut dyn TextureCanvas) {
        log::info!("Releasing stage {:?}", self.kind());
        self.as_stage_mut().release(canvas)
    }
}
