pub mod stages;

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc
    }
};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{
        ElementState,
        WindowEvent
    },
    event_loop::{
        ActiveEventLoop,
        ControlFlow,
        EventLoop
    },
    window::{
        Window,
        WindowId
    }
};

use crate::{
    config::AppConfig,
    error::AppError,
    game::input::{KeyCode, KeyInput},
    rendering::renderer::Renderer
};

use self::stages::{AppStage, Stage};

/// Everything the loop needs, owned in one place.
pub struct AppContext {
    config: AppConfig,
    renderer: Option<Renderer>,
    stage: AppStage,
    quit: Arc<AtomicBool>,
    failure: Option<AppError>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let stage = AppStage::new(config.stage, &config);
        Self {
            config,
            renderer: None,
            stage,
            quit: Arc::new(AtomicBool::new(false)),
            failure: None,
        }
    }

    /// Shared flag, setting it ends the loop at the next iteration.
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        self.quit.clone()
    }

    fn request_quit(&self) {
        self.quit.store(true, Ordering::Relaxed);
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.screen_width, self.config.screen_height))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| AppError::Initialization(format!("Window could not be created: {e}")))?,
        );

        let mut renderer = pollster::block_on(Renderer::new(window.clone(), &self.config))?;

        if let Err(e) = self.stage.load(&mut renderer, &self.config) {
            // Some textures may already be in
            self.stage.release(&mut renderer);
            return Err(e.into());
        }

        self.renderer = Some(renderer);
        window.request_redraw();
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), AppError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        self.stage.update();
        self.stage.draw(renderer)?;
        renderer.render()?;

        // Emits a new redraw requested event.
        renderer.get_window().request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.failure = Some(error);
        self.request_quit();
        event_loop.exit();
    }

    fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            self.stage.release(&mut renderer);
            log::info!("Renderer dropped with {} textures left", renderer.texture_count());
        }
    }

    pub fn take_failure(&mut self) -> Option<AppError> {
        self.failure.take()
    }
}

impl ApplicationHandler for AppContext {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() || self.failure.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.renderer.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                self.request_quit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.draw_frame() {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::Resized(size) => {
                // Always followed by a redraw request
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
            },
            WindowEvent::KeyboardInput { device_id: _, event, is_synthetic: _ } => {
                let input = KeyInput::from_winit(&event.logical_key, event.state, event.repeat);
                if input.key == KeyCode::Escape && event.state == ElementState::Pressed {
                    log::info!("Escape pressed; stopping");
                    self.request_quit();
                } else {
                    self.stage.handle_key(input);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.quit.load(Ordering::Relaxed) {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Runs the configured stage until the window closes.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    config.validate(Path::new("<command line>"))?;

    let event_loop = EventLoop::new()?;

    // Render as fast as the present mode allows
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = AppContext::new(config);

    let quit = app.quit_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Captured ctrl-C, shutting down...");
        quit.store(true, Ordering::Relaxed);
    }) {
        log::warn!("Ctrl-C handler not installed, reason='{e}'");
    }

    let result = event_loop.run_app(&mut app);
    app.teardown();
    result?;

    match app.take_failure() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
