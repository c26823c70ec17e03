//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. It moves through
//! three phases: [`FramePhase::Initializing`] until the window, GPU, shader
//! and assets are ready, [`FramePhase::Running`] while frames are drawn, and
//! [`FramePhase::Terminating`] once Escape is pressed, the window is closed
//! or initialization fails.

use std::sync::Arc;

use orrery_config::{Config, ConfigError};
use orrery_input::{KeyboardState, MouseState};
use orrery_render::{
    BODY_SHADER_SOURCE, FrameUniform, RenderContext, RenderContextError, RendererError,
    SceneRenderer, ShaderError, SurfaceError, SurfaceSize, compile_shader,
    init_render_context_blocking, resolve_source,
};
use orrery_scene::Scene;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::body_assets::load_body_assets;
use crate::frame_clock::FrameClock;
use crate::platform::PlatformError;

/// Anything that stops the program before or during initialization.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("shader: {0}")]
    Shader(#[from] ShaderError),

    #[error("renderer setup: {0}")]
    Renderer(#[from] RendererError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Initializing,
    Running,
    Terminating,
}

/// Window attributes from the `window` config section. Sizes are physical.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::PhysicalSize::new(
            config.window.width,
            config.window.height,
        ))
}

pub struct AppState {
    config: Config,
    phase: FramePhase,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    surface_size: SurfaceSize,
    scene: Scene,
    keyboard_state: KeyboardState,
    mouse_state: MouseState,
    clock: FrameClock,
    init_error: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let scene = Scene::new(&config.scene.bodies, &config.camera);
        let surface_size = SurfaceSize::new(config.window.width, config.window.height);
        Self {
            config,
            phase: FramePhase::Initializing,
            window: None,
            gpu: None,
            renderer: None,
            surface_size,
            scene,
            keyboard_state: KeyboardState::new(),
            mouse_state: MouseState::new(),
            clock: FrameClock::new(),
            init_error: None,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Takes the error that aborted initialization, if any.
    pub fn take_init_error(&mut self) -> Option<AppError> {
        self.init_error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let inner = window.inner_size();
        self.surface_size = SurfaceSize::new(inner.width, inner.height);
        info!("Window created: {}x{}", inner.width, inner.height);

        let gpu = init_render_context_blocking(
            window.clone(),
            self.config.window.vsync,
            self.config.window.msaa_samples,
        )?;

        let shader_path = self
            .config
            .assets
            .shader
            .as_ref()
            .map(|path| self.config.assets.resolve(path));
        let source = resolve_source(BODY_SHADER_SOURCE, shader_path.as_deref())?;
        let shader = compile_shader(&gpu.device, "body", &source)?;

        let assets = load_body_assets(&self.config.assets, &self.config.scene.bodies);
        let renderer = SceneRenderer::new(&gpu, &shader, &assets)?;

        self.mouse_state.set_captured(&window, true);
        window.request_redraw();

        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.window = Some(window);
        self.clock.reset();
        self.phase = FramePhase::Running;
        info!("Initialization complete, {} bodies", self.scene.bodies.len());
        Ok(())
    }

    /// Records a failed initialization and moves to Terminating.
    fn fail_initialization(&mut self, err: AppError) {
        error!("{err}");
        self.init_error = Some(err);
        self.enter_terminating();
    }

    /// Releases every GPU resource. The window goes last, after the surface
    /// that refers to it.
    fn enter_terminating(&mut self) {
        if self.phase == FramePhase::Terminating && self.gpu.is_none() {
            return;
        }
        self.phase = FramePhase::Terminating;
        if let Some(window) = &self.window {
            self.mouse_state.set_captured(window, false);
        }
        self.renderer = None;
        self.gpu = None;
        self.window = None;
        info!("Terminating after {} frames", self.clock.frame_count());
    }

    fn terminate(&mut self, event_loop: &ActiveEventLoop) {
        self.enter_terminating();
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some((w, h)) = self.surface_size.handle_resize(width, height) else {
            return;
        };
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, w, h);
            }
        }
        info!("Window resized to {w}x{h}");
    }

    /// One iteration of the Running phase.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != FramePhase::Running {
            return;
        }

        let frame = self.clock.tick();
        self.scene
            .handle_input(&self.keyboard_state, &self.mouse_state, frame.dt);
        self.scene.advance(frame.dt);

        let mut out_of_memory = false;
        if !self.surface_size.is_minimized()
            && let (Some(gpu), Some(renderer)) = (&mut self.gpu, &self.renderer)
        {
            let matrices = self.scene.frame_matrices(self.surface_size.aspect_ratio());
            let transforms = self.scene.body_transforms(&matrices);
            let lighting = &self.scene.lighting;
            let uniform = FrameUniform::new(
                self.scene.camera.position,
                lighting.light_color(frame.elapsed),
                lighting.mode,
            );
            renderer.prepare(&gpu.queue, &uniform, &transforms);

            match gpu.get_current_texture() {
                Ok(surface_texture) => renderer.render(gpu, surface_texture),
                Err(SurfaceError::Lost) => {
                    let (w, h) = (self.surface_size.width(), self.surface_size.height());
                    gpu.resize(w, h);
                }
                Err(SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    out_of_memory = true;
                }
                Err(SurfaceError::Timeout) => {
                    warn!("Surface timeout, skipping frame");
                }
            }
        }

        if out_of_memory {
            self.terminate(event_loop);
            return;
        }

        self.keyboard_state.clear_transients();
        self.mouse_state.clear_transients();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != FramePhase::Initializing {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.fail_initialization(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.terminate(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    info!("Escape pressed, shutting down");
                    self.terminate(event_loop);
                    return;
                }
                self.keyboard_state.process_event(&event);
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    if let Some(window) = &self.window {
                        self.mouse_state.set_captured(window, true);
                    }
                } else {
                    // Releases are not delivered while unfocused.
                    self.keyboard_state.release_all();
                    self.mouse_state.set_captured_flag(false);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_state.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_state.on_scroll(delta);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse_state.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Runs the event loop until the window closes.
///
/// Returns the initialization error if the app never reached Running.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_init_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_starts_initializing() {
        let state = AppState::new(Config::default());
        assert_eq!(state.phase(), FramePhase::Initializing);
        assert!(state.window.is_none());
        assert!(state.gpu.is_none());
        assert_eq!(state.scene().bodies.len(), 6);
    }

    #[test]
    fn test_surface_size_from_config() {
        let mut config = Config::default();
        config.window.width = 800;
        config.window.height = 400;
        let state = AppState::new(config);
        assert!((state.surface_size.aspect_ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_failed_initialization_terminates() {
        let mut state = AppState::new(Config::default());
        state.fail_initialization(AppError::Shader(ShaderError::FileNotFound {
            path: PathBuf::from("missing.wgsl"),
        }));
        assert_eq!(state.phase(), FramePhase::Terminating);
        assert!(matches!(
            state.take_init_error(),
            Some(AppError::Shader(ShaderError::FileNotFound { .. }))
        ));
        assert!(state.take_init_error().is_none());
    }

    #[test]
    fn test_terminating_is_final() {
        let mut state = AppState::new(Config::default());
        state.phase = FramePhase::Running;
        state.enter_terminating();
        assert_eq!(state.phase(), FramePhase::Terminating);
        state.enter_terminating();
        assert_eq!(state.phase(), FramePhase::Terminating);
        assert!(state.renderer.is_none());
    }

    #[test]
    fn test_resize_without_gpu_tracks_size() {
        let mut state = AppState::new(Config::default());
        state.resize(1920, 1080);
        assert_eq!(state.surface_size.width(), 1920);
        state.resize(0, 0);
        assert!(state.surface_size.is_minimized());
    }

    #[test]
    fn test_error_messages_name_the_stage() {
        let err = AppError::from(ConfigError::Invalid("bad period".to_string()));
        assert!(err.to_string().starts_with("configuration"));
        let err = AppError::from(RenderContextError::NoAdapter);
        assert!(err.to_string().contains("GPU"));
        let err = AppError::from(RendererError::from(ShaderError::Compile {
            name: "body-pipeline".to_string(),
            message: "binding mismatch".to_string(),
        }));
        assert!(err.to_string().contains("binding mismatch"));
    }

    #[test]
    fn test_window_attributes_use_config_title() {
        let attrs = window_attributes_from_config(&Config::default());
        assert_eq!(attrs.title, "Space Explorer");
    }
}
