use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, warn};
use raw_window_handle::HasRawWindowHandle;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::CursorGrabMode;

use crate::graphics::{GraphicsError, GraphicsResult};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub initial_dimensions: Dimensions,
    pub title: String,
}

impl WindowInfo {
    /// Opens the window and makes an OpenGL 3.3 core context with a depth buffer current on it
    pub(crate) fn build<T: 'static>(
        self,
        window_target: &EventLoopWindowTarget<T>,
    ) -> GraphicsResult<(Window, glow::Context)> {
        let window_builder = winit::window::WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.initial_dimensions.width),
                f64::from(self.initial_dimensions.height),
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(64, 64));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (winit_window, config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(window_target, template, pick_config)
            .map_err(|e| GraphicsError::ContextCreation(e.to_string()))?;
        let winit_window = winit_window
            .ok_or_else(|| GraphicsError::Window("no window was created".into()))?;

        let display = config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(winit_window.raw_window_handle()));
        let context = unsafe { display.create_context(&config, &context_attributes) }
            .map_err(|e| GraphicsError::ContextCreation(e.to_string()))?;

        let surface_attributes = winit_window.build_surface_attributes(Default::default());
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .map_err(|e| GraphicsError::ContextCreation(e.to_string()))?;
        let context = context
            .make_current(&surface)
            .map_err(|e| GraphicsError::ContextCreation(e.to_string()))?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!("Could not enable vsync: {}", e);
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };

        Ok((Window::new(winit_window, surface, context), gl))
    }
}

// prefers the config with the most samples
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("glutin only calls the picker with at least one config")
}

// the surface and context are dropped before the window they render to
pub struct Window {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    /// The winit window
    pub(crate) winit_window: winit::window::Window,
}

impl Window {
    fn new(
        winit_window: winit::window::Window,
        surface: Surface<WindowSurface>,
        context: PossiblyCurrentContext,
    ) -> Self {
        Self {
            surface,
            context,
            winit_window,
        }
    }

    pub fn inner_size(&self) -> Dimensions {
        let size = self.winit_window.inner_size();
        Dimensions {
            width: size.width,
            height: size.height,
        }
    }

    /// Resizes the GL surface; a minimized window (zero size) is ignored
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }

    pub fn swap_buffers(&self) {
        if let Err(e) = self.surface.swap_buffers(&self.context) {
            warn!("Failed to swap buffers: {}", e);
        }
    }

    pub fn set_title(&self, title: &str) {
        self.winit_window.set_title(title);
    }

    pub fn request_redraw(&self) {
        self.winit_window.request_redraw();
    }

    // hides and grabs the cursor; not every platform supports both grab modes
    fn capture_cursor(&self, capture: bool) {
        self.winit_window.set_cursor_visible(!capture);

        let result = if capture {
            self.winit_window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.winit_window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.winit_window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            debug!("Cursor grab unavailable: {}", e);
        }
    }

    // window is started with focused state
    pub(crate) fn on_start(&self) {
        self.capture_cursor(true);
    }

    // we want the cursor to be visible, whenever the window is not active
    pub(crate) fn on_focus(&self, focus: bool) {
        self.capture_cursor(focus);
    }
}
