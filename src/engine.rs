use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, warn};
use raw_window_handle::HasRawWindowHandle;
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to create window: {0}")]
    Window(String),
    #[error("Failed to create OpenGL context: {0}")]
    Context(String),
    #[error("Failed to create GL surface: {0}")]
    Surface(String),
}

/// The window and its current OpenGL context.
///
/// All GPU-facing operations hang off this type, so a live context is
/// required to compile shaders, upload buffers or draw.
pub struct GlContext {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl GlContext {
    pub fn new(event_loop: &EventLoop<()>, config: &AppConfig) -> Result<Self, EngineError> {
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .map_err(|err| EngineError::Window(err.to_string()))?;

        let window = window.ok_or_else(|| EngineError::Window("no window was created".into()))?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| EngineError::Context(err.to_string()))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|err| EngineError::Surface(err.to_string()))?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .map_err(|err| EngineError::Context(err.to_string()))?;

        // Load OpenGL functions
        gl::load_with(|symbol| {
            let symbol = CString::new(symbol).unwrap();
            gl_display.get_proc_address(symbol.as_c_str()) as *const _
        });

        if config.window.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::new(1).unwrap());
            if let Err(err) = gl_surface.set_swap_interval(&gl_context, interval) {
                warn!("Failed to enable vsync: {}", err);
            }
        }

        let [r, g, b, a] = config.render.clear_color;
        let size = window.inner_size();
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }

        info!("OpenGL context ready ({}x{})", size.width, size.height);

        Ok(Self {
            window,
            gl_context,
            gl_surface,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Keeps the surface and viewport in step with the window size.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        self.gl_surface.resize(&self.gl_context, width, height);
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), glutin::error::Error> {
        self.gl_surface.swap_buffers(&self.gl_context)
    }
}
