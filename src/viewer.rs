//! Standalone demo window backed by winit.
//!
//! Hosts a [`TextureView`] showing a generated test pattern. The window plays
//! the part of the host UI: it forwards layout changes to
//! [`TextureView::resize`] and calls [`TextureView::draw`] on every redraw.
//!
//! Keys: `1` stretch, `2` aspect-fill, `3` aspect-fit, `A` toggles
//! auto-resize, `Escape` quits.
//!
//! ```no_run
//! # use texview::Viewer;
//! Viewer::builder().with_title("Pattern").build().run().unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    error::{PipelineError, TexviewError},
    fit::ContentFit,
    gpu::{
        texture::{checkerboard_rgba8, create_source_texture},
        WgpuBackend,
    },
    options::ViewOptions,
    surface::{PixelSize, ViewBounds},
    view::TextureView,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: ViewOptions,
    title: String,
    pattern_size: PixelSize,
}

impl ViewerBuilder {
    /// Create a builder with defaults (title "texview", default options,
    /// a 640x360 pattern).
    fn new() -> Self {
        Self {
            options: ViewOptions::default(),
            title: "texview".into(),
            pattern_size: PixelSize::new(640, 360),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the pixel size of the displayed test pattern.
    #[must_use]
    pub fn with_pattern_size(mut self, size: PixelSize) -> Self {
        self.pattern_size = size;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options,
            title: self.title,
            pattern_size: self.pattern_size,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays a test-pattern texture.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: ViewOptions,
    title: String,
    pattern_size: PixelSize,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), TexviewError> {
        let event_loop = EventLoop::new()
            .map_err(|e| TexviewError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            view: None,
            options: self.options,
            title: self.title,
            pattern_size: self.pattern_size,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| TexviewError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    view: Option<TextureView<WgpuBackend>>,
    options: ViewOptions,
    title: String,
    pattern_size: PixelSize,
}

/// Host layout bounds for a window's physical inner size.
fn view_bounds(inner: PhysicalSize<u32>, scale_factor: f64) -> ViewBounds {
    let logical = inner.to_logical::<f64>(scale_factor);
    ViewBounds::new(logical.width, logical.height, scale_factor)
}

/// Create the wgpu device and surface for `window` and wrap them in a view
/// showing the test pattern.
async fn create_view(
    window: Arc<Window>,
    options: &ViewOptions,
    pattern_size: PixelSize,
) -> Result<TextureView<WgpuBackend>, TexviewError> {
    let instance = wgpu::Instance::default();
    let surface = instance
        .create_surface(Arc::clone(&window))
        .map_err(|e| TexviewError::Viewer(e.to_string()))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(&surface),
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        })
        .await
        .map_err(|e| TexviewError::Viewer(e.to_string()))?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("TextureView Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        })
        .await
        .map_err(|e| TexviewError::Viewer(e.to_string()))?;

    let backend = WgpuBackend::new(&adapter, device, queue, surface);
    let format = backend.preferred_format().ok_or_else(|| {
        PipelineError::UnsupportedFormat("surface reports no formats".into())
    })?;

    let pattern = create_source_texture(
        backend.device(),
        backend.queue(),
        "Test Pattern",
        pattern_size,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        &checkerboard_rgba8(pattern_size, 32),
    );

    let mut view = TextureView::new(backend, format, options)?;
    view.set_texture(Some(pattern));
    view.resize(view_bounds(window.inner_size(), window.scale_factor()));
    Ok(view)
}

impl ViewerApp {
    fn relayout(&mut self) {
        if let (Some(window), Some(view)) = (&self.window, &mut self.view) {
            view.resize(view_bounds(window.inner_size(), window.scale_factor()));
        }
    }

    fn handle_key(&mut self, key: Key<&str>, event_loop: &ActiveEventLoop) {
        let Some(view) = &mut self.view else {
            return;
        };
        match key {
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character("1") => view.set_content_fit(ContentFit::Stretch),
            Key::Character("2") => {
                view.set_content_fit(ContentFit::AspectFill);
            }
            Key::Character("3") => {
                view.set_content_fit(ContentFit::AspectFit);
            }
            Key::Character("a" | "A") => {
                let enabled = !view.auto_resize();
                view.set_auto_resize(enabled);
                log::info!("auto-resize {enabled}");
            }
            _ => return,
        }
        log::info!("content fit: {:?}", view.content_fit());
    }

    fn redraw(&mut self) {
        let (Some(window), Some(view)) = (&self.window, &mut self.view) else {
            return;
        };

        let mut encoder = view.backend().create_encoder();
        let frame = view.draw(&mut encoder, None, None);
        let _ = view.backend().queue().submit(Some(encoder.finish()));
        if let Some(frame) = frame {
            window.pre_present_notify();
            frame.present(view.backend().queue());
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(960.0, 540.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let view = match pollster::block_on(create_view(
            Arc::clone(&window),
            &self.options,
            self.pattern_size,
        )) {
            Ok(view) => view,
            Err(e) => {
                log::error!("Failed to initialize texture view: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.view = Some(view);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. } => self.relayout(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed =>
            {
                self.handle_key(event.logical_key.as_ref(), event_loop);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}
