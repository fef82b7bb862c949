//! The texture view: keeps a drawable surface sized to its host view and
//! blits one texture onto it per [`draw`](TextureView::draw) call.

use crate::{
    backend::{Backend, BlitCommand, RenderCommands},
    error::TexviewError,
    fit::{ContentFit, FitScale, Projection},
    frame_gate::FrameGate,
    options::{clamp_frames_in_flight, ViewOptions},
    surface::{ColorSpace, PixelSize, SurfaceSettings, ViewBounds},
};

/// Displays a GPU texture on a presentation surface, like an image view
/// backed by a texture instead of a bitmap.
///
/// The view has no render loop: the host calls [`draw`](Self::draw) once per
/// frame with its own command recorder, submits the recorder, then presents
/// the returned frame.
pub struct TextureView<B: Backend> {
    backend: B,
    texture: Option<B::Texture>,
    /// Whether the backend can sample `texture`.
    displayable: bool,
    projection: Projection,
    drawable_size: PixelSize,
    auto_resize: bool,
    last_bounds: Option<ViewBounds>,
    pixel_format: B::Format,
    color_space: Option<ColorSpace>,
    max_frames_in_flight: u32,
    gate: FrameGate,
}

impl<B: Backend> TextureView<B> {
    /// Create a view presenting in `pixel_format`.
    ///
    /// The drawable starts empty; nothing is drawn until the first
    /// [`resize`](Self::resize) or [`set_drawable_size`](Self::set_drawable_size).
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::Pipeline`] if the backend cannot build the
    /// blit pipeline for this configuration.
    pub fn new(
        mut backend: B,
        pixel_format: B::Format,
        options: &ViewOptions,
    ) -> Result<Self, TexviewError> {
        let max_frames_in_flight = options.clamped_frames_in_flight();
        let settings = SurfaceSettings {
            size: PixelSize::default(),
            format: pixel_format,
            color_space: options.color_space,
            max_frames_in_flight,
        };
        backend.build_pipeline(&settings)?;
        backend.configure(&settings);

        Ok(Self {
            backend,
            texture: None,
            displayable: false,
            projection: Projection::new(settings.size, options.content_fit),
            drawable_size: settings.size,
            auto_resize: options.auto_resize,
            last_bounds: None,
            pixel_format,
            color_space: options.color_space,
            max_frames_in_flight,
            gate: FrameGate::new(max_frames_in_flight as usize),
        })
    }

    fn settings(&self) -> SurfaceSettings<B::Format> {
        SurfaceSettings {
            size: self.drawable_size,
            format: self.pixel_format,
            color_space: self.color_space,
            max_frames_in_flight: self.max_frames_in_flight,
        }
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Track a layout change of the host view. Sets the drawable size to
    /// `bounds × scale_factor` when auto-resize is on; otherwise only
    /// remembers the bounds.
    pub fn resize(&mut self, bounds: ViewBounds) {
        self.last_bounds = Some(bounds);
        if self.auto_resize {
            self.set_drawable_size(bounds.pixel_size());
        }
    }

    /// Set the drawable size explicitly. Each axis is clamped to the
    /// largest dimension the backend's surface accepts.
    pub fn set_drawable_size(&mut self, size: PixelSize) {
        let max = self.backend.max_surface_dimension();
        let size = PixelSize::new(size.width.min(max), size.height.min(max));
        if size == self.drawable_size {
            return;
        }
        log::debug!(
            "drawable size {}x{} -> {}x{}",
            self.drawable_size.width,
            self.drawable_size.height,
            size.width,
            size.height
        );
        self.drawable_size = size;
        self.projection.set_surface_size(size);
        let settings = self.settings();
        self.backend.configure(&settings);
    }

    /// Current drawable size in pixels.
    #[must_use]
    pub fn drawable_size(&self) -> PixelSize {
        self.drawable_size
    }

    /// Enable or disable following layout changes. Enabling applies the
    /// last bounds passed to [`resize`](Self::resize).
    pub fn set_auto_resize(&mut self, enabled: bool) {
        self.auto_resize = enabled;
        if let (true, Some(bounds)) = (enabled, self.last_bounds) {
            self.set_drawable_size(bounds.pixel_size());
        }
    }

    /// Whether layout changes resize the drawable.
    #[must_use]
    pub fn auto_resize(&self) -> bool {
        self.auto_resize
    }

    // ── Content ─────────────────────────────────────────────────────────

    /// Replace the displayed texture. `None` clears the view: subsequent
    /// draws do nothing. A texture the backend cannot sample is kept but
    /// never drawn.
    pub fn set_texture(&mut self, texture: Option<B::Texture>) {
        if self.texture.is_some() {
            self.backend.release_texture();
        }
        self.displayable = match &texture {
            Some(t) if self.backend.can_display(t) => true,
            Some(_) => {
                log::warn!("texture cannot be sampled by the blit pipeline");
                false
            }
            None => false,
        };
        let size = texture.as_ref().map(|t| self.backend.texture_size(t));
        self.projection.set_texture_size(size);
        self.texture = texture;
    }

    /// The displayed texture, if any.
    #[must_use]
    pub fn texture(&self) -> Option<&B::Texture> {
        self.texture.as_ref()
    }

    /// Change how the texture is fitted onto the drawable.
    pub fn set_content_fit(&mut self, mode: ContentFit) {
        self.projection.set_mode(mode);
    }

    /// Current content-fit mode.
    #[must_use]
    pub fn content_fit(&self) -> ContentFit {
        self.projection.mode()
    }

    /// The projection scale the next draw will use.
    pub fn projection_scale(&mut self) -> FitScale {
        self.projection.resolve()
    }

    /// The underlying projection cache.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    // ── Presentation ────────────────────────────────────────────────────

    /// Change the presentation pixel format and rebuild the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::Pipeline`] if the backend cannot build a
    /// pipeline for `format`; the previous format stays in effect.
    pub fn set_pixel_format(
        &mut self,
        format: B::Format,
    ) -> Result<(), TexviewError> {
        if format == self.pixel_format {
            return Ok(());
        }
        let settings = SurfaceSettings {
            format,
            ..self.settings()
        };
        self.backend.build_pipeline(&settings)?;
        log::info!("pixel format {:?} -> {format:?}", self.pixel_format);
        self.pixel_format = format;
        self.backend.configure(&settings);
        Ok(())
    }

    /// Presentation pixel format.
    #[must_use]
    pub fn pixel_format(&self) -> B::Format {
        self.pixel_format
    }

    /// Change the drawable colorspace.
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::Pipeline`] if the backend cannot build a
    /// pipeline for the resulting target; the previous colorspace stays in
    /// effect.
    pub fn set_color_space(
        &mut self,
        color_space: Option<ColorSpace>,
    ) -> Result<(), TexviewError> {
        if color_space == self.color_space {
            return Ok(());
        }
        let settings = SurfaceSettings {
            color_space,
            ..self.settings()
        };
        self.backend.build_pipeline(&settings)?;
        self.color_space = color_space;
        self.backend.configure(&settings);
        Ok(())
    }

    /// Drawable colorspace override.
    #[must_use]
    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    /// Change how many frames may be awaiting presentation at once
    /// (clamped to `1..=3`).
    pub fn set_max_frames_in_flight(&mut self, count: u32) {
        let count = clamp_frames_in_flight(count);
        if count == self.max_frames_in_flight {
            return;
        }
        self.max_frames_in_flight = count;
        self.gate.set_capacity(count as usize);
        let settings = self.settings();
        self.backend.configure(&settings);
    }

    /// Frames-in-flight limit.
    #[must_use]
    pub fn max_frames_in_flight(&self) -> u32 {
        self.max_frames_in_flight
    }

    /// Frames recorded but not yet released by presentation.
    #[must_use]
    pub fn frames_in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// The graphics backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the graphics backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── Draw ────────────────────────────────────────────────────────────

    /// Record the texture blit into `recorder`.
    ///
    /// Returns `None` without touching the backend when no texture is set,
    /// the texture cannot be sampled or the drawable is empty, and `None` when the surface has no drawable
    /// available; both are expected and the caller simply tries again next
    /// frame. Blocks while the frames-in-flight limit is reached.
    ///
    /// `extra` records additional commands into the same pass after the
    /// blit. `fence` is waited on before the blit's fragment work. The
    /// recorder is never submitted here; submit it, then present the
    /// returned frame.
    pub fn draw(
        &mut self,
        recorder: &mut B::Recorder,
        extra: Option<&mut dyn RenderCommands<B>>,
        fence: Option<&B::Fence>,
    ) -> Option<B::Frame> {
        let texture = self.texture.as_ref()?;
        if !self.displayable || self.drawable_size.is_empty() {
            return None;
        }

        let backend = &mut self.backend;
        let permit = self
            .gate
            .acquire_with(|| backend.wait_for_presented_frames());
        let drawable = backend.next_drawable()?;

        let command = BlitCommand {
            texture,
            scale: self.projection.resolve(),
            fence,
        };
        backend.encode_blit(recorder, &drawable, command, extra);
        Some(backend.finish(drawable, permit))
    }
}
