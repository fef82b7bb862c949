//! The seam between [`TextureView`](crate::TextureView) and a graphics API.
//!
//! The view decides *whether* and *with what* to draw; a [`Backend`] knows
//! how to configure a surface, build the blit pipeline, hand out drawables
//! and record the blit into a caller-owned command recorder.

use crate::{
    error::PipelineError,
    fit::FitScale,
    frame_gate::FramePermit,
    surface::{PixelSize, SurfaceSettings},
};

/// A graphics API capable of presenting a texture on a surface.
pub trait Backend {
    /// Handle to a source texture. The view never mutates it.
    type Texture;
    /// Presentation pixel format.
    type Format: Copy + PartialEq + std::fmt::Debug;
    /// A presentable surface slot.
    type Drawable;
    /// Caller-owned command recorder the blit is recorded into.
    type Recorder;
    /// An open render pass, handed to [`RenderCommands`].
    type Pass<'p>;
    /// Synchronization primitive waited on before the blit's fragment work.
    type Fence;
    /// A recorded frame awaiting presentation; owns the drawable and the
    /// in-flight slot.
    type Frame;

    /// Pixel dimensions of `texture`.
    fn texture_size(&self, texture: &Self::Texture) -> PixelSize;

    /// Whether the blit pipeline can sample `texture`. Textures it cannot
    /// sample are never handed to [`encode_blit`](Self::encode_blit).
    fn can_display(&self, _texture: &Self::Texture) -> bool {
        true
    }

    /// The view stopped displaying its texture. Drop anything derived from
    /// it so the caller's texture is not kept alive.
    fn release_texture(&mut self) {}

    /// Largest drawable width or height the surface accepts.
    fn max_surface_dimension(&self) -> u32 {
        u32::MAX
    }

    /// Apply surface settings. Called whenever size, format, colorspace or
    /// frame limit change. An empty size must leave the surface unable to
    /// supply drawables.
    fn configure(&mut self, settings: &SurfaceSettings<Self::Format>);

    /// (Re)build the blit pipeline for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the format is unsupported or the backend
    /// rejects the shader or pipeline.
    fn build_pipeline(
        &mut self,
        settings: &SurfaceSettings<Self::Format>,
    ) -> Result<(), PipelineError>;

    /// The next drawable, or `None` if the surface cannot supply one right
    /// now. `None` is an expected condition, not an error.
    fn next_drawable(&mut self) -> Option<Self::Drawable>;

    /// Record the blit of `command.texture` into `drawable`: clear to
    /// transparent, bind the pipeline and projection, draw a 4-vertex
    /// triangle strip, then let `extra` add commands to the same pass.
    fn encode_blit(
        &mut self,
        recorder: &mut Self::Recorder,
        drawable: &Self::Drawable,
        command: BlitCommand<'_, Self>,
        extra: Option<&mut dyn RenderCommands<Self>>,
    );

    /// Wrap a recorded drawable into a frame for the caller to present.
    fn finish(
        &mut self,
        drawable: Self::Drawable,
        permit: FramePermit,
    ) -> Self::Frame;

    /// Called once when a draw finds every frame slot taken, before it
    /// blocks. Backends that only deliver completions while polled should
    /// poll here.
    fn wait_for_presented_frames(&mut self) {}
}

/// Inputs to one blit.
pub struct BlitCommand<'a, B: Backend + ?Sized> {
    /// Texture to sample.
    pub texture: &'a B::Texture,
    /// Projection scale for the quad.
    pub scale: FitScale,
    /// Optional fence to wait on before fragment work.
    pub fence: Option<&'a B::Fence>,
}

/// Additional drawing layered onto the blit's render pass.
pub trait RenderCommands<B: Backend + ?Sized> {
    /// Record commands into the open pass, after the blit draw call.
    fn record(&mut self, pass: &mut B::Pass<'_>);
}
