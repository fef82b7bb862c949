use super::{fit_scale, ContentFit, FitScale};
use crate::surface::PixelSize;

/// Lazily recomputed fit scale.
///
/// Setters only record inputs and mark the cache dirty when an input actually
/// changed; [`resolve`](Self::resolve) recomputes at most once per change.
#[derive(Debug, Clone)]
pub struct Projection {
    surface: PixelSize,
    texture: Option<PixelSize>,
    mode: ContentFit,
    scale: FitScale,
    dirty: bool,
    recomputes: u64,
}

impl Projection {
    /// A projection for the given surface size and mode with no texture.
    #[must_use]
    pub fn new(surface: PixelSize, mode: ContentFit) -> Self {
        Self {
            surface,
            texture: None,
            mode,
            scale: FitScale::IDENTITY,
            dirty: true,
            recomputes: 0,
        }
    }

    /// Record a new drawable size.
    pub fn set_surface_size(&mut self, size: PixelSize) {
        if self.surface != size {
            self.surface = size;
            self.dirty = true;
        }
    }

    /// Record the size of the texture being displayed. `None` (no texture)
    /// leaves the cached scale alone since nothing is drawn.
    pub fn set_texture_size(&mut self, size: Option<PixelSize>) {
        let Some(size) = size else {
            return;
        };
        if self.texture != Some(size) {
            self.texture = Some(size);
            self.dirty = true;
        }
    }

    /// Record a new content-fit mode.
    pub fn set_mode(&mut self, mode: ContentFit) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Current content-fit mode.
    #[must_use]
    pub fn mode(&self) -> ContentFit {
        self.mode
    }

    /// `true` when the next [`resolve`](Self::resolve) will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of times the scale has been recomputed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// The scale for the current inputs, recomputing only if one changed
    /// since the last call.
    pub fn resolve(&mut self) -> FitScale {
        if self.dirty {
            let texture = self.texture.unwrap_or_default();
            self.scale = fit_scale(self.surface, texture, self.mode);
            self.recomputes += 1;
            self.dirty = false;
        }
        self.scale
    }

    /// The last resolved scale, without recomputing.
    #[must_use]
    pub fn cached(&self) -> FitScale {
        self.scale
    }
}
