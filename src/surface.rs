//! Surface geometry and presentation settings shared by every backend.

use serde::{Deserialize, Serialize};

/// A size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Construct a pixel size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height. Only meaningful for non-empty sizes.
    #[must_use]
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<(u32, u32)> for PixelSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Layout bounds of the host view in logical units, with the display's
/// content scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewBounds {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Physical pixels per logical unit.
    pub scale_factor: f64,
}

impl ViewBounds {
    /// Construct view bounds.
    #[must_use]
    pub const fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Drawable size for these bounds: `bounds × scale_factor`, rounded to
    /// whole pixels. Negative or non-finite inputs collapse to zero.
    #[must_use]
    pub fn pixel_size(self) -> PixelSize {
        let to_px = |logical: f64| {
            let px = (logical * self.scale_factor).round();
            if px.is_finite() && px > 0.0 {
                px.min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        };
        PixelSize::new(to_px(self.width), to_px(self.height))
    }
}

/// Colorspace the drawable is written in.
///
/// Passed through to the backend; the wgpu backend picks the sRGB or linear
/// view of the surface format accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Drawable values are sRGB encoded on store.
    Srgb,
    /// Drawable values are stored as written.
    Linear,
}

/// Everything a backend needs to (re)configure its presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings<F> {
    /// Drawable size in pixels. May be empty, in which case the backend
    /// must not hand out drawables.
    pub size: PixelSize,
    /// Presentation pixel format.
    pub format: F,
    /// Optional colorspace override.
    pub color_space: Option<ColorSpace>,
    /// Upper bound on drawables queued for display.
    pub max_frames_in_flight: u32,
}
