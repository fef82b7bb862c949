//! Content-fit math: how a texture's aspect ratio is reconciled with the
//! drawable's.
//!
//! The blit draws a quad that spans the whole drawable in normalized device
//! coordinates. [`fit_scale`] yields the per-axis factors applied to that
//! quad: a factor above 1.0 pushes the texture past the drawable edge on that
//! axis (cropped), a factor below 1.0 shrinks it and leaves letterbox bars.

mod projection;

use glam::{Mat4, Vec3};
pub use projection::Projection;
use serde::{Deserialize, Serialize};

use crate::surface::PixelSize;

/// Policy for fitting a texture onto a differently-proportioned drawable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentFit {
    /// Fill the drawable, ignoring the texture's aspect ratio.
    Stretch,
    /// Fill the drawable, cropping the texture to keep its aspect ratio.
    #[default]
    AspectFill,
    /// Show the whole texture, letterboxing the remaining area.
    AspectFit,
}

/// Scale applied to the full-drawable quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScale {
    /// Horizontal scale factor.
    pub x: f32,
    /// Vertical scale factor.
    pub y: f32,
}

impl FitScale {
    /// No scaling: the texture covers the drawable exactly.
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    /// The scale embedded in a 4x4 projection matrix.
    #[must_use]
    pub fn to_matrix(self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.x, self.y, 1.0))
    }
}

impl Default for FitScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute the quad scale for `texture` shown on `surface` under `mode`.
///
/// Returns [`FitScale::IDENTITY`] when either size has a zero dimension.
#[must_use]
pub fn fit_scale(
    surface: PixelSize,
    texture: PixelSize,
    mode: ContentFit,
) -> FitScale {
    if surface.is_empty() || texture.is_empty() {
        return FitScale::IDENTITY;
    }

    let ratio = surface.aspect_ratio() / texture.aspect_ratio();

    match mode {
        ContentFit::Stretch => FitScale::IDENTITY,
        ContentFit::AspectFill => {
            if ratio < 1.0 {
                FitScale {
                    x: 1.0 / ratio,
                    y: 1.0,
                }
            } else {
                FitScale { x: 1.0, y: ratio }
            }
        }
        ContentFit::AspectFit => {
            if ratio > 1.0 {
                FitScale {
                    x: 1.0 / ratio,
                    y: 1.0,
                }
            } else {
                FitScale { x: 1.0, y: ratio }
            }
        }
    }
}
