//! The wgpu backend.
//!
//! [`WgpuBackend`] presents on a `wgpu::Surface`, records into the caller's
//! `wgpu::CommandEncoder`, and hands back [`WgpuFrame`]s that the caller
//! presents after submitting.

mod backend;
#[cfg(test)]
mod headless;
/// The texture blit pipeline.
pub mod blit;
/// Shared wgpu descriptor builders.
pub mod pipeline_helpers;
/// Source texture creation helpers.
pub mod texture;

pub use backend::{
    preferred_alpha_mode, target_format, WgpuBackend, WgpuDrawable, WgpuFrame,
};
