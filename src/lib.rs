// Crate-wide lints. `[workspace.lints]` in Cargo.toml mirrors these for
// the binary target.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
// Library code reports failures instead of panicking.
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented
)]
// Output goes through `log`.
#![deny(clippy::dbg_macro, clippy::print_stdout, clippy::print_stderr)]
#![deny(
    clippy::wildcard_imports,
    clippy::fn_params_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::implicit_clone,
    clippy::inefficient_to_string,
    clippy::redundant_closure_for_method_calls,
    clippy::manual_string_new,
    clippy::str_to_string
)]
#![deny(
    missing_docs,
    unused_results,
    unused_qualifications,
    trivial_casts,
    trivial_numeric_casts
)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::bare_urls
)]

//! Display a GPU texture inside a host view, like an image view backed by a
//! texture instead of a decoded bitmap.
//!
//! A [`TextureView`] owns a presentation surface sized to its host view and
//! blits one texture onto it per [`TextureView::draw`] call, fitted with a
//! [`ContentFit`] policy (stretch, aspect-fill or aspect-fit). There is no
//! render loop: the host calls `draw` once per frame with its own command
//! recorder, submits it, then presents the returned frame.
//!
//! # Key entry points
//!
//! - [`TextureView`] - the view, generic over a [`Backend`]
//! - [`gpu::WgpuBackend`] - the wgpu backend
//! - [`fit::fit_scale`] - the content-fit projection math
//! - [`ViewOptions`] - TOML-backed configuration
//!
//! # Frame protocol
//!
//! ```no_run
//! # fn frame(
//! #     view: &mut texview::TextureView<texview::gpu::WgpuBackend>,
//! # ) {
//! let mut encoder = view.backend().create_encoder();
//! let frame = view.draw(&mut encoder, None, None);
//! let _ = view.backend().queue().submit([encoder.finish()]);
//! if let Some(frame) = frame {
//!     frame.present(view.backend().queue());
//! }
//! # }
//! ```
//!
//! At most [`TextureView::max_frames_in_flight`] frames may await
//! presentation; a further `draw` blocks until one is presented.

pub mod backend;
pub mod error;
pub mod fit;
pub mod frame_gate;
pub mod gpu;
pub mod options;
pub mod surface;
pub mod view;
/// Standalone demo window (requires the `viewer` feature).
#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(test)]
mod spy;

pub use backend::{Backend, BlitCommand, RenderCommands};
pub use error::{PipelineError, TexviewError};
pub use fit::{fit_scale, ContentFit, FitScale, Projection};
pub use frame_gate::{FrameGate, FramePermit};
pub use options::ViewOptions;
pub use surface::{ColorSpace, PixelSize, SurfaceSettings, ViewBounds};
pub use view::TextureView;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
