use super::blit::{begin_clear_pass, can_sample, BlitPipeline};
use crate::{
    backend::{Backend, BlitCommand, RenderCommands},
    error::PipelineError,
    frame_gate::FramePermit,
    surface::{ColorSpace, PixelSize, SurfaceSettings},
};

/// The drawable format actually rendered to: the surface format with its
/// sRGB-ness adjusted for `color_space`.
#[must_use]
pub fn target_format(
    format: wgpu::TextureFormat,
    color_space: Option<ColorSpace>,
) -> wgpu::TextureFormat {
    match color_space {
        Some(ColorSpace::Srgb) => format.add_srgb_suffix(),
        Some(ColorSpace::Linear) => format.remove_srgb_suffix(),
        None => format,
    }
}

/// Pick a compositing alpha mode that lets the transparent clear show the
/// host behind the view, falling back to `Auto`.
#[must_use]
pub fn preferred_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
) -> wgpu::CompositeAlphaMode {
    [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|mode| supported.contains(mode))
    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Block until all submitted work on `device` has finished, so pending
/// `on_submitted_work_done` callbacks run. A failed poll is logged; callers
/// go on to wait for whatever completions it did deliver.
pub(crate) fn wait_for_submitted_work(device: &wgpu::Device) {
    if let Err(e) = device.poll(wgpu::PollType::Wait) {
        log::warn!("waiting for submitted GPU work failed: {e}");
    }
}

/// A surface texture acquired for one frame, with the view the blit
/// renders through.
pub struct WgpuDrawable {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// A recorded frame. Submit the command encoder it was recorded into, then
/// call [`present`](Self::present).
///
/// Dropping the frame instead discards the drawable and frees its
/// in-flight slot.
pub struct WgpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    permit: FramePermit,
}

impl WgpuFrame {
    /// Present the drawable. The in-flight slot is released once `queue`
    /// reports the submitted work done.
    pub fn present(self, queue: &wgpu::Queue) {
        let Self {
            surface_texture,
            permit,
        } = self;
        queue.on_submitted_work_done(move || permit.complete());
        surface_texture.present();
    }
}

/// [`Backend`] over a wgpu device and window surface.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    capabilities: wgpu::SurfaceCapabilities,
    /// `None` while the drawable size is empty.
    config: Option<wgpu::SurfaceConfiguration>,
    needs_reconfigure: bool,
    blit: Option<BlitPipeline>,
}

impl WgpuBackend {
    /// Wrap a device, its queue and a surface created from the same
    /// instance. `adapter` is only queried for the surface capabilities.
    #[must_use]
    pub fn new(
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
    ) -> Self {
        let capabilities = surface.get_capabilities(adapter);
        Self {
            device,
            queue,
            surface,
            capabilities,
            config: None,
            needs_reconfigure: false,
            blit: None,
        }
    }

    /// `Bgra8Unorm` if the surface supports it, else its first format.
    #[must_use]
    pub fn preferred_format(&self) -> Option<wgpu::TextureFormat> {
        let preferred = wgpu::TextureFormat::Bgra8Unorm;
        if self.capabilities.formats.contains(&preferred) {
            Some(preferred)
        } else {
            self.capabilities.formats.first().copied()
        }
    }

    /// The wgpu device.
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu queue.
    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The surface configuration in effect, if the drawable is non-empty.
    #[must_use]
    pub fn config(&self) -> Option<&wgpu::SurfaceConfiguration> {
        self.config.as_ref()
    }

    /// Create a command encoder for one frame.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("TextureView Encoder"),
            })
    }

    fn reconfigure(&mut self) {
        if let Some(config) = &self.config {
            self.surface.configure(&self.device, config);
        }
        self.needs_reconfigure = false;
    }
}

impl Backend for WgpuBackend {
    type Texture = wgpu::Texture;
    type Format = wgpu::TextureFormat;
    type Drawable = WgpuDrawable;
    type Recorder = wgpu::CommandEncoder;
    type Pass<'p> = wgpu::RenderPass<'p>;
    type Fence = wgpu::SubmissionIndex;
    type Frame = WgpuFrame;

    fn texture_size(&self, texture: &wgpu::Texture) -> PixelSize {
        PixelSize::new(texture.width(), texture.height())
    }

    fn can_display(&self, texture: &wgpu::Texture) -> bool {
        can_sample(&self.device, texture)
    }

    fn release_texture(&mut self) {
        if let Some(blit) = &mut self.blit {
            blit.release();
        }
    }

    fn max_surface_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn configure(&mut self, settings: &SurfaceSettings<wgpu::TextureFormat>) {
        if settings.size.is_empty() {
            self.config = None;
            return;
        }

        let target = target_format(settings.format, settings.color_space);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: settings.format,
            width: settings.size.width,
            height: settings.size.height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: settings.max_frames_in_flight,
            alpha_mode: preferred_alpha_mode(&self.capabilities.alpha_modes),
            view_formats: if target == settings.format {
                vec![]
            } else {
                vec![target]
            },
        };
        log::debug!(
            "configuring surface {}x{} {:?} (view {:?}, latency {})",
            config.width,
            config.height,
            config.format,
            target,
            config.desired_maximum_frame_latency
        );
        self.surface.configure(&self.device, &config);
        self.config = Some(config);
        self.needs_reconfigure = false;
    }

    fn build_pipeline(
        &mut self,
        settings: &SurfaceSettings<wgpu::TextureFormat>,
    ) -> Result<(), PipelineError> {
        if !self.capabilities.formats.contains(&settings.format) {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{:?}",
                settings.format
            )));
        }

        let target = target_format(settings.format, settings.color_space);
        if self
            .blit
            .as_ref()
            .is_some_and(|blit| blit.target_format() == target)
        {
            return Ok(());
        }

        self.blit = Some(BlitPipeline::new(&self.device, target)?);
        log::info!("TextureView pipeline ready for {target:?}");
        Ok(())
    }

    fn next_drawable(&mut self) -> Option<WgpuDrawable> {
        if self.needs_reconfigure {
            self.reconfigure();
        }
        let config = self.config.as_ref()?;
        let target = config.view_formats.first().copied().unwrap_or(config.format);

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                self.needs_reconfigure = surface_texture.suboptimal;
                let view = surface_texture.texture.create_view(
                    &wgpu::TextureViewDescriptor {
                        label: Some("TextureView Drawable"),
                        format: Some(target),
                        ..Default::default()
                    },
                );
                Some(WgpuDrawable {
                    surface_texture,
                    view,
                })
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.reconfigure();
                None
            }
            Err(_) => None,
        }
    }

    fn encode_blit(
        &mut self,
        recorder: &mut wgpu::CommandEncoder,
        drawable: &WgpuDrawable,
        command: BlitCommand<'_, Self>,
        extra: Option<&mut dyn RenderCommands<Self>>,
    ) {
        let Some(blit) = self.blit.as_mut() else {
            return;
        };

        // Submissions on one queue execute in order, and the fence's
        // submission precedes the one carrying this pass, so the GPU already
        // waits for it.
        let BlitCommand {
            texture,
            scale,
            fence: _,
        } = command;

        let ready = blit.prepare(&self.device, &self.queue, texture, scale);
        let mut pass = begin_clear_pass(recorder, &drawable.view);
        if ready {
            blit.draw(&mut pass);
        }
        if let Some(extra) = extra {
            extra.record(&mut pass);
        }
    }

    fn finish(
        &mut self,
        drawable: WgpuDrawable,
        permit: FramePermit,
    ) -> WgpuFrame {
        WgpuFrame {
            surface_texture: drawable.surface_texture,
            permit,
        }
    }

    fn wait_for_presented_frames(&mut self) {
        wait_for_submitted_work(&self.device);
    }
}

impl<F> RenderCommands<WgpuBackend> for F
where
    F: FnMut(&mut wgpu::RenderPass<'_>),
{
    fn record(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        self(pass);
    }
}

#[cfg(test)]
mod tests {
    use wgpu::{CompositeAlphaMode, TextureFormat};

    use super::*;
    use crate::{frame_gate::FrameGate, gpu::headless};

    #[test]
    fn waiting_for_submitted_work_runs_completion_callbacks() {
        let (device, queue) = headless::device();
        let gate = FrameGate::new(1);
        let permit = gate.acquire();

        let encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Test Encoder"),
            });
        let _ = queue.submit([encoder.finish()]);
        queue.on_submitted_work_done(move || permit.complete());

        wait_for_submitted_work(&device);
        assert_eq!(gate.in_flight(), 0);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn color_space_adjusts_srgb_suffix() {
        assert_eq!(
            target_format(TextureFormat::Bgra8Unorm, Some(ColorSpace::Srgb)),
            TextureFormat::Bgra8UnormSrgb
        );
        assert_eq!(
            target_format(
                TextureFormat::Rgba8UnormSrgb,
                Some(ColorSpace::Linear)
            ),
            TextureFormat::Rgba8Unorm
        );
        assert_eq!(
            target_format(TextureFormat::Bgra8UnormSrgb, None),
            TextureFormat::Bgra8UnormSrgb
        );
    }

    #[test]
    fn color_space_leaves_formats_without_srgb_variant() {
        assert_eq!(
            target_format(TextureFormat::Rgba16Float, Some(ColorSpace::Srgb)),
            TextureFormat::Rgba16Float
        );
    }

    #[test]
    fn alpha_mode_prefers_premultiplied() {
        assert_eq!(
            preferred_alpha_mode(&[
                CompositeAlphaMode::Opaque,
                CompositeAlphaMode::PostMultiplied,
                CompositeAlphaMode::PreMultiplied,
            ]),
            CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(
            preferred_alpha_mode(&[
                CompositeAlphaMode::Opaque,
                CompositeAlphaMode::PostMultiplied,
            ]),
            CompositeAlphaMode::PostMultiplied
        );
        assert_eq!(
            preferred_alpha_mode(&[CompositeAlphaMode::Opaque]),
            CompositeAlphaMode::Auto
        );
    }
}
