//! The texture blit pipeline: one projection uniform, one sampled texture,
//! a 4-vertex triangle strip.

use wgpu::util::DeviceExt;

use super::pipeline_helpers::{create_strip_pipeline, linear_sampler};
use crate::{error::PipelineError, fit::FitScale};

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ProjectionUniform {
    matrix: [f32; 16],
}

impl From<FitScale> for ProjectionUniform {
    fn from(scale: FitScale) -> Self {
        Self {
            matrix: scale.to_matrix().to_cols_array(),
        }
    }
}

/// Whether `texture` can be bound as the blit's `texture_2d<f32>` input
/// and read through its filtering sampler on `device`.
#[must_use]
pub fn can_sample(device: &wgpu::Device, texture: &wgpu::Texture) -> bool {
    texture.usage().contains(wgpu::TextureUsages::TEXTURE_BINDING)
        && texture.dimension() == wgpu::TextureDimension::D2
        && texture.depth_or_array_layers() == 1
        && texture.sample_count() == 1
        && texture.format().sample_type(None, Some(device.features()))
            == Some(wgpu::TextureSampleType::Float { filterable: true })
}

/// Begin the blit's render pass on `target`, cleared to transparent.
pub fn begin_clear_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("TextureView Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        ..Default::default()
    })
}

/// GPU state for drawing a texture onto a drawable of one format.
pub struct BlitPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    projection_buffer: wgpu::Buffer,
    target_format: wgpu::TextureFormat,
    /// Texture the bind group was built for.
    bound: Option<(wgpu::Texture, wgpu::BindGroup)>,
    /// Scale currently in `projection_buffer`.
    uploaded: FitScale,
    upload_count: u64,
    bind_group_count: u64,
}

impl BlitPipeline {
    /// Build the pipeline for drawables viewed as `target_format`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] if wgpu rejects the shader,
    /// layout or pipeline.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("TextureView Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../assets/shaders/blit.wgsl").into(),
                ),
            });

        // Matches the @group(0) bindings in blit.wgsl.
        let bind_group_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("TextureView Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                size_of::<ProjectionUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                ],
            },
        );

        let pipeline = create_strip_pipeline(
            device,
            "TextureView",
            &shader,
            target_format,
            &[&bind_group_layout],
        );

        let uploaded = FitScale::IDENTITY;
        let projection_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("TextureView Projection Buffer"),
                contents: bytemuck::bytes_of(&ProjectionUniform::from(
                    uploaded,
                )),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let sampler = linear_sampler(device, "TextureView Sampler");

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(PipelineError::Validation(error.to_string()));
        }

        log::debug!("built TextureView pipeline for {target_format:?}");

        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler,
            projection_buffer,
            target_format,
            bound: None,
            uploaded,
            upload_count: 0,
            bind_group_count: 0,
        })
    }

    /// Format of the color target this pipeline writes.
    #[must_use]
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Projection uploads issued since creation.
    #[must_use]
    pub fn upload_count(&self) -> u64 {
        self.upload_count
    }

    /// Bind groups built since creation.
    #[must_use]
    pub fn bind_group_count(&self) -> u64 {
        self.bind_group_count
    }

    /// Upload `scale` if it differs from the last upload and make sure the
    /// bind group references `texture`.
    ///
    /// Returns `false`, leaving nothing bound, when `texture` cannot be
    /// sampled (see [`can_sample`]).
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        scale: FitScale,
    ) -> bool {
        if !can_sample(device, texture) {
            self.bound = None;
            return false;
        }

        if scale != self.uploaded {
            queue.write_buffer(
                &self.projection_buffer,
                0,
                bytemuck::bytes_of(&ProjectionUniform::from(scale)),
            );
            self.uploaded = scale;
            self.upload_count += 1;
        }

        let stale = self
            .bound
            .as_ref()
            .is_none_or(|(bound, _)| bound != texture);
        if stale {
            let bind_group = self.create_bind_group(device, texture);
            self.bound = Some((texture.clone(), bind_group));
            self.bind_group_count += 1;
        }
        true
    }

    /// Drop the bind group and the texture reference it holds.
    pub fn release(&mut self) {
        self.bound = None;
    }

    fn create_bind_group(
        &self,
        device: &wgpu::Device,
        texture: &wgpu::Texture,
    ) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("TextureView Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.projection_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Record the quad draw into an open pass. Does nothing unless the last
    /// [`prepare`](Self::prepare) succeeded.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some((_, bind_group)) = &self.bound else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..4, 0..1);
    }
}
