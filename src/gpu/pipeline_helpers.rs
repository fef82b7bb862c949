//! Small wgpu descriptor builders for the blit pipeline.

/// Create a render pipeline with `vs_main` / `fs_main` entry points, no
/// vertex buffers, a triangle-strip topology, no culling and a single
/// unblended color target.
pub fn create_strip_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// ClampToEdge + Linear sampler.
pub fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless;

    #[test]
    fn sampler_and_pipeline_build_headless() {
        let (device, _queue) = headless::device();
        let _sampler = linear_sampler(&device, "Test Sampler");

        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Test Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    "@vertex fn vs_main(@builtin(vertex_index) i: u32) \
                     -> @builtin(position) vec4<f32> { \
                     return vec4<f32>(f32(i), 0.0, 0.0, 1.0); } \
                     @fragment fn fs_main() -> @location(0) vec4<f32> { \
                     return vec4<f32>(1.0); }"
                        .into(),
                ),
            });
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let _pipeline = create_strip_pipeline(
            &device,
            "Test",
            &shader,
            wgpu::TextureFormat::Rgba8Unorm,
            &[],
        );
        assert!(pollster::block_on(device.pop_error_scope()).is_none());
    }
}
