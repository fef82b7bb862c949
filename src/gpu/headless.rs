//! A device on wgpu's no-op backend, for tests that need real wgpu
//! validation without a GPU or a window.

pub(crate) fn device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = pollster::block_on(
        instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
    )
    .unwrap();
    pollster::block_on(
        adapter.request_device(&wgpu::DeviceDescriptor::default()),
    )
    .unwrap()
}
