//! Helpers for creating sampled source textures.

use crate::surface::PixelSize;

/// Create a sampled 2D texture and upload tightly packed 4-byte texels.
///
/// `pixels` must hold `size.width * size.height * 4` bytes in `format`'s
/// layout. The texture gets `TEXTURE_BINDING | COPY_DST` usage so it can be
/// displayed by a [`TextureView`](crate::TextureView) and updated later with
/// [`wgpu::Queue::write_texture`].
#[must_use]
pub fn create_source_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    size: PixelSize,
    format: wgpu::TextureFormat,
    pixels: &[u8],
) -> wgpu::Texture {
    let extent = wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(size.width * 4),
            rows_per_image: Some(size.height),
        },
        extent,
    );
    texture
}

/// RGBA8 checkerboard with a horizontal color ramp, `cell` pixels per
/// square. Handy for eyeballing the content-fit modes.
#[must_use]
pub fn checkerboard_rgba8(size: PixelSize, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels =
        Vec::with_capacity(size.width as usize * size.height as usize * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let dark = ((x / cell) + (y / cell)) % 2 == 1;
            let ramp = if size.width > 1 {
                (x * 255 / (size.width - 1)) as u8
            } else {
                255
            };
            let [r, g, b] = if dark {
                [ramp / 4, 32, 64]
            } else {
                [ramp, 200, 255 - ramp]
            };
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_has_one_texel_per_pixel() {
        let size = PixelSize::new(16, 9);
        assert_eq!(checkerboard_rgba8(size, 4).len(), 16 * 9 * 4);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let size = PixelSize::new(4, 2);
        let pixels = checkerboard_rgba8(size, 2);
        let texel = |x: usize, y: usize| {
            let i = (y * 4 + x) * 4;
            [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
        };
        assert_eq!(texel(0, 0)[1], 200);
        assert_eq!(texel(2, 0)[1], 32);
        assert_eq!(texel(0, 1), texel(0, 0));
        assert_eq!(texel(3, 1)[1], 32);
        assert!(pixels.chunks(4).all(|t| t[3] == 255));
    }
}
