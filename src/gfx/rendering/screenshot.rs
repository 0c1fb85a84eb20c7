//! Screenshot capture
//!
//! Renders the current scene once into an offscreen target (so the overlay
//! UI is never part of the image), copies the pixels back through a mapped
//! buffer and encodes them as PNG. The live swapchain frame and the overlay
//! are untouched throughout, so UI visibility cannot leak even when encoding
//! fails.

use std::path::PathBuf;

use crate::error::GalleyError;
use crate::gfx::{
    rendering::render_engine::RenderEngine, resources::texture_resource::TextureResource,
    scene::scene::Scene,
};

pub const SCREENSHOT_FILENAME: &str = "kitchen-screenshot.png";

/// Captures the current frame at full surface resolution
///
/// Synchronous relative to the frame it captures: the scene pass, the
/// buffer readback and the encoding all complete before this returns.
pub fn capture(engine: &RenderEngine, scene: &Scene) -> Result<PathBuf, GalleyError> {
    let (width, height) = engine.surface_size();
    if width == 0 || height == 0 {
        return Err(GalleyError::ScreenshotUnavailable);
    }

    let device = engine.device();
    let queue = engine.queue();
    let format = engine.surface_format();
    let sample_count = engine.sample_count();

    let capture_target = TextureResource::create_capture_target(device, width, height, format);
    let depth_target = TextureResource::create_depth_texture(
        device,
        width,
        height,
        sample_count,
        "screenshot_depth",
    );
    let msaa_target = (sample_count > 1).then(|| {
        TextureResource::create_msaa_target(device, width, height, format, sample_count)
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Screenshot Encoder"),
    });

    match &msaa_target {
        Some(msaa) => engine.draw_scene_pass(
            &mut encoder,
            &msaa.view,
            Some(&capture_target.view),
            &depth_target.view,
            scene,
        ),
        None => engine.draw_scene_pass(
            &mut encoder,
            &capture_target.view,
            None,
            &depth_target.view,
            scene,
        ),
    };

    // Rows are padded to the copy alignment; stripped again after mapping
    let bytes_per_pixel = 4u32;
    let unpadded_bytes_per_row = width * bytes_per_pixel;
    let padded_bytes_per_row = unpadded_bytes_per_row
        .div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Screenshot Readback Buffer"),
        size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &capture_target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = output_buffer.slice(..);
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device.poll(wgpu::MaintainBase::Wait);

    pollster::block_on(rx.receive())
        .ok_or_else(|| GalleyError::ScreenshotReadback("map callback dropped".into()))?
        .map_err(|error| GalleyError::ScreenshotReadback(error.to_string()))?;

    let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
    {
        let data = buffer_slice.get_mapped_range();
        for row in data.chunks(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
        }
    }
    output_buffer.unmap();

    if matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    ) {
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    // The surface alpha channel is undefined for opaque compositing
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[3] = 255;
    }

    let image = image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| GalleyError::ScreenshotReadback("pixel buffer size mismatch".into()))?;

    let path = PathBuf::from(SCREENSHOT_FILENAME);
    image.save(&path)?;
    log::info!("screenshot saved to {}", path.display());

    Ok(path)
}
