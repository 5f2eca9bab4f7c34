//! Conversions between `image` buffers and cairo surfaces.
//!
//! Buffers named `premultiplied` hold cairo's native ARGB32 bytes (BGRA on
//! little-endian) inside an `RgbaImage` container; everything else is straight RGBA.

use std::io::Cursor;

use gtk4::cairo::{self, Format, ImageSurface};
use image::{imageops, ImageFormat, RgbaImage};
use thiserror::Error;

const BLUR_DOWNSAMPLE_SIGMA: f32 = 12.0;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("surface data is still borrowed: {0}")]
    Borrow(#[from] cairo::BorrowError),
    #[error("raster size {width}x{height} is out of range")]
    InvalidSize { width: i64, height: i64 },
    #[error("failed to encode png: {0}")]
    Encode(#[from] image::ImageError),
}

pub type RasterResult<T> = std::result::Result<T, RasterError>;

fn surface_for(width: u32, height: u32) -> RasterResult<ImageSurface> {
    let invalid = || RasterError::InvalidSize {
        width: i64::from(width),
        height: i64::from(height),
    };
    let width = i32::try_from(width).map_err(|_| invalid())?;
    let height = i32::try_from(height).map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok(ImageSurface::create(Format::ARgb32, width, height)?)
}

/// Blank transparent surface of `width` x `height` device pixels.
pub fn blank_surface(width: u32, height: u32) -> RasterResult<ImageSurface> {
    surface_for(width, height)
}

/// Uploads a straight-alpha RGBA image as a premultiplied cairo surface.
pub fn rgba_image_to_surface(image: &RgbaImage) -> RasterResult<ImageSurface> {
    let mut surface = surface_for(image.width(), image.height())?;
    let stride = surface.stride() as usize;
    let row_len = image.width() as usize * 4;
    {
        let mut data = surface.data()?;
        for (src_row, dst_row) in image
            .as_raw()
            .chunks_exact(row_len)
            .zip(data.chunks_exact_mut(stride))
        {
            for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                let [r, g, b, a] = [src[0], src[1], src[2], src[3]];
                let premultiply = |channel: u8| ((u16::from(channel) * u16::from(a) + 127) / 255) as u8;
                match a {
                    0 => dst.copy_from_slice(&[0, 0, 0, 0]),
                    255 => dst.copy_from_slice(&[b, g, r, 255]),
                    _ => dst.copy_from_slice(&[premultiply(b), premultiply(g), premultiply(r), a]),
                }
            }
        }
    }
    surface.mark_dirty();
    Ok(surface)
}

/// Copies a premultiplied buffer into a fresh surface without conversion.
pub fn premultiplied_to_surface(image: &RgbaImage) -> RasterResult<ImageSurface> {
    let mut surface = surface_for(image.width(), image.height())?;
    let stride = surface.stride() as usize;
    let row_len = image.width() as usize * 4;
    {
        let mut data = surface.data()?;
        for (src_row, dst_row) in image
            .as_raw()
            .chunks_exact(row_len)
            .zip(data.chunks_exact_mut(stride))
        {
            dst_row[..row_len].copy_from_slice(src_row);
        }
    }
    surface.mark_dirty();
    Ok(surface)
}

/// Reads back a surface's premultiplied bytes. All contexts on it must be dropped.
pub fn surface_to_premultiplied(surface: &mut ImageSurface) -> RasterResult<RgbaImage> {
    surface.flush();
    let width = surface.width();
    let height = surface.height();
    let invalid = || RasterError::InvalidSize {
        width: i64::from(width),
        height: i64::from(height),
    };
    let image_width = u32::try_from(width).map_err(|_| invalid())?;
    let image_height = u32::try_from(height).map_err(|_| invalid())?;
    let stride = surface.stride() as usize;
    let row_len = image_width as usize * 4;

    let data = surface.data()?;
    let mut bytes = Vec::with_capacity(row_len * image_height as usize);
    for row in data.chunks_exact(stride).take(image_height as usize) {
        bytes.extend_from_slice(&row[..row_len]);
    }
    drop(data);
    RgbaImage::from_raw(image_width, image_height, bytes).ok_or_else(invalid)
}

/// Converts premultiplied native bytes back to straight RGBA.
pub fn unpremultiply(image: &RgbaImage) -> RgbaImage {
    let mut output = RgbaImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(output.pixels_mut()) {
        let [b, g, r, a] = src.0;
        let restore = |channel: u8| match a {
            0 => 0,
            255 => channel,
            _ => ((u16::from(channel) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8,
        };
        dst.0 = [restore(r), restore(g), restore(b), a];
    }
    output
}

/// Gaussian blur on a premultiplied buffer; large radii run on a reduced copy.
pub fn blur_premultiplied(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    let downsample = ((sigma / BLUR_DOWNSAMPLE_SIGMA).floor() as u32)
        .max(1)
        .min(image.width().max(1))
        .min(image.height().max(1));
    if downsample <= 1 {
        return imageops::blur(image, sigma);
    }

    let reduced_width = (image.width() / downsample).max(1);
    let reduced_height = (image.height() / downsample).max(1);
    let reduced = imageops::resize(
        image,
        reduced_width,
        reduced_height,
        imageops::FilterType::Triangle,
    );
    let blurred = imageops::blur(&reduced, (sigma / downsample as f32).max(0.8));
    imageops::resize(
        &blurred,
        image.width(),
        image.height(),
        imageops::FilterType::Triangle,
    )
}

/// Encodes a surface as PNG bytes.
pub fn encode_png(surface: &mut ImageSurface) -> RasterResult<Vec<u8>> {
    let straight = unpremultiply(&surface_to_premultiplied(surface)?);
    let mut bytes = Cursor::new(Vec::new());
    straight.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}
