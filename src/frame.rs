use image::{DynamicImage, RgbImage, RgbaImage};

use crate::error::{Error, Result};
use crate::types::FrameHeader;

/// Swaps the first and third channel of every pixel, BGR(A) <-> RGB(A).
pub fn swap_red_blue(bytes: &mut [u8], channels: usize) {
    for px in bytes.chunks_exact_mut(channels) {
        px.swap(0, 2);
    }
}

/// Builds an RGB(A) image from a BGR(A) frame buffer.
///
/// Uses the width, height and pixel size reported by `header`; trailing bytes
/// past `width * height * bytes_per_pixel` are padding and ignored.
pub fn frame_to_image(header: &FrameHeader, buffer: &[u8]) -> Result<DynamicImage> {
    let channels = match header.bytes_per_pixel {
        3 | 4 => header.bytes_per_pixel as usize,
        other => return Err(Error::UnsupportedPixelFormat(other)),
    };
    let expected = header.width as usize * header.height as usize * channels;
    if buffer.len() < expected {
        return Err(Error::BufferTooSmall {
            expected,
            actual: buffer.len(),
        });
    }

    let mut pixels = buffer[..expected].to_vec();
    swap_red_blue(&mut pixels, channels);

    let too_small = || Error::BufferTooSmall {
        expected,
        actual: buffer.len(),
    };
    let img = if channels == 4 {
        DynamicImage::ImageRgba8(
            RgbaImage::from_raw(header.width, header.height, pixels).ok_or_else(too_small)?,
        )
    } else {
        DynamicImage::ImageRgb8(
            RgbImage::from_raw(header.width, header.height, pixels).ok_or_else(too_small)?,
        )
    };
    Ok(img)
}
