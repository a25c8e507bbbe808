//! Single-channel brightness plane for the route scorer.

use image::{GrayImage, RgbaImage};
use kornia::{
    image::{Image, ImageError, ImageSize, allocator::CpuAllocator},
    imgproc,
};
use log::warn;

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// Errors from the kornia conversion path.
#[derive(Debug, thiserror::Error)]
pub enum LumaError {
    #[error("kornia image error: {0}")]
    Kornia(#[from] ImageError),
    #[error("gray buffer of {len} bytes does not fit {width}x{height}")]
    BufferMismatch { len: usize, width: u32, height: u32 },
}

/// Converts an RGBA image to 8-bit luma. Alpha is ignored.
///
/// Uses kornia's integer RGB to gray conversion and falls back to the
/// `image` crate's conversion if kornia rejects the buffer, so callers always
/// get a plane of the same size as the input.
pub fn luma_plane(image: &RgbaImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }
    match kornia_luma(image) {
        Ok(gray) => gray,
        Err(err) => {
            warn!("{err}; falling back to image crate luma conversion");
            image::imageops::grayscale(image)
        }
    }
}

fn kornia_luma(image: &RgbaImage) -> Result<GrayImage, LumaError> {
    let (width, height) = image.dimensions();
    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let source = CpuImage::<u8, 3>::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        rgb,
        CpuAllocator,
    )?;
    let mut gray = CpuImage::<u8, 1>::from_size_val(source.size(), 0u8, CpuAllocator)?;
    imgproc::color::gray_from_rgb_u8(&source, &mut gray)?;

    let data = gray.as_slice().to_vec();
    let len = data.len();
    GrayImage::from_raw(width, height, data).ok_or(LumaError::BufferMismatch {
        len,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn gray_pixels_keep_their_level() {
        for level in [0u8, 120, 216, 230, 249, 255] {
            let img = RgbaImage::from_pixel(4, 3, Rgba([level, level, level, 255]));
            let luma = luma_plane(&img);
            assert_eq!(luma.dimensions(), (4, 3));
            let value = luma.get_pixel(2, 1)[0] as i32;
            assert!((value - level as i32).abs() <= 1, "{level} -> {value}");
        }
    }

    #[test]
    fn empty_image_gives_empty_plane() {
        let luma = luma_plane(&RgbaImage::new(0, 5));
        assert_eq!(luma.dimensions(), (0, 5));
    }
}
