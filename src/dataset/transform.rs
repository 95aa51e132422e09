//! Image preprocessing shared by the training loop and the classifier
//!
//! Resize to a square with a triangle (bilinear) filter, then lay the RGB
//! channels out as CHW `f32` scaled to [0, 1].

use image::imageops::FilterType;
use image::DynamicImage;

use crate::utils::error::Result;

/// Decode an in-memory image (any format the `image` crate understands)
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resize `image` to `size`×`size` and flatten it to CHW layout
///
/// Returns a vector of length `3 * size * size`: all R values, then all G
/// values, then all B values.
pub fn image_to_chw(image: &DynamicImage, size: u32) -> Vec<f32> {
    let rgb = image
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();
    let num_pixels = (size * size) as usize;

    let mut chw = vec![0.0f32; 3 * num_pixels];
    for (i, pixel) in rgb.pixels().enumerate() {
        chw[i] = pixel[0] as f32 / 255.0;
        chw[num_pixels + i] = pixel[1] as f32 / 255.0;
        chw[2 * num_pixels + i] = pixel[2] as f32 / 255.0;
    }

    chw
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_output_is_chw_of_requested_size() {
        let img = DynamicImage::new_rgb8(100, 37);
        let chw = image_to_chw(&img, 256);
        assert_eq!(chw.len(), 3 * 256 * 256);
    }

    #[test]
    fn test_channels_are_planar_and_scaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 51])));
        let chw = image_to_chw(&img, 4);
        let plane = 16;

        assert!(chw[..plane].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(chw[plane..2 * plane].iter().all(|&v| v.abs() < 1e-6));
        assert!(chw[2 * plane..].iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_decode_png_bytes() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 3, Rgb([10, 20, 30])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
