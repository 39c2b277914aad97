//! Image comparison utilities for testing.
//!
//! This module provides helper functions for verifying rendered PNGs in tests.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};

/// Load an image from a byte array
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Check if an image has the expected dimensions
///
/// # Returns
///
/// * `Ok(())` if the image has the expected dimensions
/// * `Err(String)` with an error message if the dimensions differ
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Check if image bytes have the expected format
pub fn assert_image_format(bytes: &[u8], expected_format: ImageFormat) -> Result<(), String> {
    let actual_format =
        detect_image_format(bytes).ok_or_else(|| "Could not detect image format".to_string())?;

    if actual_format != expected_format {
        return Err(format!(
            "Image format differs: actual = {:?}, expected = {:?}",
            actual_format, expected_format
        ));
    }

    Ok(())
}

/// Count pixels whose RGB channels match `rgb` exactly
pub fn count_pixels(image: &DynamicImage, rgb: [u8; 3]) -> usize {
    image
        .to_rgba8()
        .pixels()
        .filter(|p| p.0[0] == rgb[0] && p.0[1] == rgb[1] && p.0[2] == rgb[2])
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_detect_image_format() {
        let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(2, 2);
        let mut png_bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .unwrap();

        let format = detect_image_format(&png_bytes).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_count_pixels() {
        let mut img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(3, 3);
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);

        assert_eq!(count_pixels(&img, [255, 0, 0]), 1);
        assert_eq!(count_pixels(&img, [0, 0, 0]), 8);
        assert!(assert_image_dimensions(&img, 3, 3).is_ok());
        assert!(assert_image_dimensions(&img, 3, 4).is_err());
    }
}
