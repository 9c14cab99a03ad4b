//! Test-Time Augmentation
//!
//! Produces the fixed set of transformed copies of an input image that the
//! robust predictor averages over. Averaging predictions across these
//! variants reduces sensitivity to orientation and lighting compared to a
//! single forward pass.

use image::{imageops::FilterType, DynamicImage};

/// Number of augmentation variants in the TTA batch
pub const TTA_VARIANTS: usize = 4;

/// Resize an image to a square of the given side length
pub fn resize(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize_exact(size, size, FilterType::Lanczos3)
}

/// Scale pixel brightness by a multiplicative factor, clamped to [0, 255]
pub fn scale_brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    let mut rgb = image.to_rgb8();

    for pixel in rgb.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = ((*channel as f32) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }

    DynamicImage::ImageRgb8(rgb)
}

/// Build the TTA batch for one input image.
///
/// The four variants, each resized to the model input resolution:
/// 1. the unmodified image
/// 2. horizontally mirrored
/// 3. rotated 90 degrees
/// 4. brightness scaled by `brightness_factor`
pub fn tta_batch(image: &DynamicImage, size: u32, brightness_factor: f32) -> Vec<DynamicImage> {
    vec![
        resize(image, size),
        resize(&image.fliph(), size),
        resize(&image.rotate90(), size),
        resize(&scale_brightness(image, brightness_factor), size),
    ]
}

/// Flatten an image into a CHW float buffer scaled to [0, 1].
///
/// Layout: all R values, then all G values, then all B values.
pub fn to_chw(image: &DynamicImage) -> Vec<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let num_pixels = (width * height) as usize;

    let mut buffer = vec![0.0f32; 3 * num_pixels];

    for (i, pixel) in rgb.pixels().enumerate() {
        buffer[i] = pixel[0] as f32 / 255.0;
        buffer[num_pixels + i] = pixel[1] as f32 / 255.0;
        buffer[2 * num_pixels + i] = pixel[2] as f32 / 255.0;
    }

    buffer
}
