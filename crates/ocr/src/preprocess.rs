use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

/// Fixed contrast gain applied after denoising.
pub const CONTRAST_FACTOR: f32 = 2.0;

/// Median window radius (a 3×3 window).
pub const MEDIAN_RADIUS: u32 = 1;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Decode raw image bytes (PNG / JPEG / BMP / …) and return normalized PNG bytes.
pub fn prepare_for_ocr_from_bytes(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(&normalize(&img))
}

/// Grayscale, 3×3 median filter, then a fixed 2× contrast boost.
pub fn normalize(img: &DynamicImage) -> GrayImage {
    let gray = to_luma_601(img);
    let denoised = imageproc::filter::median_filter(&gray, MEDIAN_RADIUS, MEDIAN_RADIUS);
    enhance_contrast(&denoised, CONTRAST_FACTOR)
}

/// ITU-R 601 luma in 16-bit fixed point (`L = R·299/1000 + G·587/1000 + B·114/1000`).
/// `DynamicImage::to_luma8` uses the 709 weights instead. Alpha is discarded.
pub fn to_luma_601(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Push every pixel away from the image's mean gray level by `factor`.
///
/// A factor of 1.0 is the identity and 0.0 yields a flat image at the mean.
pub fn enhance_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_luma(gray);
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0] as f32;
        let v = (mean + factor * (p - mean)).round().clamp(0.0, 255.0);
        Luma([v as u8])
    })
}

fn mean_luma(gray: &GrayImage) -> f32 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    (sum as f64 / count as f64).round() as f32
}

pub fn encode_as_png(img: &GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
