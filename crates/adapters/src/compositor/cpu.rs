use image::RgbaImage;
use photo_editor_application::ApplicationError;

use super::matrix::ColorMatrix;

pub fn apply_color_matrices(pixels: &mut [u8], matrices: &[ColorMatrix]) {
    if matrices.is_empty() {
        return;
    }
    for pixel in pixels.chunks_exact_mut(4) {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        for matrix in matrices {
            rgb = matrix.apply(rgb);
        }
        pixel[0] = to_u8(rgb[0]);
        pixel[1] = to_u8(rgb[1]);
        pixel[2] = to_u8(rgb[2]);
    }
}

/// Gaussian blur with standard deviation `sigma` pixels.
pub fn blur_rgba(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    sigma: f32,
) -> Result<Vec<u8>, ApplicationError> {
    let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        ApplicationError::Render(format!("pixel buffer does not match {width}x{height}"))
    })?;
    Ok(image::imageops::blur(&image, sigma).into_raw())
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
