//! Rasterizes a selection to PNG at preset or arbitrary output sizes.
//!
//! Pure functions over pixel data: image in, encoded image out.

use std::io::Cursor;

use eframe::egui;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::geometry::{self, CropRect};
use crate::presets::Preset;

/// An exported crop, ready to preview and save.
pub struct CropResult {
    pub image: DynamicImage,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Output size {0}x{1} has a zero dimension")]
    ZeroOutput(u32, u32),

    #[error("Source region {0:?} does not overlap the image")]
    EmptySource(CropRect),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] image::ImageError),
}

pub fn image_size(image: &DynamicImage) -> egui::Vec2 {
    egui::vec2(image.width() as f32, image.height() as f32)
}

/// Crops the centred region matching the preset's aspect and scales it to
/// the preset's exact size.
pub fn crop_to_preset(image: &DynamicImage, preset: &Preset) -> Result<CropResult, ExportError> {
    let source = geometry::cover_crop_rect(image_size(image), preset.aspect());
    crop_custom(image, source, preset.width, preset.height, Some(preset))
}

/// Draws the native-space `source` region into an `output_width` by
/// `output_height` raster.
pub fn crop_custom(
    image: &DynamicImage,
    source: CropRect,
    output_width: u32,
    output_height: u32,
    preset: Option<&Preset>,
) -> Result<CropResult, ExportError> {
    if output_width == 0 || output_height == 0 {
        return Err(ExportError::ZeroOutput(output_width, output_height));
    }
    let (x, y, width, height) =
        pixel_region(source, image.width(), image.height()).ok_or(ExportError::EmptySource(source))?;

    let cropped = image
        .crop_imm(x, y, width, height)
        .resize_exact(output_width, output_height, FilterType::Lanczos3);

    let mut png = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    let filename = match preset {
        Some(preset) => format!("quickcrop-{}-{}x{}.png", preset.id, preset.width, preset.height),
        None => format!("quickcrop-custom-{}x{}.png", output_width, output_height),
    };
    log::info!(
        "exported {}x{}+{}+{} to {} ({} bytes)",
        width,
        height,
        x,
        y,
        filename,
        png.len()
    );

    Ok(CropResult {
        image: cropped,
        png,
        width: output_width,
        height: output_height,
        filename,
    })
}

/// Rounds a native-space rectangle to whole pixels inside the image.
fn pixel_region(rect: CropRect, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let left = rect.x.round().clamp(0.0, image_width as f32) as u32;
    let top = rect.y.round().clamp(0.0, image_height as f32) as u32;
    let right = rect.right().round().clamp(0.0, image_width as f32) as u32;
    let bottom = rect.bottom().round().clamp(0.0, image_height as f32) as u32;
    if right <= left || bottom <= top {
        return None;
    }
    Some((left, top, right - left, bottom - top))
}
