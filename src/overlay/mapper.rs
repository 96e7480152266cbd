//! Conversion between image-native pixels and on-screen pixels.

use eframe::egui;

use crate::geometry::CropRect;

/// Native-to-display ratio of the overlaid image.
///
/// Displayed images always keep their aspect, so a single factor serves
/// both axes. The mapper stays inert until the image has been laid out with
/// a nonzero size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateMapper {
    scale: Option<f32>,
}

impl CoordinateMapper {
    /// Recomputes the scale from the image's natural width and its rendered
    /// size. A zero rendered dimension leaves the previous scale untouched.
    pub fn update(&mut self, natural_width: f32, rendered: egui::Vec2) -> bool {
        if rendered.x <= 0.0 || rendered.y <= 0.0 || natural_width <= 0.0 {
            return false;
        }
        self.scale = Some(natural_width / rendered.x);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.scale.is_some()
    }

    /// Native pixels per display pixel; `1.0` before the first update.
    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    pub fn to_display(&self, rect: CropRect) -> egui::Rect {
        let scale = self.scale();
        egui::Rect::from_min_size(
            egui::pos2(rect.x / scale, rect.y / scale),
            egui::vec2(rect.width / scale, rect.height / scale),
        )
    }

    pub fn to_native(&self, delta: egui::Vec2) -> egui::Vec2 {
        delta * self.scale()
    }

    pub fn to_native_point(&self, point: egui::Pos2) -> egui::Pos2 {
        (point.to_vec2() * self.scale()).to_pos2()
    }
}
