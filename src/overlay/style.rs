//! Overlay look and handle reach.

use eframe::egui;

/// Visual and hit-testing parameters of the overlay, in display pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Side of the square handle markers.
    pub handle_size: f32,
    /// Extra reach of a handle's hit square beyond its marker, so imprecise
    /// pointers and fingers can still grab it. Must be positive.
    pub hit_margin: f32,
    pub mask_color: egui::Color32,
    pub border: egui::Stroke,
    pub guide: egui::Stroke,
    pub handle_fill: egui::Color32,
    pub handle_outline: egui::Stroke,
}

impl OverlayStyle {
    /// Side of the square hit region around each handle.
    pub fn hit_size(&self) -> f32 {
        self.handle_size + self.hit_margin.max(f32::EPSILON)
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            hit_margin: 6.0,
            mask_color: egui::Color32::from_black_alpha(115),
            border: egui::Stroke::new(2.0, egui::Color32::from_white_alpha(230)),
            guide: egui::Stroke::new(1.0, egui::Color32::from_white_alpha(64)),
            handle_fill: egui::Color32::WHITE,
            handle_outline: egui::Stroke::new(1.0, egui::Color32::from_black_alpha(77)),
        }
    }
}
