//! egui front end for [`CropOverlay`]: lays the image out, forwards pointer
//! input and paints the overlay on top.

use eframe::egui;

use crate::overlay::CropOverlay;

const PADDING: f32 = 20.0;

/// Largest size of `image_size` that fits `available` minus padding,
/// keeping the image's aspect.
pub fn fit_size(image_size: egui::Vec2, available: egui::Vec2) -> egui::Vec2 {
    let max_size = available - egui::vec2(PADDING * 2.0, PADDING * 2.0);
    let scale = (max_size.x / image_size.x).min(max_size.y / image_size.y);
    if !scale.is_finite() || scale <= 0.0 {
        return egui::Vec2::ZERO;
    }
    image_size * scale
}

pub struct CropOverlayView<'a> {
    overlay: &'a mut CropOverlay,
    texture: &'a egui::TextureHandle,
}

impl<'a> CropOverlayView<'a> {
    pub fn new(overlay: &'a mut CropOverlay, texture: &'a egui::TextureHandle) -> Self {
        Self { overlay, texture }
    }
}

impl egui::Widget for CropOverlayView<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let Self { overlay, texture } = self;

        let available_size = ui.available_size();
        let display_size = fit_size(texture.size_vec2(), available_size);
        let total_display_size = display_size + egui::vec2(PADDING * 2.0, PADDING * 2.0);

        // Manual centering
        let x_offset = (available_size.x - total_display_size.x) / 2.0;
        let y_offset = (available_size.y - total_display_size.y) / 2.0;
        let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));
        let target_rect = egui::Rect::from_min_size(start_pos, total_display_size);
        let image_rect = egui::Rect::from_min_size(
            target_rect.min + egui::vec2(PADDING, PADDING),
            display_size,
        );

        // Only the image itself takes pointer input; padding is inert.
        ui.allocate_rect(target_rect, egui::Sense::hover());
        let response = ui.interact(image_rect, ui.id().with("crop_overlay"), egui::Sense::drag());

        if overlay.surface_size() != Some(display_size) {
            overlay.on_container_resized(display_size);
        }
        overlay.on_animation_frame();

        let to_local = |pos: egui::Pos2| pos - image_rect.min.to_vec2();
        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(origin) = origin {
                overlay.on_pointer_down(to_local(origin));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                overlay.on_pointer_move(to_local(pos));
            }
        }
        if response.drag_stopped() {
            overlay.on_pointer_up();
        } else if !overlay.is_pointer_captured() {
            if let Some(pos) = response.hover_pos() {
                overlay.on_pointer_move(to_local(pos));
            }
        }

        let painter = ui.painter_at(target_rect);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        painter.extend(overlay.shapes().iter().cloned().map(|mut shape| {
            shape.translate(image_rect.min.to_vec2());
            shape
        }));

        if response.hovered() || overlay.is_pointer_captured() {
            ui.ctx().set_cursor_icon(overlay.cursor());
        }

        response
    }
}
