//! Builds the overlay's shapes in surface-local display pixels.

use eframe::egui;

use super::handle::Handle;
use super::style::OverlayStyle;

/// Draws the dimming mask, the border, the handles and (during a gesture)
/// the rule-of-thirds guides for a display-space `selection` on a surface of
/// `size`. Pure: the same inputs always produce the same shapes.
pub fn render(
    selection: egui::Rect,
    size: egui::Vec2,
    guides: bool,
    style: &OverlayStyle,
) -> Vec<egui::Shape> {
    let surface = egui::Rect::from_min_size(egui::Pos2::ZERO, size);
    let mut shapes = Vec::with_capacity(18);

    // Mask everything but the selection, band by band.
    let bands = [
        egui::Rect::from_min_max(surface.min, egui::pos2(surface.max.x, selection.min.y)),
        egui::Rect::from_min_max(egui::pos2(surface.min.x, selection.max.y), surface.max),
        egui::Rect::from_min_max(
            egui::pos2(surface.min.x, selection.min.y),
            egui::pos2(selection.min.x, selection.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(selection.max.x, selection.min.y),
            egui::pos2(surface.max.x, selection.max.y),
        ),
    ];
    for band in bands {
        if band.is_positive() {
            shapes.push(egui::Shape::rect_filled(band, 0.0, style.mask_color));
        }
    }

    shapes.push(egui::Shape::rect_stroke(selection, 0.0, style.border));

    if guides {
        for i in 1..=2 {
            let t = i as f32 / 3.0;
            let x = selection.min.x + selection.width() * t;
            let y = selection.min.y + selection.height() * t;
            shapes.push(egui::Shape::line_segment(
                [egui::pos2(x, selection.min.y), egui::pos2(x, selection.max.y)],
                style.guide,
            ));
            shapes.push(egui::Shape::line_segment(
                [egui::pos2(selection.min.x, y), egui::pos2(selection.max.x, y)],
                style.guide,
            ));
        }
    }

    let marker = egui::Vec2::splat(style.handle_size);
    for handle in Handle::ALL {
        let rect = egui::Rect::from_center_size(handle.anchor(selection), marker);
        shapes.push(egui::Shape::rect_filled(rect, 0.0, style.handle_fill));
        shapes.push(egui::Shape::rect_stroke(rect, 0.0, style.handle_outline));
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(50.0, 40.0), egui::vec2(400.0, 320.0))
    }

    fn segments(shapes: &[egui::Shape]) -> usize {
        shapes
            .iter()
            .filter(|s| matches!(s, egui::Shape::LineSegment { .. }))
            .count()
    }

    #[test]
    fn guides_only_while_dragging() {
        let style = OverlayStyle::default();
        let size = egui::vec2(500.0, 400.0);
        let idle = render(selection(), size, false, &style);
        let active = render(selection(), size, true, &style);
        assert_eq!(segments(&idle), 0);
        assert_eq!(segments(&active), 4);
        // 4 mask bands, border, 8 filled + 8 outlined markers.
        assert_eq!(idle.len(), 21);
    }

    #[test]
    fn mask_leaves_selection_clear() {
        let style = OverlayStyle::default();
        let sel = selection();
        let shapes = render(sel, egui::vec2(500.0, 400.0), false, &style);
        let masked: Vec<egui::Rect> = shapes
            .iter()
            .filter_map(|s| match s {
                egui::Shape::Rect(r) if r.fill == style.mask_color => Some(r.rect),
                _ => None,
            })
            .collect();
        assert_eq!(masked.len(), 4);
        let area: f32 = masked.iter().map(|r| r.area()).sum();
        assert!((area - (500.0 * 400.0 - sel.area())).abs() < 1e-2);
        assert!(masked.iter().all(|r| !r.intersects(sel.shrink(0.5))));
    }

    #[test]
    fn full_selection_draws_no_mask() {
        let style = OverlayStyle::default();
        let size = egui::vec2(500.0, 400.0);
        let sel = egui::Rect::from_min_size(egui::Pos2::ZERO, size);
        let shapes = render(sel, size, false, &style);
        assert_eq!(shapes.len(), 17);
    }

    #[test]
    fn rendering_is_repeatable() {
        let style = OverlayStyle::default();
        let a = render(selection(), egui::vec2(500.0, 400.0), true, &style);
        let b = render(selection(), egui::vec2(500.0, 400.0), true, &style);
        assert_eq!(a, b);
    }
}
