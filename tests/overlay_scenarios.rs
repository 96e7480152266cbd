use std::sync::mpsc;

use eframe::egui::{self, pos2, vec2};
use quickcrop::overlay::{Gesture, Handle};
use quickcrop::{CropOverlay, CropRect, ImageMetrics, MIN_SIZE, OverlayOptions};

const NATURAL: egui::Vec2 = vec2(1000.0, 800.0);
const RENDERED: egui::Vec2 = vec2(500.0, 400.0);

fn overlay_with(options: impl FnOnce(OverlayOptions) -> OverlayOptions) -> (CropOverlay, mpsc::Receiver<CropRect>) {
    let (tx, rx) = mpsc::channel();
    let options = options(OverlayOptions::new(move |rect| {
        let _ = tx.send(rect);
    }));
    let mut overlay = CropOverlay::attach(ImageMetrics::new(NATURAL, RENDERED), options);
    overlay.on_animation_frame();
    (overlay, rx)
}

fn overlay() -> (CropOverlay, mpsc::Receiver<CropRect>) {
    overlay_with(|options| options)
}

fn assert_close(a: CropRect, b: CropRect) {
    let eps = 1e-3;
    assert!(
        (a.x - b.x).abs() < eps
            && (a.y - b.y).abs() < eps
            && (a.width - b.width).abs() < eps
            && (a.height - b.height).abs() < eps,
        "{a:?} != {b:?}"
    );
}

fn assert_invariants(rect: CropRect) {
    assert!(rect.x >= 0.0 && rect.y >= 0.0, "{rect:?} leaves the image");
    assert!(
        rect.right() <= NATURAL.x + 1e-3 && rect.bottom() <= NATURAL.y + 1e-3,
        "{rect:?} leaves the image"
    );
    assert!(
        rect.width >= MIN_SIZE - 1e-3 && rect.height >= MIN_SIZE - 1e-3,
        "{rect:?} is below the minimum size"
    );
}

/// Deterministic pointer positions spread over and beyond the surface.
fn wander(seed: u32, count: usize) -> Vec<egui::Pos2> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 8) as f32 / (1u32 << 24) as f32
    };
    (0..count)
        .map(|_| pos2(next() * 700.0 - 100.0, next() * 600.0 - 100.0))
        .collect()
}

#[test]
fn default_init_is_centred_eighty_percent() {
    let (overlay, rx) = overlay();
    assert_close(overlay.rect(), CropRect::new(100.0, 80.0, 800.0, 640.0));
    let initial: Vec<_> = rx.try_iter().collect();
    assert_eq!(initial.len(), 1);
    assert_close(initial[0], overlay.rect());
}

#[test]
fn square_lock_recentres_horizontally() {
    let (mut overlay, _rx) = overlay();
    overlay.set_aspect_ratio(Some(1.0));
    assert_close(overlay.rect(), CropRect::new(180.0, 80.0, 640.0, 640.0));
}

#[test]
fn dragging_south_east_handle() {
    let (mut overlay, rx) = overlay();
    rx.try_iter().count();

    // Display scale is 2, so 25x10 display pixels is 50x20 native.
    overlay.on_pointer_down(pos2(450.0, 360.0));
    assert_eq!(overlay.gesture().handle(), Some(Handle::SouthEast));
    overlay.on_pointer_move(pos2(475.0, 370.0));
    assert_close(overlay.rect(), CropRect::new(100.0, 80.0, 850.0, 660.0));

    overlay.on_pointer_up();
    assert_eq!(overlay.gesture(), Gesture::Idle);
    // One notification for the move, one for the release.
    assert_eq!(rx.try_iter().count(), 2);
}

#[test]
fn pressing_outside_creates_a_new_selection() {
    let (mut overlay, _rx) = overlay();

    overlay.on_pointer_down(pos2(5.0, 5.0));
    assert_close(overlay.rect(), CropRect::new(10.0, 10.0, MIN_SIZE, MIN_SIZE));
    match overlay.gesture() {
        Gesture::Resizing(Handle::SouthEast, start) => {
            assert_close(start.rect, CropRect::new(10.0, 10.0, MIN_SIZE, MIN_SIZE));
        }
        other => panic!("expected a south-east resize, got {other:?}"),
    }

    overlay.on_pointer_move(pos2(55.0, 45.0));
    assert_close(overlay.rect(), CropRect::new(10.0, 10.0, 120.0, 100.0));
}

#[test]
fn handle_wins_over_interior_on_small_selection() {
    let (mut overlay, _rx) = overlay();
    overlay.set_rect(CropRect::new(100.0, 100.0, 20.0, 20.0));

    // Centre of a 10x10 display rectangle: inside, but every handle reaches it.
    overlay.on_pointer_down(pos2(55.0, 55.0));
    assert_eq!(overlay.gesture().handle(), Some(Handle::NorthWest));
}

#[test]
fn pressing_near_the_far_corner_shifts_new_selection_inward() {
    let (mut overlay, rx) = overlay();
    rx.try_iter().count();

    // Native (990, 790): a MIN_SIZE square there would overhang both edges.
    overlay.on_pointer_down(pos2(495.0, 395.0));
    assert_eq!(overlay.rect(), CropRect::new(980.0, 780.0, MIN_SIZE, MIN_SIZE));
    assert_eq!(overlay.gesture().handle(), Some(Handle::SouthEast));
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn release_without_gesture_is_ignored() {
    let (mut overlay, rx) = overlay();
    rx.try_iter().count();
    let before = overlay.rect();

    overlay.on_pointer_up();
    assert_eq!(overlay.gesture(), Gesture::Idle);
    assert_eq!(overlay.rect(), before);
    assert_eq!(rx.try_iter().count(), 0);

    // A second release after a full gesture is ignored too.
    overlay.on_pointer_down(pos2(250.0, 200.0));
    overlay.on_pointer_up();
    assert_eq!(rx.try_iter().count(), 1);
    overlay.on_pointer_up();
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn notifications_repeat_at_the_clamp() {
    let (mut overlay, rx) = overlay();
    rx.try_iter().count();

    overlay.on_pointer_down(pos2(250.0, 200.0));
    overlay.on_pointer_move(pos2(900.0, 200.0));
    overlay.on_pointer_move(pos2(950.0, 200.0));
    let rects: Vec<_> = rx.try_iter().collect();
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0], rects[1]);
    assert_close(rects[1], CropRect::new(200.0, 80.0, 800.0, 640.0));
}

#[test]
fn every_mutation_respects_bounds_and_min_size() {
    let (mut overlay, rx) = overlay();
    let points = wander(7, 400);

    for gesture in points.chunks(8) {
        overlay.on_pointer_down(gesture[0]);
        for &pos in &gesture[1..] {
            overlay.on_pointer_move(pos);
            assert_invariants(overlay.rect());
        }
        overlay.on_pointer_up();
    }

    let seen: Vec<_> = rx.try_iter().collect();
    assert!(seen.len() > 300);
    seen.into_iter().for_each(assert_invariants);
}

#[test]
fn locked_ratio_survives_every_handle() {
    let ratio = 1.5;
    let (mut overlay, _rx) = overlay_with(|options| options.with_aspect_ratio(ratio));
    let start = overlay.rect();
    assert!((start.aspect() - ratio).abs() < 1e-4);

    let steps = [vec2(10.0, 6.0), vec2(-8.0, 4.0), vec2(5.0, -9.0), vec2(-6.0, -6.0)];
    for handle in Handle::ALL {
        for step in steps {
            overlay.set_rect(start);
            let display = start.to_egui();
            let anchor = handle.anchor(egui::Rect::from_min_max(
                (display.min.to_vec2() / 2.0).to_pos2(),
                (display.max.to_vec2() / 2.0).to_pos2(),
            ));
            overlay.on_pointer_down(anchor);
            assert_eq!(overlay.gesture().handle(), Some(handle));
            overlay.on_pointer_move(anchor + step);
            let rect = overlay.rect();
            overlay.on_pointer_up();
            assert!(
                (rect.aspect() - ratio).abs() < 1e-3,
                "{handle} by {step:?} gave {rect:?}"
            );
        }
    }
}

#[test]
fn clamp_is_idempotent_through_set_rect() {
    let (mut overlay, _rx) = overlay();
    for rect in [
        CropRect::new(-50.0, 900.0, 10.0, 10.0),
        CropRect::new(400.0, 300.0, 4000.0, 3.0),
        CropRect::new(999.0, 799.0, 1.0, 1.0),
    ] {
        overlay.set_rect(rect);
        let once = overlay.rect();
        overlay.set_rect(once);
        assert_eq!(overlay.rect(), once);
        assert_invariants(once);
    }
}

#[test]
fn container_resize_changes_pointer_scale() {
    let (mut overlay, _rx) = overlay();
    overlay.on_container_resized(vec2(250.0, 200.0));
    assert_eq!(overlay.scale(), Some(4.0));

    // The selection's centre is now at (125, 100) on screen.
    overlay.on_pointer_down(pos2(125.0, 100.0));
    overlay.on_pointer_move(pos2(120.0, 100.0));
    overlay.on_pointer_up();
    assert_close(overlay.rect(), CropRect::new(80.0, 80.0, 800.0, 640.0));
}

#[test]
fn destroyed_overlay_drops_its_surface() {
    let (mut overlay, rx) = overlay();
    assert!(!overlay.shapes().is_empty());
    drop(rx);
    overlay.destroy();
    assert!(overlay.is_destroyed());
    assert!(overlay.shapes().is_empty());
    assert_eq!(overlay.surface_size(), None);
    overlay.destroy();
}
