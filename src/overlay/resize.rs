//! Handle-driven resizing with the minimum-size floor and aspect lock.

use eframe::egui;

use super::handle::Handle;
use crate::geometry::{CropRect, MIN_SIZE};

/// Resizes `start` by dragging `handle` a native-space `delta`.
///
/// Always computed from the drag-start snapshot, never from the previous
/// step, so a gesture's result depends only on where the pointer is now.
pub fn resize(
    handle: Handle,
    start: CropRect,
    delta: egui::Vec2,
    aspect: Option<f32>,
    bounds: egui::Vec2,
) -> CropRect {
    let mut left = start.x;
    let mut top = start.y;
    let mut right = start.right();
    let mut bottom = start.bottom();

    if handle.moves_left() {
        left += delta.x;
    }
    if handle.moves_right() {
        right += delta.x;
    }
    if handle.moves_top() {
        top += delta.y;
    }
    if handle.moves_bottom() {
        bottom += delta.y;
    }

    // The edge under the pointer gives way; the opposite edge stays put.
    if right - left < MIN_SIZE {
        if handle.moves_left() {
            left = right - MIN_SIZE;
        } else {
            right = left + MIN_SIZE;
        }
    }
    if bottom - top < MIN_SIZE {
        if handle.moves_top() {
            top = bottom - MIN_SIZE;
        } else {
            bottom = top + MIN_SIZE;
        }
    }

    let mut rect = CropRect::from_edges(left, top, right, bottom);
    if let Some(aspect) = aspect {
        rect = lock_aspect(handle, rect, start, aspect, right, bottom);
    }
    rect.clamped(bounds)
}

fn lock_aspect(
    handle: Handle,
    mut rect: CropRect,
    start: CropRect,
    aspect: f32,
    right: f32,
    bottom: f32,
) -> CropRect {
    match handle {
        // The pointer only controls height; width follows, centred where it was.
        Handle::North | Handle::South => {
            rect.width = rect.height * aspect;
            rect.x = start.center().x - rect.width / 2.0;
        }
        Handle::East | Handle::West => {
            rect.height = rect.width / aspect;
            rect.y = start.center().y - rect.height / 2.0;
        }
        _ => {
            if rect.aspect() > aspect {
                rect.width = rect.height * aspect;
                if handle.moves_left() {
                    rect.x = right - rect.width;
                }
            } else {
                rect.height = rect.width / aspect;
                if handle.moves_top() {
                    rect.y = bottom - rect.height;
                }
            }
        }
    }
    rect
}
