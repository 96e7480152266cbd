//! Crop rectangle in image-native pixels and the constraints every mutation
//! goes through.

use eframe::egui;

/// Smallest width or height, in native pixels, a selection may shrink to.
pub const MIN_SIZE: f32 = 20.0;

/// Fraction of each image extent left as margin by the default selection.
const DEFAULT_MARGIN: f32 = 0.1;

/// A selection rectangle in image-native pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> egui::Pos2 {
        egui::pos2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn translate(&self, delta: egui::Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Enforces the minimum size, then pulls the rectangle inside `bounds`.
    ///
    /// The origin is clamped first and the size re-derived from it, so the
    /// result never leaves the image even when the image is smaller than
    /// [`MIN_SIZE`]. Applying it to its own output is a no-op.
    pub fn clamped(&self, bounds: egui::Vec2) -> Self {
        let width = self.width.max(MIN_SIZE);
        let height = self.height.max(MIN_SIZE);
        let x = self.x.min(bounds.x - width).max(0.0);
        let y = self.y.min(bounds.y - height).max(0.0);
        Self::new(x, y, width.min(bounds.x - x), height.min(bounds.y - y))
    }

    /// Shrinks the over-long axis about the centre to match `aspect`, then
    /// clamps into `bounds`.
    pub fn constrained_to_aspect(&self, aspect: f32, bounds: egui::Vec2) -> Self {
        let mut rect = *self;
        if rect.aspect() > aspect {
            let width = rect.height * aspect;
            rect.x += (rect.width - width) / 2.0;
            rect.width = width;
        } else {
            let height = rect.width / aspect;
            rect.y += (rect.height - height) / 2.0;
            rect.height = height;
        }
        rect.clamped(bounds)
    }

    pub fn to_egui(self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.x, self.y),
            egui::vec2(self.width, self.height),
        )
    }

    pub fn is_within(&self, bounds: egui::Vec2) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= bounds.x && self.bottom() <= bounds.y
    }
}

/// Centred selection covering 80% of each image extent.
pub fn default_rect(natural: egui::Vec2) -> CropRect {
    let x = natural.x * DEFAULT_MARGIN;
    let y = natural.y * DEFAULT_MARGIN;
    CropRect::new(x, y, natural.x - 2.0 * x, natural.y - 2.0 * y)
}

/// The largest centred rectangle of `target_aspect` that fits the image.
pub fn cover_crop_rect(natural: egui::Vec2, target_aspect: f32) -> CropRect {
    let source_aspect = natural.x / natural.y;
    if source_aspect > target_aspect {
        // Wider than the target: keep full height, trim the sides.
        let width = natural.y * target_aspect;
        CropRect::new((natural.x - width) / 2.0, 0.0, width, natural.y)
    } else {
        let height = natural.x / target_aspect;
        CropRect::new(0.0, (natural.y - height) / 2.0, natural.x, height)
    }
}
