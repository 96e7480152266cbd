//! QuickCrop: crop images to social media presets or to a hand-drawn
//! selection.
//!
//! The interesting part is [`overlay::CropOverlay`], a pointer-driven
//! selection controller that works in image-native pixels while taking input
//! and producing shapes in display pixels. [`widget::CropOverlayView`] hosts
//! it in egui and [`export`] turns the final selection into a PNG.

pub mod app;
pub mod export;
pub mod geometry;
pub mod overlay;
pub mod presets;
pub mod widget;

pub use geometry::{CropRect, MIN_SIZE};
pub use overlay::{CropOverlay, ImageMetrics, OverlayOptions};
