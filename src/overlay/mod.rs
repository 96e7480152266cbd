//! Crop overlay: a pointer-driven selection rectangle drawn over an image.
//!
//! [`CropOverlay`] owns the selection (in image-native pixels) and the gesture
//! in progress. The host feeds it pointer, layout and load events in
//! surface-local display pixels and paints the shapes it produces. All reads
//! of the selection hand out copies; nothing outside the controller can
//! mutate it.

mod handle;
mod mapper;
mod render;
mod resize;
mod style;

pub use handle::{Handle, Hit, hit_test};
pub use mapper::CoordinateMapper;
pub use render::render;
pub use resize::resize;
pub use style::OverlayStyle;

use eframe::egui;

use crate::geometry::{self, CropRect, MIN_SIZE};

/// Called with a copy of the selection after every mutation.
pub type ChangeCallback = Box<dyn FnMut(CropRect)>;

/// Sizes of the overlaid image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageMetrics {
    /// Intrinsic pixel size; zero until the image has loaded.
    pub natural: egui::Vec2,
    /// Size the image currently occupies on screen.
    pub rendered: egui::Vec2,
}

impl ImageMetrics {
    pub fn new(natural: egui::Vec2, rendered: egui::Vec2) -> Self {
        Self { natural, rendered }
    }

    fn is_loaded(&self) -> bool {
        self.natural.x > 0.0 && self.natural.y > 0.0
    }
}

#[derive(Default)]
pub struct OverlayOptions {
    pub initial_rect: Option<CropRect>,
    pub initial_aspect_ratio: Option<f32>,
    pub style: OverlayStyle,
    on_change: Option<ChangeCallback>,
}

impl OverlayOptions {
    pub fn new(on_change: impl FnMut(CropRect) + 'static) -> Self {
        Self {
            on_change: Some(Box::new(on_change)),
            ..Default::default()
        }
    }

    pub fn with_initial_rect(mut self, rect: CropRect) -> Self {
        self.initial_rect = Some(rect);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.initial_aspect_ratio = Some(ratio);
        self
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }
}

/// Selection and pointer position captured at pointer-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStart {
    pub rect: CropRect,
    pub pointer: egui::Pos2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Moving(DragStart),
    Resizing(Handle, DragStart),
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    pub fn handle(&self) -> Option<Handle> {
        match self {
            Gesture::Resizing(handle, _) => Some(*handle),
            _ => None,
        }
    }
}

/// Where initialization stands. It runs exactly once: on the next animation
/// frame if the image was already decoded at attach time, otherwise on the
/// load signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Readiness {
    AwaitingLoad,
    NextFrame,
    Ready,
}

/// The drawing surface: what the host should paint and how the pointer
/// should look.
struct Surface {
    size: egui::Vec2,
    shapes: Vec<egui::Shape>,
    cursor: egui::CursorIcon,
    captured: bool,
}

pub struct CropOverlay {
    image: ImageMetrics,
    mapper: CoordinateMapper,
    rect: CropRect,
    aspect: Option<f32>,
    gesture: Gesture,
    readiness: Readiness,
    initial_rect: Option<CropRect>,
    style: OverlayStyle,
    surface: Option<Surface>,
    on_change: Option<ChangeCallback>,
}

impl CropOverlay {
    pub fn attach(image: ImageMetrics, options: OverlayOptions) -> Self {
        if let Some(ratio) = options.initial_aspect_ratio {
            debug_assert!(ratio.is_finite() && ratio > 0.0, "invalid aspect ratio {ratio}");
        }
        let readiness = if image.is_loaded() {
            Readiness::NextFrame
        } else {
            Readiness::AwaitingLoad
        };
        log::debug!(
            "crop overlay attached: natural {:?}, rendered {:?}, {:?}",
            image.natural,
            image.rendered,
            readiness
        );

        Self {
            image,
            mapper: CoordinateMapper::default(),
            rect: CropRect::default(),
            aspect: options.initial_aspect_ratio,
            gesture: Gesture::Idle,
            readiness,
            initial_rect: options.initial_rect,
            style: options.style,
            surface: Some(Surface {
                size: image.rendered,
                shapes: Vec::new(),
                cursor: egui::CursorIcon::Crosshair,
                captured: false,
            }),
            on_change: options.on_change,
        }
    }

    // --- Host input ---

    /// Runs deferred initialization once layout has settled.
    pub fn on_animation_frame(&mut self) {
        if self.readiness == Readiness::NextFrame && !self.is_destroyed() {
            self.initialize();
        }
    }

    pub fn on_image_loaded(&mut self, natural: egui::Vec2) {
        if self.is_destroyed() {
            return;
        }
        self.image.natural = natural;
        if self.readiness == Readiness::AwaitingLoad && self.image.is_loaded() {
            self.initialize();
        }
    }

    pub fn on_container_resized(&mut self, rendered: egui::Vec2) {
        if self.is_destroyed() {
            return;
        }
        self.image.rendered = rendered;
        self.update_scale();
        self.render();
    }

    pub fn on_pointer_down(&mut self, pos: egui::Pos2) {
        if !self.accepts_pointer() {
            return;
        }
        if self.gesture.is_active() {
            log::debug!("pointer down during {:?}, ignored", self.gesture);
            return;
        }

        let display = self.mapper.to_display(self.rect);
        let hit = hit_test(pos, display, self.style.hit_size());
        let start = DragStart {
            rect: self.rect,
            pointer: pos,
        };
        self.gesture = match hit {
            Hit::Resize(handle) => Gesture::Resizing(handle, start),
            Hit::Move => Gesture::Moving(start),
            Hit::Create => {
                let anchor = self.mapper.to_native_point(pos);
                self.rect =
                    CropRect::new(anchor.x, anchor.y, MIN_SIZE, MIN_SIZE).clamped(self.image.natural);
                Gesture::Resizing(
                    Handle::SouthEast,
                    DragStart {
                        rect: self.rect,
                        pointer: pos,
                    },
                )
            }
        };
        log::debug!("gesture started: {:?} at {:?}", hit, pos);

        let cursor = match self.gesture {
            Gesture::Resizing(handle, _) => handle.cursor(),
            _ => egui::CursorIcon::Grabbing,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.captured = true;
            surface.cursor = cursor;
        }
        self.render();
    }

    pub fn on_pointer_move(&mut self, pos: egui::Pos2) {
        if !self.accepts_pointer() {
            return;
        }

        let bounds = self.image.natural;
        let mapper = self.mapper;
        let delta = |start: &DragStart| mapper.to_native(pos - start.pointer);
        match self.gesture {
            Gesture::Idle => {
                let display = self.mapper.to_display(self.rect);
                let cursor = hit_test(pos, display, self.style.hit_size()).hover_cursor();
                if let Some(surface) = self.surface.as_mut() {
                    surface.cursor = cursor;
                }
                return;
            }
            Gesture::Moving(start) => {
                self.rect = start.rect.translate(delta(&start)).clamped(bounds);
            }
            Gesture::Resizing(handle, start) => {
                self.rect = resize(handle, start.rect, delta(&start), self.aspect, bounds);
            }
        }
        log::trace!("selection now {:?}", self.rect);

        self.render();
        self.notify();
    }

    pub fn on_pointer_up(&mut self) {
        if !self.gesture.is_active() || self.is_destroyed() {
            return;
        }
        log::debug!("gesture ended with {:?}", self.rect);
        self.gesture = Gesture::Idle;
        if let Some(surface) = self.surface.as_mut() {
            surface.captured = false;
            surface.cursor = egui::CursorIcon::Crosshair;
        }
        self.render();
        self.notify();
    }

    // --- Public operations ---

    /// Locks resizing to `ratio` (width / height) and reshapes the current
    /// selection to match. `None` unlocks without touching the selection.
    ///
    /// The ratio must be positive and finite.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f32>) {
        if self.is_destroyed() {
            return;
        }
        self.aspect = ratio;
        let Some(ratio) = ratio else {
            return;
        };
        debug_assert!(ratio.is_finite() && ratio > 0.0, "invalid aspect ratio {ratio}");
        if self.readiness != Readiness::Ready {
            return;
        }
        self.rect = self.rect.constrained_to_aspect(ratio, self.image.natural);
        self.render();
        self.notify();
    }

    /// Replaces the selection, clamped into the image and up to the minimum
    /// size. Before initialization it becomes the initial selection.
    pub fn set_rect(&mut self, rect: CropRect) {
        if self.is_destroyed() {
            return;
        }
        if self.readiness != Readiness::Ready {
            self.initial_rect = Some(rect);
            return;
        }
        self.rect = rect.clamped(self.image.natural);
        self.render();
        self.notify();
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    /// Releases the surface and the change callback. Later input is ignored.
    pub fn destroy(&mut self) {
        if self.surface.take().is_some() {
            log::debug!("crop overlay destroyed");
            self.on_change = None;
            self.gesture = Gesture::Idle;
        }
    }

    // --- Host output ---

    /// Shapes of the last render, in surface-local display pixels.
    pub fn shapes(&self) -> &[egui::Shape] {
        self.surface
            .as_ref()
            .map(|s| s.shapes.as_slice())
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> egui::CursorIcon {
        self.surface
            .as_ref()
            .map_or(egui::CursorIcon::Default, |s| s.cursor)
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.captured)
    }

    pub fn surface_size(&self) -> Option<egui::Vec2> {
        self.surface.as_ref().map(|s| s.size)
    }

    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn scale(&self) -> Option<f32> {
        self.mapper.is_ready().then(|| self.mapper.scale())
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.surface.is_none()
    }

    // --- Internals ---

    fn initialize(&mut self) {
        self.readiness = Readiness::Ready;
        self.update_scale();

        let bounds = self.image.natural;
        self.rect = match self.initial_rect.take() {
            Some(rect) => rect.clamped(bounds),
            None => {
                let rect = geometry::default_rect(bounds);
                match self.aspect {
                    Some(ratio) => rect.constrained_to_aspect(ratio, bounds),
                    None => rect,
                }
            }
        };
        log::debug!("crop overlay initialized with {:?}", self.rect);

        self.render();
        self.notify();
    }

    fn accepts_pointer(&self) -> bool {
        self.readiness == Readiness::Ready && !self.is_destroyed()
    }

    fn update_scale(&mut self) {
        if !self.mapper.update(self.image.natural.x, self.image.rendered) {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.size = self.image.rendered;
        }
    }

    fn render(&mut self) {
        if self.readiness != Readiness::Ready || !self.mapper.is_ready() {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let display = self.mapper.to_display(self.rect);
        surface.shapes = render(display, surface.size, self.gesture.is_active(), &self.style);
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.rect);
        }
    }
}

impl Drop for CropOverlay {
    fn drop(&mut self) {
        self.destroy();
    }
}
