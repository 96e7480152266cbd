//! The QuickCrop window: upload, preset crop, custom crop, download.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use eframe::egui;
use image::DynamicImage;

use crate::export::{self, CropResult};
use crate::geometry::CropRect;
use crate::overlay::{CropOverlay, ImageMetrics, OverlayOptions};
use crate::presets::{PRESETS, Preset};
use crate::widget::{self, CropOverlayView};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Upload,
    Crop,
    CustomCrop,
    Download,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
#[error("Could not save {}: {source}", path.display())]
pub struct SaveError {
    path: PathBuf,
    source: std::io::Error,
}

fn load_image_file(path: &Path) -> Result<DynamicImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image::load_from_memory(&bytes)?)
}

fn save_bytes(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    std::fs::write(path, bytes).map_err(|source| SaveError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a dimension field; anything but a positive integer is `None`.
fn parse_dimension(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|&v| v > 0)
}

/// Output size for a custom crop: typed values win, blank fields fall back to
/// the selection's size.
fn output_dimensions(width: &str, height: &str, rect: CropRect) -> Option<(u32, u32)> {
    let pick = |text: &str, fallback: f32| {
        if text.trim().is_empty() {
            let value = fallback.round();
            (value >= 1.0).then_some(value as u32)
        } else {
            parse_dimension(text)
        }
    };
    Some((pick(width, rect.width)?, pick(height, rect.height)?))
}

struct Toast {
    message: String,
    shown_at: Instant,
}

/// Width/height fields and aspect lock of the custom crop screen.
#[derive(Default)]
struct CustomCrop {
    overlay: Option<CropOverlay>,
    changes: Option<mpsc::Receiver<CropRect>>,
    width: String,
    height: String,
    aspect_locked: bool,
}

impl CustomCrop {
    fn reset(&mut self) {
        self.destroy_overlay();
        self.width.clear();
        self.height.clear();
        self.aspect_locked = false;
    }

    fn destroy_overlay(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.destroy();
        }
        self.changes = None;
    }

    fn typed_ratio(&self) -> Option<f32> {
        let w = parse_dimension(&self.width)?;
        let h = parse_dimension(&self.height)?;
        Some(w as f32 / h as f32)
    }

    /// Mirrors every selection change into the dimension fields.
    fn drain_changes(&mut self) {
        let Some(changes) = &self.changes else {
            return;
        };
        if let Some(rect) = changes.try_iter().last() {
            self.width = format!("{}", rect.width.round() as u32);
            self.height = format!("{}", rect.height.round() as u32);
        }
    }

    fn on_dimensions_edited(&mut self) {
        if !self.aspect_locked {
            return;
        }
        if let (Some(ratio), Some(overlay)) = (self.typed_ratio(), self.overlay.as_mut()) {
            overlay.set_aspect_ratio(Some(ratio));
        }
    }

    fn on_lock_toggled(&mut self) {
        let ratio = if self.aspect_locked {
            match self.typed_ratio() {
                Some(ratio) => Some(ratio),
                None => return,
            }
        } else {
            None
        };
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_aspect_ratio(ratio);
        }
    }
}

pub struct QuickCropApp {
    screen: Screen,
    image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    custom: CustomCrop,
    result: Option<CropResult>,
    result_texture: Option<egui::TextureHandle>,
    toast: Option<Toast>,
}

impl QuickCropApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            screen: Screen::Upload,
            image: None,
            texture: None,
            custom: CustomCrop::default(),
            result: None,
            result_texture: None,
            toast: None,
        }
    }

    fn transition_to(&mut self, screen: Screen) {
        log::debug!("screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    fn load_texture(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
        let size = [image.width() as _, image.height() as _];
        let image_buffer = image.to_rgba8();
        let pixels = image_buffer.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
    }

    fn open_image(&mut self, ctx: &egui::Context, loaded: Result<DynamicImage, LoadError>) {
        match loaded {
            Ok(image) => {
                log::info!("loaded {}x{} image", image.width(), image.height());
                self.texture = Some(Self::load_texture(ctx, "image", &image));
                self.image = Some(image);
                self.custom.reset();
                self.transition_to(Screen::Crop);
            }
            Err(e) => {
                log::warn!("{}", e);
                self.show_error("Could not load image. Please try a different file.");
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped_files.first() else {
            return;
        };
        let loaded = if let Some(path) = &file.path {
            load_image_file(path)
        } else if let Some(bytes) = &file.bytes {
            image::load_from_memory(bytes).map_err(LoadError::from)
        } else {
            return;
        };
        self.open_image(ctx, loaded);
    }

    fn pick_file(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open_image(ctx, load_image_file(&path));
        }
    }

    fn show_result(&mut self, ctx: &egui::Context, result: CropResult) {
        self.result_texture = Some(Self::load_texture(ctx, "result", &result.image));
        self.result = Some(result);
        self.transition_to(Screen::Download);
    }

    fn apply_preset(&mut self, ctx: &egui::Context, preset: &Preset) {
        let Some(image) = &self.image else {
            return;
        };
        match export::crop_to_preset(image, preset) {
            Ok(result) => self.show_result(ctx, result),
            Err(e) => {
                log::warn!("preset {} failed: {}", preset.id, e);
                self.show_error("Failed to crop image. Please try again.");
            }
        }
    }

    fn start_custom_crop(&mut self) {
        let Some(image) = &self.image else {
            return;
        };
        self.custom.reset();

        let (tx, rx) = mpsc::channel();
        let options = OverlayOptions::new(move |rect| {
            let _ = tx.send(rect);
        });
        // Rendered size arrives with the first layout pass.
        let metrics = ImageMetrics::new(export::image_size(image), egui::Vec2::ZERO);
        self.custom.overlay = Some(CropOverlay::attach(metrics, options));
        self.custom.changes = Some(rx);
        self.transition_to(Screen::CustomCrop);
    }

    fn apply_custom_crop(&mut self, ctx: &egui::Context) {
        let (Some(image), Some(overlay)) = (&self.image, &self.custom.overlay) else {
            return;
        };
        let rect = overlay.rect();
        let Some((width, height)) = output_dimensions(&self.custom.width, &self.custom.height, rect)
        else {
            self.show_error("Please enter valid dimensions.");
            return;
        };
        match export::crop_custom(image, rect, width, height, None) {
            Ok(result) => {
                self.custom.destroy_overlay();
                self.show_result(ctx, result);
            }
            Err(e) => {
                log::warn!("custom crop failed: {}", e);
                self.show_error("Failed to crop image. Please try again.");
            }
        }
    }

    fn save_result(&mut self) {
        let Some(result) = &self.result else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(&result.filename)
            .save_file()
        else {
            return;
        };
        match save_bytes(&path, &result.png) {
            Ok(()) => log::info!("saved {}", path.display()),
            Err(e) => {
                log::warn!("{}", e);
                self.show_error("Failed to save image. Please try again.");
            }
        }
    }

    fn reset(&mut self) {
        self.custom.reset();
        self.image = None;
        self.texture = None;
        self.result = None;
        self.result_texture = None;
        self.transition_to(Screen::Upload);
    }

    fn upload_ui(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading("Drop an image here");
            ui.label("PNG, JPEG, BMP or WebP");
            ui.add_space(8.0);
            if ui.button("Open Image").clicked() {
                self.pick_file(ui.ctx());
            }
        });
    }

    fn crop_ui(&mut self, ui: &mut egui::Ui) {
        let mut chosen = None;
        let mut custom = false;
        ui.horizontal_wrapped(|ui| {
            for preset in PRESETS.iter() {
                let label = format!("{}  {} × {}", preset.name, preset.width, preset.height);
                if ui
                    .button(label)
                    .on_hover_text(format!("Crop to {} ({})", preset.name, preset.aspect_label))
                    .clicked()
                {
                    chosen = Some(preset);
                }
            }
            custom = ui
                .button("Custom  Any size")
                .on_hover_text("Custom crop with manual dimensions")
                .clicked();
            ui.separator();
            if ui.button("Change image").clicked() {
                self.transition_to(Screen::Upload);
            }
        });
        ui.separator();

        if let Some(texture) = &self.texture {
            let size = widget::fit_size(texture.size_vec2(), ui.available_size());
            ui.centered_and_justified(|ui| ui.image((texture.id(), size)));
        }

        if let Some(preset) = chosen {
            self.apply_preset(ui.ctx(), preset);
        } else if custom {
            self.start_custom_crop();
        }
    }

    fn custom_crop_ui(&mut self, ui: &mut egui::Ui) {
        self.custom.drain_changes();

        let mut apply = false;
        let mut cancel = false;
        ui.horizontal(|ui| {
            ui.label("Width:");
            let w = ui.add(egui::TextEdit::singleline(&mut self.custom.width).desired_width(60.0));
            ui.label("Height:");
            let h = ui.add(egui::TextEdit::singleline(&mut self.custom.height).desired_width(60.0));
            if w.changed() || h.changed() {
                self.custom.on_dimensions_edited();
            }
            if ui
                .toggle_value(&mut self.custom.aspect_locked, "🔒 Lock aspect")
                .changed()
            {
                self.custom.on_lock_toggled();
            }
            ui.separator();
            apply = ui.button("Apply crop").clicked();
            cancel = ui.button("Cancel").clicked();
        });
        ui.separator();

        if let (Some(texture), Some(overlay)) = (&self.texture, self.custom.overlay.as_mut()) {
            ui.add(CropOverlayView::new(overlay, texture));
        }

        if apply {
            self.apply_custom_crop(ui.ctx());
        } else if cancel {
            self.custom.destroy_overlay();
            self.transition_to(Screen::Crop);
        }
    }

    fn download_ui(&mut self, ui: &mut egui::Ui) {
        let mut save = false;
        let mut another = false;
        let mut start_over = false;
        ui.horizontal(|ui| {
            if let Some(result) = &self.result {
                ui.label(format!("{} × {} px", result.width, result.height));
            }
            ui.separator();
            save = ui.button("Save").clicked();
            another = ui.button("Crop another").clicked();
            start_over = ui.button("Start over").clicked();
        });
        ui.separator();

        if let Some(texture) = &self.result_texture {
            let size = widget::fit_size(texture.size_vec2(), ui.available_size());
            ui.centered_and_justified(|ui| ui.image((texture.id(), size)));
        }

        if save {
            self.save_result();
        } else if another {
            self.custom.destroy_overlay();
            self.transition_to(Screen::Crop);
        } else if start_over {
            self.reset();
        }
    }

    fn toast_ui(&mut self, ctx: &egui::Context) {
        let Some(toast) = &self.toast else {
            return;
        };
        let elapsed = toast.shown_at.elapsed();
        if elapsed >= TOAST_DURATION {
            self.toast = None;
            return;
        }
        egui::TopBottomPanel::bottom("toast").show(ctx, |ui| {
            ui.colored_label(egui::Color32::from_rgb(220, 80, 80), &toast.message);
        });
        ctx.request_repaint_after(TOAST_DURATION - elapsed);
    }
}

impl eframe::App for QuickCropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            self.handle_dropped_files(ctx);
        }

        self.toast_ui(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Upload => self.upload_ui(ui),
            Screen::Crop => self.crop_ui(ui),
            Screen::CustomCrop => self.custom_crop_ui(ui),
            Screen::Download => self.download_ui(ui),
        });
    }
}
