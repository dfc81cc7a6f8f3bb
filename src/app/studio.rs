use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use eframe::egui;
use eframe::egui::{TextureHandle, TextureOptions};

use super::state::{ModeKind, StudioSession};
use crate::api::ImageService;
use crate::styling::apply_global_style;
use crate::ui;
use crate::uploads::SourceImage;
use crate::utils::{exporter, profiler::ScopeTimer};

pub(crate) const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff"];

/// Desktop front-end: controls on the left, result or mask editor in the centre.
pub struct StudioApp {
    pub(crate) session: StudioSession<TextureHandle>,
    pub(crate) result_texture: Option<TextureHandle>,
    pub(crate) mask_overlay: Option<TextureHandle>,
    pub(crate) mask_overlay_revision: Option<u64>,
    pub(crate) show_fullscreen: bool,
    pub(crate) download_message: Option<String>,
    pub(crate) download_task: Option<JoinHandle<Result<PathBuf, String>>>,
}

impl StudioApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        service: Arc<dyn ImageService>,
        history_limit: usize,
    ) -> Self {
        apply_global_style(&cc.egui_ctx);
        Self {
            session: StudioSession::new(service, history_limit),
            result_texture: None,
            mask_overlay: None,
            mask_overlay_revision: None,
            show_fullscreen: false,
            download_message: None,
            download_task: None,
        }
    }

    /// Switch modes and drop every texture tied to the old one.
    pub(crate) fn switch_mode(&mut self, kind: ModeKind) {
        if self.session.switch_mode(kind) {
            self.result_texture = None;
            self.mask_overlay = None;
            self.mask_overlay_revision = None;
            self.show_fullscreen = false;
            self.download_message = None;
        }
    }

    pub(crate) fn submit(&mut self) {
        self.session.submit();
        self.show_fullscreen = false;
        self.download_message = None;
    }

    /// Native multi-file picker for edit uploads.
    pub(crate) fn open_file_dialog(&mut self, ctx: &egui::Context) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_files()
        else {
            return;
        };
        let sources = paths
            .iter()
            .map(|path| SourceImage::from_path(path))
            .collect::<Vec<_>>();
        self.add_sources(ctx, sources);
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() || self.session.mode_kind() != ModeKind::Edit {
            return;
        }
        let sources = dropped
            .into_iter()
            .filter_map(|file| match (file.path, file.bytes) {
                (Some(path), _) => Some(SourceImage::from_path(&path)),
                (None, Some(bytes)) => Some(SourceImage::from_bytes(file.name, &bytes)),
                (None, None) => None,
            })
            .collect::<Vec<_>>();
        self.add_sources(ctx, sources);
    }

    /// Upload textures for newly loaded images and hand them to the session.
    fn add_sources(&mut self, ctx: &egui::Context, sources: Vec<crate::error::Result<SourceImage>>) {
        let _timer = ScopeTimer::new("add_uploads");
        let mut loaded = Vec::with_capacity(sources.len());
        for source in sources {
            match source {
                Ok(source) => {
                    let texture = ctx.load_texture(
                        format!("upload_{}", source.name),
                        source.to_color_image(),
                        TextureOptions::LINEAR,
                    );
                    loaded.push((source, texture));
                }
                Err(err) => {
                    log::warn!("{err}");
                    self.session.set_error(err.to_string());
                }
            }
        }
        self.session.add_images(loaded);
    }

    fn load_result_texture(&mut self, ctx: &egui::Context) {
        self.result_texture = None;
        let Some(result) = self.session.result() else {
            return;
        };
        match result.decode() {
            Ok(image) => {
                let rgba = image.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                self.result_texture =
                    Some(ctx.load_texture("generated_result", color_image, TextureOptions::LINEAR));
            }
            Err(err) => {
                log::error!("Could not decode generated image: {err}");
                self.session
                    .set_error("The generated image could not be displayed.");
            }
        }
    }

    /// Ask where to save, then write on a worker thread.
    pub(crate) fn start_download(&mut self) {
        if self.download_task.is_some() {
            return;
        }
        let Some(image) = self.session.result().cloned() else {
            return;
        };
        let Some(path) = exporter::pick_save_path(&exporter::default_file_name()) else {
            return;
        };
        self.download_message = Some("Saving...".to_string());
        self.download_task = Some(thread::spawn(move || {
            exporter::save_png(&image, path).map_err(|err| err.to_string())
        }));
    }

    fn poll_download(&mut self) {
        if let Some(handle) = self.download_task.as_ref() {
            if handle.is_finished() {
                let result = self
                    .download_task
                    .take()
                    .and_then(|h| h.join().ok())
                    .unwrap_or_else(|| Err("Download thread panicked".to_string()));
                self.download_message = Some(match result {
                    Ok(path) => format!("Saved to {}", path.display()),
                    Err(err) => format!("Download failed: {err}"),
                });
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let undo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            if let Some(mask) = self.session.mask_mut() {
                mask.undo();
            }
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        if self.session.poll() {
            self.load_result_texture(ctx);
        }
        if self.session.result().is_none() {
            self.result_texture = None;
            self.show_fullscreen = false;
        }
        self.poll_download();

        ui::control_panel::control_panel(self, ctx);
        ui::image_display::image_display(self, ctx);
        ui::fullscreen::fullscreen_viewer(self, ctx);

        if self.session.is_pending() || self.download_task.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
