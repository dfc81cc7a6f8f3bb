use eframe::egui;
use eframe::egui::TextureOptions;

use super::{fit_size, mask_toolbar::mask_toolbar, FULL_UV};
use crate::app::input_handler::{handle_mask_input, paint_brush_cursor};
use crate::app::state::StudioMode;
use crate::app::StudioApp;
use crate::canvas::MaskCanvas;

/// Central panel. Shows, in order of priority: progress, error, result,
/// the mask editor, or a placeholder.
pub fn image_display(app: &mut StudioApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if app.session.is_pending() {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new().size(48.0));
                    ui.label("Working on it...");
                });
            });
            return;
        }

        if let Some(message) = app.session.error().map(str::to_owned) {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.colored_label(egui::Color32::from_rgb(248, 113, 113), message);
                if ui.button("Dismiss").clicked() {
                    app.session.clear_error();
                }
            });
            return;
        }

        if app.result_texture.is_some() {
            result_view(app, ui);
            return;
        }

        let has_reference = app
            .session
            .uploads()
            .is_some_and(|uploads| !uploads.is_empty());
        if has_reference {
            mask_editor(app, ui);
            return;
        }

        ui.centered_and_justified(|ui| {
            let text = match app.session.mode() {
                StudioMode::Generate(_) => "Your generated image will appear here.",
                StudioMode::Edit(_) => "Upload an image to start editing.",
            };
            ui.weak(text);
        });
    });
}

fn result_view(app: &mut StudioApp, ui: &mut egui::Ui) {
    let Some(texture) = app.result_texture.as_ref() else {
        return;
    };
    let mut fullscreen = false;
    let mut download = false;
    let mut dismiss = false;

    ui.vertical_centered(|ui| {
        ui.horizontal(|ui| {
            fullscreen = ui.button("Fullscreen").clicked();
            download = ui
                .add_enabled(app.download_task.is_none(), egui::Button::new("Download"))
                .clicked();
            dismiss = ui.button("Dismiss").clicked();
            if let Some(message) = &app.download_message {
                ui.weak(message);
            }
        });
        ui.add_space(8.0);

        let size = fit_size(texture.size_vec2(), ui.available_size(), 1.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        ui.painter()
            .image(texture.id(), rect, FULL_UV, egui::Color32::WHITE);
        if response.on_hover_text("Click to view fullscreen").clicked() {
            fullscreen = true;
        }
    });

    if fullscreen {
        app.show_fullscreen = true;
    }
    if download {
        app.start_download();
    }
    if dismiss {
        app.session.clear_result();
        app.result_texture = None;
    }
}

fn mask_editor(app: &mut StudioApp, ui: &mut egui::Ui) {
    let StudioMode::Edit(edit) = app.session.mode_mut() else {
        return;
    };
    let Some(reference) = edit.uploads.first() else {
        return;
    };

    mask_toolbar(ui, &mut edit.mask);
    ui.add_space(8.0);

    let size = fit_size(reference.handle.size_vec2(), ui.available_size(), 1.0);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
    ui.painter()
        .image(reference.handle.id(), rect, FULL_UV, egui::Color32::WHITE);

    let mask = &mut edit.mask;
    let pixels_per_point = ui.ctx().pixels_per_point();
    mask.set_display_scale(pixels_per_point);
    mask.sync_size(
        (rect.width() * pixels_per_point).round() as u32,
        (rect.height() * pixels_per_point).round() as u32,
    );
    handle_mask_input(ui.ctx(), mask, &response, rect);

    sync_overlay(ui.ctx(), &mut app.mask_overlay, &mut app.mask_overlay_revision, mask);
    if let Some(overlay) = &app.mask_overlay {
        ui.painter()
            .image(overlay.id(), rect, FULL_UV, egui::Color32::WHITE);
    }
    paint_brush_cursor(ui, mask, &response);
}

/// Re-upload the overlay texture only when the mask raster changed.
fn sync_overlay(
    ctx: &egui::Context,
    overlay: &mut Option<egui::TextureHandle>,
    revision: &mut Option<u64>,
    mask: &MaskCanvas,
) {
    if *revision == Some(mask.revision()) && (overlay.is_some() || !mask.is_ready()) {
        return;
    }
    *revision = Some(mask.revision());
    match (mask.overlay_image(), overlay.as_mut()) {
        (Some(image), Some(texture)) => texture.set(image, TextureOptions::LINEAR),
        (Some(image), None) => {
            *overlay = Some(ctx.load_texture("mask_overlay", image, TextureOptions::LINEAR));
        }
        (None, _) => *overlay = None,
    }
}
