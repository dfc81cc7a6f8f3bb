use eframe::egui;

use crate::api::{AspectRatio, GenerateModel};
use crate::app::state::{ModeKind, StudioMode};
use crate::app::StudioApp;

const THUMBNAIL_SIZE: f32 = 48.0;

/// Left panel: mode switch, prompt, per-mode options and the submit button.
pub fn control_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::SidePanel::left("controls")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Rusty Inpainter");
            ui.add_space(4.0);

            let pending = app.session.is_pending();
            let current = app.session.mode_kind();
            ui.add_enabled_ui(!pending, |ui| {
                ui.horizontal(|ui| {
                    for kind in ModeKind::ALL {
                        if ui.selectable_label(current == kind, kind.label()).clicked() {
                            app.switch_mode(kind);
                        }
                    }
                });
            });
            ui.separator();

            let hint = match current {
                ModeKind::Generate => "A photorealistic image of a cat wearing a tiny wizard hat",
                ModeKind::Edit => "Describe the edit, e.g. add a red scarf",
            };
            ui.label("Prompt");
            ui.add(
                egui::TextEdit::multiline(&mut app.session.prompt)
                    .hint_text(hint)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(6.0);

            match current {
                ModeKind::Generate => generate_options(app, ui),
                ModeKind::Edit => upload_list(app, ui),
            }

            ui.add_space(10.0);
            let label = match (pending, current) {
                (true, _) => "Processing...",
                (false, ModeKind::Generate) => "Generate",
                (false, ModeKind::Edit) => "Edit image",
            };
            let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 36.0));
            if ui.add_enabled(!pending, button).clicked() {
                app.submit();
            }
        });
}

fn generate_options(app: &mut StudioApp, ui: &mut egui::Ui) {
    let StudioMode::Generate(options) = app.session.mode_mut() else {
        return;
    };
    egui::Grid::new("generate_options")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Model");
            egui::ComboBox::from_id_salt("model")
                .selected_text(options.model.label())
                .show_ui(ui, |ui| {
                    for model in GenerateModel::ALL {
                        ui.selectable_value(&mut options.model, model, model.label());
                    }
                });
            ui.end_row();

            ui.label("Aspect ratio");
            egui::ComboBox::from_id_salt("aspect_ratio")
                .selected_text(options.aspect_ratio.as_str())
                .show_ui(ui, |ui| {
                    for ratio in AspectRatio::ALL {
                        ui.selectable_value(&mut options.aspect_ratio, ratio, ratio.as_str());
                    }
                });
            ui.end_row();
        });
}

fn upload_list(app: &mut StudioApp, ui: &mut egui::Ui) {
    let pending = app.session.is_pending();
    if ui
        .add_enabled(!pending, egui::Button::new("Add images..."))
        .clicked()
    {
        app.open_file_dialog(ui.ctx());
    }
    ui.weak("or drop image files onto the window");
    ui.add_space(4.0);

    let mut remove = None;
    if let Some(uploads) = app.session.uploads() {
        egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
            for (index, upload) in uploads.iter().enumerate() {
                ui.horizontal(|ui| {
                    let size = upload.handle.size_vec2();
                    let scale = THUMBNAIL_SIZE / size.x.max(size.y).max(1.0);
                    ui.image((upload.handle.id(), size * scale));
                    ui.vertical(|ui| {
                        ui.label(&upload.source.name);
                        let (w, h) = upload.source.dimensions();
                        let role = if index == 0 { " · reference" } else { "" };
                        ui.weak(format!("{w}×{h}{role}"));
                    });
                    if ui.add_enabled(!pending, egui::Button::new("✕")).clicked() {
                        remove = Some(index);
                    }
                });
            }
        });
    }
    if let Some(index) = remove {
        app.session.remove_image(index);
    }
}
