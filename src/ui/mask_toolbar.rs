use eframe::egui;

use crate::brush_engine::brush::{MAX_DIAMETER, MIN_DIAMETER};
use crate::canvas::MaskCanvas;

/// Brush size slider plus Undo and Clear for the mask.
pub fn mask_toolbar(ui: &mut egui::Ui, mask: &mut MaskCanvas) {
    ui.horizontal(|ui| {
        ui.label("Brush size");
        let mut diameter = mask.brush().diameter();
        if ui
            .add(egui::Slider::new(&mut diameter, MIN_DIAMETER..=MAX_DIAMETER).suffix(" px"))
            .changed()
        {
            mask.brush_mut().set_diameter(diameter);
        }

        ui.separator();
        let can_undo = mask.can_undo();
        if ui
            .add_enabled(can_undo, egui::Button::new("Undo"))
            .on_hover_text("Ctrl+Z")
            .clicked()
        {
            mask.undo();
        }
        if ui
            .add_enabled(can_undo, egui::Button::new("Clear"))
            .clicked()
        {
            mask.clear();
        }
    });
    ui.weak("Paint over the area you want to change. Leave it empty to edit the whole image.");
}
