use eframe::egui;

use crate::canvas::MaskCanvas;
use crate::utils::vector::Vec2;

/// Route primary-button drags over the reference image into mask strokes.
pub fn handle_mask_input(
    ctx: &egui::Context,
    mask: &mut MaskCanvas,
    response: &egui::Response,
    image_rect: egui::Rect,
) {
    let to_raster = |mask: &MaskCanvas, pos: egui::Pos2| {
        mask.map_to_raster(
            Vec2::from(pos),
            Vec2::from(image_rect.min),
            Vec2::from(image_rect.size()),
        )
    };

    if response.drag_started_by(egui::PointerButton::Primary) {
        // egui reports the drag only after the pointer moved past its
        // threshold; anchor the stroke where the button went down.
        let origin = ctx
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(start) = origin.and_then(|p| to_raster(mask, p)) {
            mask.begin_stroke(start);
        }
    }

    if mask.is_drawing() && response.dragged_by(egui::PointerButton::Primary) {
        if let Some(pos) = response
            .interact_pointer_pos()
            .and_then(|p| to_raster(mask, p))
        {
            mask.continue_stroke(pos);
        }
        ctx.request_repaint();
    }

    if response.drag_stopped() {
        mask.end_stroke();
    }
}

/// Outline of the brush footprint under the pointer.
pub fn paint_brush_cursor(ui: &egui::Ui, mask: &MaskCanvas, response: &egui::Response) {
    let Some(pos) = response.hover_pos() else {
        return;
    };
    let radius = mask.brush().diameter() * 0.5;
    ui.painter().circle_stroke(
        pos,
        radius,
        egui::Stroke::new(1.5, egui::Color32::from_rgb(196, 181, 253)),
    );
}
