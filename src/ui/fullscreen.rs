use eframe::egui;

use super::{fit_size, FULL_UV};
use crate::app::StudioApp;

/// Full-window view of the result. Escape, the close button or a click
/// outside the image dismisses it.
pub fn fullscreen_viewer(app: &mut StudioApp, ctx: &egui::Context) {
    if !app.show_fullscreen {
        return;
    }
    let Some(texture) = app.result_texture.as_ref() else {
        app.show_fullscreen = false;
        return;
    };

    let screen = ctx.screen_rect();
    let mut close = ctx.input(|i| i.key_pressed(egui::Key::Escape));

    egui::Area::new(egui::Id::new("fullscreen_viewer"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            let backdrop = ui.allocate_rect(screen, egui::Sense::click());
            let painter = ui.painter();
            painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(230));

            let size = fit_size(texture.size_vec2(), screen.shrink(32.0).size(), f32::INFINITY);
            let image_rect = egui::Rect::from_center_size(screen.center(), size);
            painter.image(texture.id(), image_rect, FULL_UV, egui::Color32::WHITE);

            let button_rect = egui::Rect::from_min_size(
                screen.right_top() + egui::vec2(-52.0, 16.0),
                egui::vec2(36.0, 36.0),
            );
            if ui.put(button_rect, egui::Button::new("✕")).clicked() {
                close = true;
            }

            if backdrop.clicked()
                && backdrop
                    .interact_pointer_pos()
                    .is_some_and(|pos| !image_rect.contains(pos))
            {
                close = true;
            }
        });

    if close {
        app.show_fullscreen = false;
    }
}
