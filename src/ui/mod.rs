//! egui panels for prompting, uploading, masking and viewing results.
pub mod control_panel;
pub mod fullscreen;
pub mod image_display;
pub mod mask_toolbar;

use eframe::egui;

/// Texture coordinates covering the whole image.
pub(crate) const FULL_UV: egui::Rect =
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

/// Largest size with the image's aspect ratio that fits `available`,
/// scaled by at most `max_scale`.
pub(crate) fn fit_size(image: egui::Vec2, available: egui::Vec2, max_scale: f32) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (available.x / image.x)
        .min(available.y / image.y)
        .min(max_scale)
        .max(0.0);
    image * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        let fitted = fit_size(egui::vec2(1000.0, 500.0), egui::vec2(400.0, 400.0), 1.0);
        assert_eq!(fitted, egui::vec2(400.0, 200.0));
    }

    #[test]
    fn fit_never_upscales_past_the_cap() {
        let small = egui::vec2(100.0, 50.0);
        assert_eq!(fit_size(small, egui::vec2(800.0, 800.0), 1.0), small);
        assert_eq!(
            fit_size(small, egui::vec2(800.0, 800.0), f32::INFINITY),
            egui::vec2(800.0, 400.0)
        );
        assert_eq!(fit_size(egui::Vec2::ZERO, small, 1.0), egui::Vec2::ZERO);
    }
}
