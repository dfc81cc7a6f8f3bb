use eframe::egui;
use eframe::egui::Color32;

/// Violet accent shared with the mask paint.
pub const ACCENT: Color32 = Color32::from_rgb(139, 92, 246);

/// Dark theme with violet accents and roomy spacing.
pub fn apply_global_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = Color32::from_rgb(17, 17, 27);
    visuals.window_fill = Color32::from_rgb(24, 24, 37);
    visuals.extreme_bg_color = Color32::from_rgb(30, 30, 46);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(39, 39, 58);
    visuals.widgets.inactive.weak_bg_fill = Color32::from_rgb(39, 39, 58);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(76, 56, 140);
    visuals.widgets.hovered.weak_bg_fill = Color32::from_rgb(76, 56, 140);
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.widgets.inactive.fg_stroke.color = Color32::from_rgb(226, 226, 240);
    visuals.widgets.hovered.fg_stroke.color = Color32::WHITE;
    visuals.selection.bg_fill = Color32::from_rgb(109, 40, 217);
    visuals.selection.stroke.color = Color32::WHITE;
    visuals.hyperlink_color = Color32::from_rgb(196, 181, 253);
    visuals.window_rounding = egui::Rounding::same(10.0);
    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    visuals.window_shadow = egui::Shadow {
        offset: egui::vec2(0.0, 8.0),
        blur: 28.0,
        spread: 2.0,
        color: Color32::from_black_alpha(140),
    };

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.slider_width = 160.0;

    ctx.set_style(style);
}
