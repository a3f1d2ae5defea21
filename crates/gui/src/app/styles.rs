//! Application style configuration

use eframe::egui;
use roomplan_lib::state::settings::ViewportSettings;

const FONT_SIZE: f32 = 14.0;

/// Dark theme with the selection highlight taken from the viewport colors
pub fn configure_styles(ctx: &egui::Context, colors: &ViewportSettings) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(3);
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(4);

    style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 34);
    style.visuals.window_fill = egui::Color32::from_rgb(35, 35, 40);

    // Selected widgets share the viewport's selection tint, darkened for contrast
    let [r, g, b] = colors.selection_color;
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(r / 3, g / 3, b / 3);

    for (text_style, font) in [
        (egui::TextStyle::Body, egui::FontId::proportional(FONT_SIZE)),
        (egui::TextStyle::Button, egui::FontId::proportional(FONT_SIZE)),
        (egui::TextStyle::Small, egui::FontId::proportional(FONT_SIZE * 0.85)),
        (egui::TextStyle::Heading, egui::FontId::proportional(FONT_SIZE * 1.3)),
        (egui::TextStyle::Monospace, egui::FontId::monospace(FONT_SIZE)),
    ] {
        style.text_styles.insert(text_style, font);
    }

    ctx.set_style(style);
}
