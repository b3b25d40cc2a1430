use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// Chart surfaces
pub const BG_DARK: Color32 = Color32::from_rgb(22, 24, 30);
pub const BG_PANEL: Color32 = Color32::from_rgb(29, 31, 39);
pub const BG_HEADER: Color32 = Color32::from_rgb(35, 38, 48);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 5);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(72, 132, 214, 45);

pub const GRID_LINE: Color32 = Color32::from_rgb(43, 46, 57);
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(52, 55, 67);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(96, 150, 228);
pub const HANDLE_COLOR: Color32 = Color32::WHITE;
pub const TODAY_LINE: Color32 = Color32::from_rgb(236, 84, 72);

// Text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 230, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(152, 158, 176);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 104, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;
pub const ERROR_TEXT: Color32 = Color32::from_rgb(240, 110, 100);

// Geometry
pub const LABEL_WIDTH: f32 = 220.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
/// Vertical inset between a bar and its row edges.
pub const BAR_INSET: f32 = 3.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const HANDLE_WIDTH: f32 = 7.0;

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

/// Bar color for a project status label.
pub fn status_color(status: &str) -> Color32 {
    match status.trim().to_lowercase().as_str() {
        "done" | "completed" | "complete" | "delivered" => Color32::from_rgb(52, 168, 83),
        "active" | "in progress" | "in-progress" | "ongoing" => Color32::from_rgb(66, 133, 244),
        "on hold" | "on-hold" | "paused" | "blocked" => Color32::from_rgb(251, 140, 0),
        "cancelled" | "canceled" => Color32::from_rgb(120, 124, 140),
        "planned" | "draft" | "pitch" => Color32::from_rgb(171, 71, 188),
        _ => Color32::from_rgb(70, 130, 180),
    }
}

/// Dark visuals for the menu bar, toolbar and status bar.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, BORDER_ACCENT);
    ctx.set_visuals(visuals);
}
