use crate::app::TimelineApp;
use crate::model::NavCommand;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top menu bar and the navigation strip.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button("  Open Data File...").clicked() {
                app.open_data_file();
                ui.close_menu();
            }
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Reload").clicked() {
                app.reload();
                ui.close_menu();
            }
        });

        ui.menu_button("  View  ", |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.navigate(NavCommand::ZoomIn);
                ui.close_menu();
            }
            if ui.button("  Zoom Out       Ctrl+Scroll ↓").clicked() {
                app.navigate(NavCommand::ZoomOut);
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Days in view").small().weak());
            let levels = app.viewport.levels().as_slice().to_vec();
            let current = app.viewport.zoom_index();
            for (idx, days) in levels.iter().enumerate() {
                if ui.radio(idx == current, format!("{} days", days)).clicked() {
                    app.set_zoom_index(idx);
                    ui.close_menu();
                }
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = match &app.data_file {
                Some(path) => path.display().to_string(),
                None => "sample data (not saved)".to_string(),
            };
            ui.label(RichText::new(source).size(11.0).weak());
        });
    });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let enabled = !app.drag.is_active();
        ui.add_enabled_ui(enabled, |ui| {
            if ui
                .button(icons::CARET_LEFT)
                .on_hover_text("Previous window (←)")
                .clicked()
            {
                app.navigate(NavCommand::Previous);
            }
            if ui.button("Today").on_hover_text("Jump to today (T)").clicked() {
                app.navigate(NavCommand::Today);
            }
            if ui
                .button(icons::CARET_RIGHT)
                .on_hover_text("Next window (→)")
                .clicked()
            {
                app.navigate(NavCommand::Next);
            }

            ui.separator();

            if ui
                .add_enabled(
                    app.viewport.can_zoom_in(),
                    egui::Button::new(icons::MAGNIFYING_GLASS_PLUS),
                )
                .on_hover_text("Zoom in (+)")
                .clicked()
            {
                app.navigate(NavCommand::ZoomIn);
            }
            if ui
                .add_enabled(
                    app.viewport.can_zoom_out(),
                    egui::Button::new(icons::MAGNIFYING_GLASS_MINUS),
                )
                .on_hover_text("Zoom out (−)")
                .clicked()
            {
                app.navigate(NavCommand::ZoomOut);
            }
        });

        ui.separator();
        let last_day = app.viewport.window_end() - chrono::Duration::days(1);
        ui.label(
            RichText::new(format!(
                "{} – {}  ·  {} days",
                app.viewport.window_start.format("%d %b %Y"),
                last_day.format("%d %b %Y"),
                app.viewport.days_in_view()
            ))
            .font(theme::font_header())
            .color(theme::TEXT_SECONDARY),
        );
    });
    ui.add_space(4.0);
}
