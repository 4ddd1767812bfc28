use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Tasks...").clicked() {
                app.open_tasks();
                ui.close_menu();
            }
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save Tasks As...").clicked() {
                app.save_tasks_as();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            let keys: Vec<_> = app.registry.keys().collect();
            for key in keys {
                if ui
                    .radio(app.settings.active_scale == key, key.title())
                    .clicked()
                {
                    app.set_scale(key);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("  Reload Scale Overrides").clicked() {
                app.reload_scales();
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("sample tasks");
            ui.label(
                RichText::new(format!("{} · {}", source, app.settings.active_scale.title()))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
