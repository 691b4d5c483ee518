use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::report::Datasheet;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – plant data and curve list
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            plant_form(ui, state);
            ui.separator();
            datasheet_form(ui, state);
            ui.separator();
            curve_list(ui, state);
        });
}

fn plant_form(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Plant").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("plant_grid")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut state.plant.name);
                    ui.end_row();

                    ui.label("Inverters");
                    ui.add(DragValue::new(&mut state.plant.inverter_count).range(0..=10_000));
                    ui.end_row();

                    ui.label("Modules / string");
                    ui.add(DragValue::new(&mut state.plant.modules_per_string).range(0..=1_000));
                    ui.end_row();

                    ui.label("Nominal power");
                    ui.add(
                        DragValue::new(&mut state.plant.nominal_power_wp)
                            .range(0.0..=f64::MAX)
                            .suffix(" Wp"),
                    );
                    ui.end_row();
                });
        });
}

fn datasheet_form(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Datasheet").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let Some(datasheet) = state.datasheet.as_mut() else {
                ui.label("No datasheet loaded.");
                return;
            };
            ui.label(&datasheet.file_name);
            egui::Grid::new("nameplate_grid")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    for key in Datasheet::NAMEPLATE_KEYS {
                        ui.label(key);
                        let value = datasheet.nameplate.entry(key.to_string()).or_default();
                        ui.text_edit_singleline(value);
                        ui.end_row();
                    }
                });
            if ui.small_button("Remove").clicked() {
                state.datasheet = None;
            }
        });
}

fn curve_list(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Curves");

    if state.session.is_empty() && state.session.failures().is_empty() {
        ui.label("No curve loaded.");
        return;
    }

    let selected = state.session.selected_key().map(str::to_string);
    let mut clicked = None;
    let mut removed = None;

    for curve in state.session.curves() {
        let key = curve.source_name();
        let colors = state.color_map.colors_for(key);
        ui.horizontal(|ui: &mut Ui| {
            let text = RichText::new(curve.display_name()).color(colors.measured);
            if ui
                .selectable_label(selected.as_deref() == Some(key), text)
                .on_hover_text(format!("{} sample(s)", curve.len()))
                .clicked()
            {
                clicked = Some(key.to_string());
            }
            if curve.is_empty() {
                ui.label(RichText::new("no valid rows").color(Color32::YELLOW));
            }
            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                removed = Some(key.to_string());
            }
        });
    }

    for failure in state.session.failures() {
        ui.label(RichText::new(&failure.name).color(Color32::RED).strikethrough())
            .on_hover_text(failure.error.to_string());
    }

    if let Some(key) = clicked {
        state.select_curve(&key);
    }
    if let Some(key) = removed {
        state.remove_curve(&key);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear curves").clicked() {
                state.clear_curves();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.session.is_empty() {
            ui.label(format!("{} curve(s) loaded", state.session.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open I-V curves and datasheet")
        .add_filter("Supported files", &["csv", "txt", "pdf"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Datasheet", &["pdf"])
        .pick_files();

    if let Some(paths) = files {
        log::info!("opening {} file(s)", paths.len());
        state.ingest_paths(paths);
    }
}
