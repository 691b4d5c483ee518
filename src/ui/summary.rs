use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Curve;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bottom panel – extracted parameters, raw samples, report
// ---------------------------------------------------------------------------

pub fn summary_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Draft report").clicked() {
            state.draft_report(chrono::Local::now().date_naive());
        }
        if let Some(json) = &state.report_json {
            if ui.button("Copy report JSON").clicked() {
                ui.ctx().copy_text(json.clone());
            }
            ui.label(RichText::new("Report draft ready").weak());
        }
    });
    ui.separator();

    let Some(curve) = state.session.current() else {
        return;
    };

    ui.columns(2, |cols| {
        parameter_grid(&mut cols[0], curve);
        sample_table(&mut cols[1], curve);
    });
}

fn value_cell(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).strong());
    ui.end_row();
}

fn parameter_grid(ui: &mut Ui, curve: &Curve) {
    ui.heading(curve.display_name());
    egui::Grid::new("parameter_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            value_cell(ui, "Irradiance", format!("{:.0} W/m²", curve.irradiance()));
            value_cell(ui, "Temperature", format!("{:.1} °C", curve.temperature()));
            value_cell(ui, "Pmax (measured)", format!("{:.1} W", curve.measured_max_power()));
            value_cell(ui, "Pmax (STC)", format!("{:.1} W", curve.corrected_max_power()));
            value_cell(ui, "Voc", format!("{:.2} V", curve.open_circuit_voltage()));
            value_cell(ui, "Isc", format!("{:.2} A", curve.short_circuit_current()));
            value_cell(ui, "Vmp", format!("{:.2} V", curve.v_at_max_power()));
            value_cell(ui, "Imp", format!("{:.2} A", curve.i_at_max_power()));
            value_cell(ui, "Fill factor", format!("{:.3}", curve.fill_factor()));
        });
}

fn sample_table(ui: &mut Ui, curve: &Curve) {
    let samples = curve.samples();
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::remainder().at_least(60.0), 6)
        .header(20.0, |mut header| {
            for title in ["V", "I", "P", "V STC", "I STC", "P STC"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, samples.len(), |mut row| {
                let s = samples[row.index()];
                for value in [
                    s.voltage,
                    s.current,
                    s.power(),
                    s.voltage_corrected,
                    s.current_corrected,
                    s.power_corrected(),
                ] {
                    row.col(|ui| {
                        ui.label(format!("{value:.3}"));
                    });
                }
            });
        });
}
