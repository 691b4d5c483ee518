use eframe::egui::Ui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::data::model::{Curve, SeriesKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Curve plot (central panel)
// ---------------------------------------------------------------------------

/// Render the I-V / P-V plot in the central panel.
pub fn curve_plot(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for kind in [SeriesKind::Iv, SeriesKind::Pv] {
            ui.selectable_value(&mut state.chart, kind, kind.label());
        }
        ui.separator();
        ui.checkbox(&mut state.show_corrected, "STC");
        ui.checkbox(&mut state.overlay_all, "All curves");
    });

    let Some(current) = state.session.current() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open I-V exports to analyse  (File → Open… or drop files here)");
        });
        return;
    };

    let curves: Vec<&Curve> = if state.overlay_all {
        state.session.curves().iter().collect()
    } else {
        vec![current]
    };
    let kind = state.chart;

    Plot::new("curve_plot")
        .legend(Legend::default())
        .x_axis_label("Voltage (V)")
        .y_axis_label(kind.y_axis_label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for curve in curves {
                let colors = state.color_map.colors_for(curve.source_name());
                let series = curve.series(kind);
                let name = curve.display_name();

                plot_ui.line(
                    Line::new(PlotPoints::from(series.measured))
                        .name(format!("{name} measured"))
                        .color(colors.measured)
                        .width(2.0),
                );
                if state.show_corrected {
                    plot_ui.line(
                        Line::new(PlotPoints::from(series.corrected))
                            .name(format!("{name} STC"))
                            .color(colors.corrected)
                            .style(LineStyle::dashed_loose())
                            .width(2.0),
                    );
                }

                // Mark the measured MPP on the selected curve.
                if curve.source_name() == current.source_name() && !curve.is_empty() {
                    let y = match kind {
                        SeriesKind::Iv => curve.i_at_max_power(),
                        SeriesKind::Pv => curve.measured_max_power(),
                    };
                    plot_ui.points(
                        Points::new(vec![[curve.v_at_max_power(), y]])
                            .name(format!("{name} MPP"))
                            .color(colors.measured)
                            .radius(5.0),
                    );
                }
            }
        });
}
