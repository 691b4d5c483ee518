use std::path::PathBuf;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::loader::{self, source_name};
use crate::data::model::SeriesKind;
use crate::data::session::Session;
use crate::report::{Datasheet, PlantData, ReportDraft};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Analysed curves and the selected one.
    pub session: Session,

    /// Plant metadata typed in by the user.
    pub plant: PlantData,

    /// Datasheet picked by the user (None until one is chosen).
    pub datasheet: Option<Datasheet>,

    /// Per-curve colours, rebuilt whenever the session changes.
    pub color_map: ColorMap,

    /// Which chart is shown.
    pub chart: SeriesKind,

    /// Draw every curve instead of only the selected one.
    pub overlay_all: bool,

    /// Draw the STC-corrected lines.
    pub show_corrected: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last report draft, as JSON.
    pub report_json: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::new(),
            plant: PlantData::default(),
            datasheet: None,
            color_map: ColorMap::default(),
            chart: SeriesKind::Iv,
            overlay_all: false,
            show_corrected: true,
            status_message: None,
            report_json: None,
        }
    }
}

impl AppState {
    /// Ingest a user selection: the first PDF becomes the datasheet, every
    /// measurement file is read and analysed, the rest is reported.
    pub fn ingest_paths(&mut self, paths: Vec<PathBuf>) {
        let selection = loader::sort_selection(paths);
        let mut notes = Vec::new();

        if let Some(pdf) = selection.datasheets.first() {
            self.datasheet = Some(Datasheet::new(source_name(pdf)));
            if selection.datasheets.len() > 1 {
                notes.push(format!(
                    "only one datasheet is used, kept {}",
                    source_name(pdf)
                ));
            }
        }
        for path in &selection.unsupported {
            log::warn!("ignoring unsupported file {}", path.display());
            notes.push(format!("{} is not a CSV export", source_name(path)));
        }

        if !selection.measurements.is_empty() {
            let files = loader::load_batch(&selection.measurements);
            let report = self.session.add_batch(files);
            for name in &report.failures {
                notes.push(format!("{name} could not be read"));
            }
            log::info!(
                "loaded {} curve(s), {} failed",
                report.accepted.len(),
                report.failures.len()
            );
            self.rebuild_color_map();
        }

        self.status_message = if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        };
        self.report_json = None;
    }

    /// Recompute curve colours from the session keys.
    pub fn rebuild_color_map(&mut self) {
        self.color_map = ColorMap::new(self.session.keys());
    }

    /// Show a different curve.
    pub fn select_curve(&mut self, key: &str) {
        if let Err(e) = self.session.select(key) {
            log::error!("{e}");
            self.status_message = Some(e.to_string());
        }
    }

    /// Discard a curve from the session.
    pub fn remove_curve(&mut self, key: &str) {
        match self.session.remove(key) {
            Ok(curve) => {
                log::info!("removed {}", curve.source_name());
                self.rebuild_color_map();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Start over with an empty session, keeping plant metadata.
    pub fn clear_curves(&mut self) {
        self.session = Session::with_options(self.session.options().clone());
        self.rebuild_color_map();
        self.report_json = None;
    }

    /// Draft the report for the selected curve.
    pub fn draft_report(&mut self, today: NaiveDate) {
        let result = ReportDraft::build(
            &self.plant,
            self.datasheet.as_ref(),
            &self.session,
            today,
        )
        .and_then(|draft| draft.to_json());

        match result {
            Ok(json) => {
                log::info!("report draft ready ({} bytes)", json.len());
                self.report_json = Some(json);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("cannot draft report: {e}");
                self.report_json = None;
                self.status_message = Some(e.to_string());
            }
        }
    }
}
