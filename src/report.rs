use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::data::model::{CurveSummary, Sample, STC_IRRADIANCE, STC_TEMPERATURE};
use crate::data::session::Session;

// ---------------------------------------------------------------------------
// Plant and datasheet metadata
// ---------------------------------------------------------------------------

/// Installation under test, entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlantData {
    pub name: String,
    pub inverter_count: u32,
    pub modules_per_string: u32,
    pub nominal_power_wp: f64,
}

/// Module datasheet. The PDF itself is never read; nameplate values are
/// entered alongside it and passed through as opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Datasheet {
    pub file_name: String,
    pub nameplate: BTreeMap<String, String>,
}

impl Datasheet {
    /// Nameplate fields offered for entry in the viewer.
    pub const NAMEPLATE_KEYS: [&'static str; 5] =
        ["Pmax (W)", "Voc (V)", "Isc (A)", "Vmp (V)", "Imp (A)"];

    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            nameplate: BTreeMap::new(),
        }
    }
}

/// Something the report still needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingItem {
    PlantName,
    InverterCount,
    ModulesPerString,
    NominalPower,
    Datasheet,
    Curves,
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MissingItem::PlantName => "plant name",
            MissingItem::InverterCount => "number of inverters",
            MissingItem::ModulesPerString => "modules per string",
            MissingItem::NominalPower => "nominal power",
            MissingItem::Datasheet => "module datasheet",
            MissingItem::Curves => "at least one I-V curve",
        };
        f.write_str(text)
    }
}

/// Check that everything a report needs is present.
pub fn readiness(
    plant: &PlantData,
    datasheet: Option<&Datasheet>,
    session: &Session,
) -> Result<(), Vec<MissingItem>> {
    let checks = [
        (!plant.name.trim().is_empty(), MissingItem::PlantName),
        (plant.inverter_count > 0, MissingItem::InverterCount),
        (plant.modules_per_string > 0, MissingItem::ModulesPerString),
        (plant.nominal_power_wp > 0.0, MissingItem::NominalPower),
        (datasheet.is_some(), MissingItem::Datasheet),
        (!session.is_empty(), MissingItem::Curves),
    ];
    let missing: Vec<MissingItem> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, item)| item)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

// ---------------------------------------------------------------------------
// Report draft
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report is missing: {}", join(.0))]
    NotReady(Vec<MissingItem>),

    #[error("encoding report: {0}")]
    Encode(#[from] serde_json::Error),
}

fn join(items: &[MissingItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Test equipment and reference conditions printed on every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    pub tracer: String,
    pub standard: String,
    pub reference_conditions: String,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            tracer: "I-V curve tracer E-1500, 35 A".to_string(),
            standard: "IEC 61215".to_string(),
            reference_conditions: format!(
                "{STC_IRRADIANCE} W/m², {STC_TEMPERATURE} °C, AM 1.5"
            ),
        }
    }
}

pub const REPORT_SECTIONS: [&str; 8] = [
    "1. Introduction and objectives",
    "2. Equipment",
    "3. Module electrical data",
    "4. Measurement results",
    "5. I-V and P-V charts",
    "6. Comparative analysis",
    "7. Conclusions and remarks",
    "8. Appendix (raw data)",
];

/// Everything a document renderer needs, in a stable serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDraft {
    pub title: String,
    pub test_date: NaiveDate,
    pub plant: PlantData,
    pub datasheet: Datasheet,
    pub equipment: Equipment,
    pub sections: Vec<String>,
    /// Measurement files in session order.
    pub files: Vec<String>,
    /// The curve on display when the draft was taken.
    pub selected: CurveSummary,
    /// Raw samples of the selected curve, for the appendix.
    pub selected_samples: Vec<Sample>,
    pub curves: Vec<CurveSummary>,
}

impl ReportDraft {
    pub fn build(
        plant: &PlantData,
        datasheet: Option<&Datasheet>,
        session: &Session,
        test_date: NaiveDate,
    ) -> Result<Self, ReportError> {
        readiness(plant, datasheet, session).map_err(ReportError::NotReady)?;

        let (Some(datasheet), Some(selected)) = (datasheet, session.current()) else {
            // readiness() guarantees both; an empty selection means no curves.
            return Err(ReportError::NotReady(vec![MissingItem::Curves]));
        };

        Ok(Self {
            title: "I-V curve test report".to_string(),
            test_date,
            plant: plant.clone(),
            datasheet: datasheet.clone(),
            equipment: Equipment::default(),
            sections: REPORT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            files: session.keys().map(str::to_string).collect(),
            selected: selected.summary(),
            selected_samples: selected.samples().to_vec(),
            curves: session.curves().iter().map(|c| c.summary()).collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant() -> PlantData {
        PlantData {
            name: "Usina Norte".to_string(),
            inverter_count: 4,
            modules_per_string: 22,
            nominal_power_wp: 550.0,
        }
    }

    fn session() -> Session {
        let mut session = Session::new();
        session.add_file("s1.csv", "V,I,Vc,Ic,G,T\n10,2,10,2,1000,25\n8,3,8.5,3.1\n5,4,5,4\n");
        session.add_file("s2.csv", "V,I,Vc,Ic\n40,8,41,8.2\n");
        session
    }

    #[test]
    fn readiness_lists_every_gap() {
        let missing = readiness(&PlantData::default(), None, &Session::new()).unwrap_err();
        assert_eq!(
            missing,
            vec![
                MissingItem::PlantName,
                MissingItem::InverterCount,
                MissingItem::ModulesPerString,
                MissingItem::NominalPower,
                MissingItem::Datasheet,
                MissingItem::Curves,
            ]
        );
    }

    #[test]
    fn readiness_passes_when_complete() {
        let datasheet = Datasheet::new("module.pdf");
        assert!(readiness(&plant(), Some(&datasheet), &session()).is_ok());
    }

    #[test]
    fn whitespace_name_is_missing() {
        let mut p = plant();
        p.name = "   ".to_string();
        let missing = readiness(&p, Some(&Datasheet::new("m.pdf")), &session()).unwrap_err();
        assert_eq!(missing, vec![MissingItem::PlantName]);
    }

    #[test]
    fn draft_uses_selected_curve() {
        let mut session = session();
        session.select("s2.csv").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let draft =
            ReportDraft::build(&plant(), Some(&Datasheet::new("module.pdf")), &session, date)
                .unwrap();

        assert_eq!(draft.selected.source_name, "s2.csv");
        assert_eq!(draft.selected.max_power, 320.0);
        assert_eq!(draft.selected_samples.len(), 1);
        assert_eq!(draft.files, vec!["s1.csv", "s2.csv"]);
        assert_eq!(draft.curves.len(), 2);
        assert_eq!(draft.curves[0].max_power, 24.0);
        assert_eq!(draft.sections.len(), 8);
    }

    #[test]
    fn draft_refuses_incomplete_input() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let err = ReportDraft::build(&plant(), None, &session(), date).unwrap_err();
        assert!(matches!(err, ReportError::NotReady(ref m) if m == &vec![MissingItem::Datasheet]));
        assert_eq!(err.to_string(), "report is missing: module datasheet");
    }

    #[test]
    fn draft_json_has_named_fields() {
        let mut datasheet = Datasheet::new("module.pdf");
        datasheet
            .nameplate
            .insert("Pmax (W)".to_string(), "550".to_string());
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let draft = ReportDraft::build(&plant(), Some(&datasheet), &session(), date).unwrap();

        let json: serde_json::Value = serde_json::from_str(&draft.to_json().unwrap()).unwrap();
        assert_eq!(json["test_date"], "2026-10-19");
        assert_eq!(json["plant"]["name"], "Usina Norte");
        assert_eq!(json["plant"]["nominal_power_wp"], 550.0);
        assert_eq!(json["datasheet"]["nameplate"]["Pmax (W)"], "550");
        assert_eq!(json["selected"]["source_name"], "s1.csv");
        assert_eq!(json["selected"]["vmp"], 8.0);
        assert_eq!(json["equipment"]["standard"], "IEC 61215");
    }
}
