use serde::Serialize;

/// Reference irradiance of Standard Test Conditions, W/m².
pub const STC_IRRADIANCE: f64 = 1000.0;
/// Reference cell temperature of Standard Test Conditions, °C.
pub const STC_TEMPERATURE: f64 = 25.0;

// ---------------------------------------------------------------------------
// Sample – one measured point of the sweep
// ---------------------------------------------------------------------------

/// One point of an I–V sweep, as measured and as corrected to STC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Measured voltage (V).
    pub voltage: f64,
    /// Measured current (A).
    pub current: f64,
    /// Voltage corrected to STC (V).
    pub voltage_corrected: f64,
    /// Current corrected to STC (A).
    pub current_corrected: f64,
}

impl Sample {
    pub fn new(voltage: f64, current: f64, voltage_corrected: f64, current_corrected: f64) -> Self {
        Self {
            voltage,
            current,
            voltage_corrected,
            current_corrected,
        }
    }

    /// A sample without a correction; the corrected values mirror the measured ones.
    pub fn measured(voltage: f64, current: f64) -> Self {
        Self::new(voltage, current, voltage, current)
    }

    /// Measured power (W).
    pub fn power(&self) -> f64 {
        self.voltage * self.current
    }

    /// STC-corrected power (W).
    pub fn power_corrected(&self) -> f64 {
        self.voltage_corrected * self.current_corrected
    }
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// Which of the two chart views a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesKind {
    /// Current against voltage.
    #[default]
    Iv,
    /// Power against voltage.
    Pv,
}

impl SeriesKind {
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Iv => "I-V",
            SeriesKind::Pv => "P-V",
        }
    }

    pub fn y_axis_label(self) -> &'static str {
        match self {
            SeriesKind::Iv => "Current (A)",
            SeriesKind::Pv => "Power (W)",
        }
    }
}

/// A pair of plot lines (measured and STC) projected from a curve's samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub kind: SeriesKind,
    pub measured: Vec<[f64; 2]>,
    pub corrected: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Curve – the analysis result of one file
// ---------------------------------------------------------------------------

/// The analysed I–V sweep of one measurement file.
///
/// Every derived scalar is computed once, in [`super::analysis::analyze`],
/// from `samples`; the struct exposes no way to change either afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub(super) source_name: String,
    pub(super) samples: Vec<Sample>,
    pub(super) irradiance: f64,
    pub(super) temperature: f64,
    pub(super) measured_max_power: f64,
    pub(super) corrected_max_power: f64,
    pub(super) v_at_max_power: f64,
    pub(super) i_at_max_power: f64,
    pub(super) open_circuit_voltage: f64,
    pub(super) short_circuit_current: f64,
}

impl Curve {
    /// Name of the originating file; the session key.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Source name without the `.csv` extension, as shown on the curve selector.
    pub fn display_name(&self) -> &str {
        self.source_name
            .strip_suffix(".csv")
            .unwrap_or(&self.source_name)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Irradiance during the sweep (W/m²).
    pub fn irradiance(&self) -> f64 {
        self.irradiance
    }

    /// Module temperature during the sweep (°C).
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pmax as measured (W).
    pub fn measured_max_power(&self) -> f64 {
        self.measured_max_power
    }

    /// Pmax at STC (W). Taken from the sample with the highest corrected
    /// power, which need not be the measured MPP sample.
    pub fn corrected_max_power(&self) -> f64 {
        self.corrected_max_power
    }

    /// Vmp (V), measured domain.
    pub fn v_at_max_power(&self) -> f64 {
        self.v_at_max_power
    }

    /// Imp (A), measured domain.
    pub fn i_at_max_power(&self) -> f64 {
        self.i_at_max_power
    }

    /// Voc (V): the highest measured voltage.
    pub fn open_circuit_voltage(&self) -> f64 {
        self.open_circuit_voltage
    }

    /// Isc (A): the highest measured current.
    pub fn short_circuit_current(&self) -> f64 {
        self.short_circuit_current
    }

    /// Fill factor `Pmax / (Voc · Isc)`; 0 when the denominator is not positive.
    pub fn fill_factor(&self) -> f64 {
        let denominator = self.open_circuit_voltage * self.short_circuit_current;
        if denominator > 0.0 {
            self.measured_max_power / denominator
        } else {
            0.0
        }
    }

    /// Project the samples onto one of the two chart views.
    pub fn series(&self, kind: SeriesKind) -> Series {
        let (measured, corrected) = match kind {
            SeriesKind::Iv => (
                self.samples.iter().map(|s| [s.voltage, s.current]).collect(),
                self.samples
                    .iter()
                    .map(|s| [s.voltage_corrected, s.current_corrected])
                    .collect(),
            ),
            SeriesKind::Pv => (
                self.samples.iter().map(|s| [s.voltage, s.power()]).collect(),
                self.samples
                    .iter()
                    .map(|s| [s.voltage_corrected, s.power_corrected()])
                    .collect(),
            ),
        };
        Series {
            kind,
            measured,
            corrected,
        }
    }

    /// I–V view: `(V, I)` measured and corrected.
    pub fn iv_series(&self) -> Series {
        self.series(SeriesKind::Iv)
    }

    /// P–V view: `(V, P)` measured and corrected.
    pub fn pv_series(&self) -> Series {
        self.series(SeriesKind::Pv)
    }

    /// Flat record of every named parameter, for summary cards and reports.
    pub fn summary(&self) -> CurveSummary {
        CurveSummary {
            source_name: self.source_name.clone(),
            display_name: self.display_name().to_string(),
            sample_count: self.samples.len(),
            irradiance: self.irradiance,
            temperature: self.temperature,
            max_power: self.measured_max_power,
            max_power_stc: self.corrected_max_power,
            voc: self.open_circuit_voltage,
            isc: self.short_circuit_current,
            vmp: self.v_at_max_power,
            imp: self.i_at_max_power,
            fill_factor: self.fill_factor(),
        }
    }
}

// ---------------------------------------------------------------------------
// CurveSummary – stable, named view for report consumers
// ---------------------------------------------------------------------------

/// Serializable parameter set of one curve. Field names are part of the
/// report interface and must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSummary {
    pub source_name: String,
    pub display_name: String,
    pub sample_count: usize,
    /// W/m²
    pub irradiance: f64,
    /// °C
    pub temperature: f64,
    /// W
    pub max_power: f64,
    /// W
    pub max_power_stc: f64,
    /// V
    pub voc: f64,
    /// A
    pub isc: f64,
    /// V
    pub vmp: f64,
    /// A
    pub imp: f64,
    pub fill_factor: f64,
}
