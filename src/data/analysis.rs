use super::model::{Curve, Sample};
use super::parser::{parse, ParseOptions};

/// Derive the electrical parameters of one sweep.
///
/// * Measured MPP: the sample with the highest `power()`; on ties the
///   earliest sample wins.
/// * STC MPP: found independently, on `power_corrected()`.
/// * Voc / Isc: highest voltage / current over all samples.
///
/// An empty sweep yields a curve whose derived values are all 0.
pub fn analyze(
    source_name: impl Into<String>,
    samples: Vec<Sample>,
    irradiance: f64,
    temperature: f64,
) -> Curve {
    let (measured_max_power, v_at_max_power, i_at_max_power) =
        match first_max_by(&samples, Sample::power) {
            Some(mpp) => (mpp.power(), mpp.voltage, mpp.current),
            None => (0.0, 0.0, 0.0),
        };
    let corrected_max_power =
        first_max_by(&samples, Sample::power_corrected).map_or(0.0, Sample::power_corrected);

    let open_circuit_voltage = max_of(samples.iter().map(|s| s.voltage));
    let short_circuit_current = max_of(samples.iter().map(|s| s.current));

    Curve {
        source_name: source_name.into(),
        samples,
        irradiance,
        temperature,
        measured_max_power,
        corrected_max_power,
        v_at_max_power,
        i_at_max_power,
        open_circuit_voltage,
        short_circuit_current,
    }
}

impl Curve {
    /// Parse and analyse one file's text. Files without environment
    /// columns get the defaults from `options`.
    pub fn from_text(source_name: impl Into<String>, text: &str, options: &ParseOptions) -> Self {
        let source_name = source_name.into();
        let parsed = parse(text, options);
        if !parsed.diagnostics.is_empty() {
            log::warn!(
                "{source_name}: {} row issue(s), {} sample(s) kept",
                parsed.diagnostics.len(),
                parsed.samples.len()
            );
        }
        analyze(
            source_name,
            parsed.samples,
            parsed.irradiance.unwrap_or(options.default_irradiance),
            parsed.temperature.unwrap_or(options.default_temperature),
        )
    }
}

/// First sample with the largest key; later samples must be strictly larger
/// to replace it.
fn first_max_by(samples: &[Sample], key: impl Fn(&Sample) -> f64) -> Option<&Sample> {
    samples.iter().fold(None, |best, sample| match best {
        Some(best) if key(sample) > key(best) => Some(sample),
        Some(best) => Some(best),
        None => Some(sample),
    })
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::max).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{STC_IRRADIANCE, STC_TEMPERATURE};

    const SCENARIO: &str = "V,I,Vstc,Istc,G,T\n10,2,10,2,1000,25\n8,3,8.5,3.1\n5,4,5,4\n";

    #[test]
    fn three_row_scenario() {
        let curve = Curve::from_text("scenario.csv", SCENARIO, &ParseOptions::default());

        assert_eq!(curve.len(), 3);
        assert_eq!(curve.measured_max_power(), 24.0);
        assert_eq!(curve.v_at_max_power(), 8.0);
        assert_eq!(curve.i_at_max_power(), 3.0);
        assert_eq!(curve.open_circuit_voltage(), 10.0);
        assert_eq!(curve.short_circuit_current(), 4.0);
        assert_eq!(curve.irradiance(), 1000.0);
        assert_eq!(curve.temperature(), 25.0);
        assert_eq!(curve.corrected_max_power(), 8.5 * 3.1);
    }

    #[test]
    fn empty_sweep_reports_zeroes() {
        let curve = analyze("empty.csv", Vec::new(), STC_IRRADIANCE, STC_TEMPERATURE);

        assert!(curve.is_empty());
        assert_eq!(curve.measured_max_power(), 0.0);
        assert_eq!(curve.corrected_max_power(), 0.0);
        assert_eq!(curve.v_at_max_power(), 0.0);
        assert_eq!(curve.i_at_max_power(), 0.0);
        assert_eq!(curve.open_circuit_voltage(), 0.0);
        assert_eq!(curve.short_circuit_current(), 0.0);
    }

    #[test]
    fn file_without_valid_rows_still_builds() {
        let curve = Curve::from_text("junk.csv", "header\n1,2\nfoo\n", &ParseOptions::default());
        assert!(curve.is_empty());
        assert_eq!(curve.irradiance(), STC_IRRADIANCE);
        assert_eq!(curve.temperature(), STC_TEMPERATURE);
        assert_eq!(curve.measured_max_power(), 0.0);
    }

    #[test]
    fn defaults_come_from_options() {
        let options = ParseOptions {
            default_irradiance: 850.0,
            default_temperature: 45.0,
            ..ParseOptions::default()
        };
        let curve = Curve::from_text("a.csv", "h\n1,1,1,1\n", &options);
        assert_eq!(curve.irradiance(), 850.0);
        assert_eq!(curve.temperature(), 45.0);
    }

    #[test]
    fn power_ties_keep_first_sample() {
        let curve = analyze(
            "tie.csv",
            vec![
                Sample::measured(6.0, 2.0),
                Sample::measured(4.0, 3.0),
                Sample::measured(3.0, 4.0),
            ],
            STC_IRRADIANCE,
            STC_TEMPERATURE,
        );
        assert_eq!(curve.measured_max_power(), 12.0);
        assert_eq!(curve.v_at_max_power(), 6.0);
        assert_eq!(curve.i_at_max_power(), 2.0);
    }

    #[test]
    fn corrected_mpp_is_found_independently() {
        let curve = analyze(
            "split.csv",
            vec![
                Sample::new(10.0, 3.0, 10.0, 2.0),
                Sample::new(8.0, 3.5, 9.0, 3.0),
            ],
            STC_IRRADIANCE,
            STC_TEMPERATURE,
        );
        assert_eq!(curve.measured_max_power(), 30.0);
        assert_eq!(curve.v_at_max_power(), 10.0);
        // The corrected maximum sits on the second sample.
        assert_eq!(curve.corrected_max_power(), 27.0);
    }

    #[test]
    fn voc_and_isc_are_independent_of_mpp() {
        let curve = analyze(
            "sweep.csv",
            vec![
                Sample::measured(0.0, 9.5),
                Sample::measured(31.0, 8.7),
                Sample::measured(38.0, 4.0),
                Sample::measured(45.2, 0.0),
            ],
            STC_IRRADIANCE,
            STC_TEMPERATURE,
        );
        assert_eq!(curve.open_circuit_voltage(), 45.2);
        assert_eq!(curve.short_circuit_current(), 9.5);
        assert_eq!(curve.v_at_max_power(), 31.0);
    }

    #[test]
    fn negative_sweep_keeps_true_maxima() {
        let curve = analyze(
            "reverse.csv",
            vec![Sample::measured(-2.0, -1.0), Sample::measured(-1.0, -3.0)],
            STC_IRRADIANCE,
            STC_TEMPERATURE,
        );
        assert_eq!(curve.open_circuit_voltage(), -1.0);
        assert_eq!(curve.short_circuit_current(), -1.0);
        assert_eq!(curve.measured_max_power(), 3.0);
    }

    #[test]
    fn analysis_is_idempotent() {
        let a = Curve::from_text("s.csv", SCENARIO, &ParseOptions::default());
        let b = Curve::from_text("s.csv", SCENARIO, &ParseOptions::default());
        assert_eq!(a, b);
    }
}
