//! Writes synthetic curve tracer exports (`sample_string_*.csv`) for trying
//! the viewer without hardware.

use std::path::Path;

use anyhow::{Context, Result};
use rusty_iv::data::model::{STC_IRRADIANCE, STC_TEMPERATURE};

/// Thermal voltage at 25 °C (V).
const THERMAL_VOLTAGE: f64 = 0.025_693;
/// Diode ideality factor.
const IDEALITY: f64 = 1.3;
/// Temperature coefficient of Isc (1/°C).
const ALPHA_ISC: f64 = 0.0005;
/// Temperature coefficient of Voc (1/°C).
const BETA_VOC: f64 = -0.0029;

/// Nameplate of the simulated module at STC.
struct Module {
    voc: f64,
    isc: f64,
    cells: u32,
}

/// Single-diode current at `v` for a module with the given Voc/Isc.
fn diode_current(v: f64, voc: f64, isc: f64, cells: u32) -> f64 {
    let nvt = IDEALITY * THERMAL_VOLTAGE * cells as f64;
    let i = isc - isc * ((v / nvt).exp() - 1.0) / ((voc / nvt).exp() - 1.0);
    i.max(0.0)
}

/// Seeded measurement noise (splitmix64 stream).
struct Noise(u64);

impl Noise {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        (z ^ (z >> 31)) as f64 / u64::MAX as f64
    }

    /// Approximately normal: sum of twelve uniforms, centred.
    fn normal(&mut self, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        (sum - 6.0) * std_dev
    }
}

/// One sweep at the given conditions, with measured and STC-translated
/// columns (simple irradiance/temperature translation of the current and
/// voltage axes).
fn write_sweep(
    path: &Path,
    module: &Module,
    irradiance: f64,
    temperature: f64,
    points: usize,
    noise: &mut Noise,
) -> Result<()> {
    let dt = temperature - STC_TEMPERATURE;
    let g = irradiance / STC_IRRADIANCE;
    let isc = module.isc * g * (1.0 + ALPHA_ISC * dt);
    let voc = module.voc * (1.0 + BETA_VOC * dt) + 0.03 * module.voc * g.ln();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "voltage",
        "current",
        "voltage_stc",
        "current_stc",
        "irradiance",
        "temperature",
    ])?;

    for k in 0..points {
        let v = voc * k as f64 / (points - 1) as f64;
        let i = (diode_current(v, voc, isc, module.cells) + noise.normal(0.01)).max(0.0);

        let i_stc = i / g * (1.0 - ALPHA_ISC * dt);
        let v_stc = v * module.voc / voc;

        // Environment columns only on the first row, as tracers export them.
        let (g_cell, t_cell) = if k == 0 {
            (format!("{irradiance:.0}"), format!("{temperature:.1}"))
        } else {
            (String::new(), String::new())
        };
        writer.write_record([
            format!("{v:.3}"),
            format!("{i:.4}"),
            format!("{v_stc:.3}"),
            format!("{i_stc:.4}"),
            g_cell,
            t_cell,
        ])?;
    }
    writer.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut noise = Noise(42);
    let module = Module {
        voc: 49.6,
        isc: 13.9,
        cells: 72,
    };

    let conditions = [(980.0, 48.5), (845.0, 51.0), (610.0, 39.0)];
    for (n, &(irradiance, temperature)) in conditions.iter().enumerate() {
        let path = format!("sample_string_{:02}.csv", n + 1);
        write_sweep(Path::new(&path), &module, irradiance, temperature, 120, &mut noise)?;
        println!("Wrote {path} (G = {irradiance} W/m², T = {temperature} °C)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_seeded_and_bounded() {
        let a: Vec<f64> = {
            let mut n = Noise(7);
            (0..100).map(|_| n.normal(0.01)).collect()
        };
        let mut n = Noise(7);
        assert!(a.iter().all(|&x| x == n.normal(0.01)));
        assert!(a.iter().all(|x| x.abs() <= 0.06));
        let mut u = Noise(1);
        assert!((0..1000).map(|_| u.uniform()).all(|x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn diode_current_spans_isc_to_zero() {
        assert!((diode_current(0.0, 49.6, 13.9, 72) - 13.9).abs() < 1e-9);
        assert!(diode_current(49.6, 49.6, 13.9, 72).abs() < 1e-9);
    }
}
