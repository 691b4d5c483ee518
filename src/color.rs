use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colours for the measured and STC lines of one curve: same hue, the STC
/// line lighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveColors {
    pub measured: Color32,
    pub corrected: Color32,
}

/// Generates `n` visually distinct colour pairs using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<CurveColors> {
    (0..n)
        .map(|i| {
            // Start at a solar amber rather than red.
            let hue = (40.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            CurveColors {
                measured: hsl_color(hue, 0.75, 0.50),
                corrected: hsl_color(hue, 0.65, 0.72),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: curve key → colours
// ---------------------------------------------------------------------------

/// Maps the curves of a session to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, CurveColors>,
    default_colors: CurveColors,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl ColorMap {
    /// Build a colour map from curve keys in session order.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        let mapping = keys
            .iter()
            .zip(generate_palette(keys.len()))
            .map(|(k, c)| (k.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_colors: CurveColors {
                measured: Color32::LIGHT_BLUE,
                corrected: Color32::LIGHT_GREEN,
            },
        }
    }

    /// Look up the colours for a curve key.
    pub fn colors_for(&self, key: &str) -> CurveColors {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            assert_ne!(a.measured, a.corrected);
            for b in &palette[i + 1..] {
                assert_ne!(a.measured, b.measured);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_key_gets_default() {
        let map = ColorMap::new(["a.csv", "b.csv"]);
        assert_ne!(map.colors_for("a.csv"), map.colors_for("b.csv"));
        assert_eq!(map.colors_for("zzz.csv").measured, Color32::LIGHT_BLUE);
    }
}
