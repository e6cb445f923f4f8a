use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lighten, Srgb};

// ---------------------------------------------------------------------------
// Professional palette
// ---------------------------------------------------------------------------

/// Blues, greys, black/white, oranges, reds and greens, in that order.
const PROFESSIONAL_COLORS: [&str; 24] = [
    "#202A44", "#1B365D", "#7089AC", "#CED9E5", "#53565A", "#888B8D", "#A7A8A9", "#C8C9C7",
    "#E1DFDD", "#000000", "#141414", "#FFFFFF", "#A85F02", "#BF834B", "#D9B48B", "#F0DFC6",
    "#622128", "#9E2A2B", "#DDA69D", "#F0DDD7", "#22372B", "#476D3B", "#A3B2A4", "#E0E7D9",
];

/// Parse the palette's hex codes.
pub fn professional_palette() -> Vec<Color32> {
    PROFESSIONAL_COLORS
        .iter()
        .filter_map(|hex| match Srgb::<u8>::from_str(hex) {
            Ok(rgb) => Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue)),
            Err(e) => {
                log::warn!("skipping palette entry {hex}: {e}");
                None
            }
        })
        .collect()
}

/// Lighten `color` by `amount` (0..1) in HSL space.
pub fn shade(color: Color32, amount: f32) -> Color32 {
    let rgb: Srgb = Srgb::new(color.r(), color.g(), color.b()).into_format();
    let hsl: Hsl = rgb.into_color();
    let rgb: Srgb = hsl.lighten(amount).into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Assigns palette colours to labels in the order they are first seen,
/// cycling once the palette runs out.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        let palette = professional_palette();
        let mut mapping = BTreeMap::new();
        for label in labels {
            let next = mapping.len();
            mapping.entry(label).or_insert_with(|| {
                palette
                    .get(next % palette.len().max(1))
                    .copied()
                    .unwrap_or(Color32::GRAY)
            });
        }

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}
