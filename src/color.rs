use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Rgba – renderer-independent colour carried by chart specs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const GRAY: Rgba = Rgba::rgb(160, 160, 160);

    fn from_srgb(c: Srgb) -> Self {
        let c: Srgb<u8> = c.into_format();
        Rgba::rgb(c.red, c.green, c.blue)
    }

    fn to_linear(self) -> LinSrgb {
        Srgb::new(self.r, self.g, self.b).into_format::<f32>().into_linear()
    }
}

impl From<Rgba> for Color32 {
    fn from(c: Rgba) -> Self {
        Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Colour-blind safe qualitative palette, used first for categories.
pub const SAFE: [Rgba; 11] = [
    Rgba::rgb(136, 204, 238),
    Rgba::rgb(204, 102, 119),
    Rgba::rgb(221, 204, 119),
    Rgba::rgb(17, 119, 51),
    Rgba::rgb(51, 34, 136),
    Rgba::rgb(170, 68, 153),
    Rgba::rgb(68, 170, 153),
    Rgba::rgb(153, 153, 51),
    Rgba::rgb(136, 34, 85),
    Rgba::rgb(102, 17, 0),
    Rgba::rgb(136, 136, 136),
];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgba> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgba::from_srgb(rgb)
        })
        .collect()
}

/// `n` category colours: the safe palette, then generated hues beyond it.
pub fn categorical(n: usize) -> Vec<Rgba> {
    let mut colors: Vec<Rgba> = SAFE.iter().copied().take(n).collect();
    if n > SAFE.len() {
        colors.extend(generate_palette(n - SAFE.len()));
    }
    colors
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Rgba
// ---------------------------------------------------------------------------

/// Maps category labels (e.g. Decision_Action) to distinct colours, in the
/// order the labels were given.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    mapping: Vec<(String, Rgba)>,
    default_color: Rgba,
}

impl ColorMap {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let mapping = labels
            .iter()
            .zip(categorical(labels.len()))
            .map(|(l, c)| (l.as_ref().to_string(), c))
            .collect();
        ColorMap {
            mapping,
            default_color: Rgba::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Rgba {
        self.mapping
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> &[(String, Rgba)] {
        &self.mapping
    }
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Sequential colour scale interpolated in linear RGB between evenly spaced stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub name: &'static str,
    stops: &'static [Rgba],
}

impl ColorScale {
    /// Green → blue, for ROI efficiency bars.
    pub const GN_BU: ColorScale = ColorScale {
        name: "GnBu",
        stops: &[
            Rgba::rgb(0xf7, 0xfc, 0xf0),
            Rgba::rgb(0xe0, 0xf3, 0xdb),
            Rgba::rgb(0xcc, 0xeb, 0xc5),
            Rgba::rgb(0xa8, 0xdd, 0xb5),
            Rgba::rgb(0x7b, 0xcc, 0xc4),
            Rgba::rgb(0x4e, 0xb3, 0xd3),
            Rgba::rgb(0x2b, 0x8c, 0xbe),
            Rgba::rgb(0x08, 0x68, 0xac),
            Rgba::rgb(0x08, 0x40, 0x81),
        ],
    };

    /// White → blue, for the Avg_Monetary table gradient.
    pub const BLUES: ColorScale = ColorScale {
        name: "Blues",
        stops: &[
            Rgba::rgb(0xf7, 0xfb, 0xff),
            Rgba::rgb(0xde, 0xeb, 0xf7),
            Rgba::rgb(0xc6, 0xdb, 0xef),
            Rgba::rgb(0x9e, 0xca, 0xe1),
            Rgba::rgb(0x6b, 0xae, 0xd6),
            Rgba::rgb(0x42, 0x92, 0xc6),
            Rgba::rgb(0x21, 0x71, 0xb5),
            Rgba::rgb(0x08, 0x51, 0x9c),
            Rgba::rgb(0x08, 0x30, 0x6b),
        ],
    };

    /// Colour at `t` in `[0, 1]` (clamped; NaN maps to the low end).
    pub fn at(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let lo = (pos.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let frac = (pos - lo as f64) as f32;
        let mixed = self.stops[lo].to_linear().mix(self.stops[hi].to_linear(), frac);
        Rgba::from_srgb(Srgb::from_linear(mixed))
    }

    /// Colour for `value` relative to `[min, max]`. A degenerate range maps
    /// to the top of the scale.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgba {
        let range = max - min;
        if range.abs() < f64::EPSILON {
            return self.at(1.0);
        }
        self.at((value - min) / range)
    }
}
