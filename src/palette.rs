use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;

pub const DEFAULT_GRADIENT_STEPS: usize = 12;
pub const DEFAULT_SECTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];
pub const GRADIENT_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaletteChannel {
    R,
    G,
    B,
}

pub const CHANNEL_KEYS: [PaletteChannel; 3] = [PaletteChannel::R, PaletteChannel::G, PaletteChannel::B];

impl PaletteChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::R => "r",
            Self::G => "g",
            Self::B => "b",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Self::R => "Red",
            Self::G => "Green",
            Self::B => "Blue",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteValue {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
}

impl PaletteValue {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn get(&self, channel: PaletteChannel) -> f64 {
        match channel {
            PaletteChannel::R => self.r,
            PaletteChannel::G => self.g,
            PaletteChannel::B => self.b,
        }
    }

    pub fn set(&mut self, channel: PaletteChannel, value: f64) {
        match channel {
            PaletteChannel::R => self.r = value,
            PaletteChannel::G => self.g = value,
            PaletteChannel::B => self.b = value,
        }
    }

    pub fn clamp01(self) -> Self {
        Self::new(clamp01(self.r), clamp01(self.g), clamp01(self.b))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedPalette {
    sections: Vec<(String, PaletteValue)>,
}

impl AdvancedPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections<I, K>(sections: I) -> Self
    where
        I: IntoIterator<Item = (K, PaletteValue)>,
        K: Into<String>,
    {
        let mut palette = Self::new();
        for (key, value) in sections {
            palette.insert(key, value);
        }
        palette
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PaletteValue) {
        let key = key.into();
        match self.sections.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.sections.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PaletteValue> {
        self.sections.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PaletteValue> {
        self.sections.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn channel(&self, key: &str, channel: PaletteChannel) -> f64 {
        self.get(key).map(|v| v.get(channel)).unwrap_or(0.0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PaletteValue)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn signature(&self) -> String {
        create_palette_signature(self)
    }
}

impl Serialize for AdvancedPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (key, value) in &self.sections {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AdvancedPalette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PaletteVisitor;

        impl<'de> Visitor<'de> for PaletteVisitor {
            type Value = AdvancedPalette;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of section keys to {r,g,b}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut palette = AdvancedPalette::new();
                while let Some((key, value)) = access.next_entry::<String, PaletteValue>()? {
                    palette.insert(key, value);
                }
                Ok(palette)
            }
        }

        deserializer.deserialize_map(PaletteVisitor)
    }
}

pub fn default_advanced_palette() -> AdvancedPalette {
    AdvancedPalette::from_sections([
        ("A", PaletteValue::new(0.5, 0.5, 0.5)),
        ("B", PaletteValue::new(0.5, 0.5, 0.5)),
        ("C", PaletteValue::new(1.0, 1.0, 1.0)),
        ("D", PaletteValue::new(0.0, 0.33, 0.67)),
    ])
}

pub fn palette_color_at(palette: &AdvancedPalette, t: f64) -> PaletteValue {
    let channel = |c: PaletteChannel| {
        let a = palette.channel("A", c);
        let b = palette.channel("B", c);
        let freq = palette.channel("C", c);
        let phase = palette.channel("D", c);
        clamp01(a + b * (2.0 * PI * (freq * t + phase)).cos())
    };
    PaletteValue::new(
        channel(PaletteChannel::R),
        channel(PaletteChannel::G),
        channel(PaletteChannel::B),
    )
}

pub fn to_rgba(color: PaletteValue, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {alpha})",
        to_byte(color.r),
        to_byte(color.g),
        to_byte(color.b)
    )
}

/// CSS `linear-gradient` sampling the palette at `steps` evenly spaced stops.
/// Fewer than two steps are widened to two so both ends are always present.
pub fn compute_palette_gradient(palette: &AdvancedPalette, steps: usize) -> String {
    let steps = steps.max(2);
    let stops = (0..steps)
        .map(|index| {
            let t = index as f64 / (steps - 1) as f64;
            let color = palette_color_at(palette, t);
            format!("{} {:.1}%", to_rgba(color, GRADIENT_ALPHA), t * 100.0)
        })
        .collect::<Vec<_>>();
    format!("linear-gradient(to right, {})", stops.join(", "))
}

pub fn create_palette_signature(palette: &AdvancedPalette) -> String {
    let mut sections: Vec<(&str, &PaletteValue)> = palette.iter().collect();
    sections.sort_by(|a, b| a.0.cmp(b.0));
    sections
        .into_iter()
        .flat_map(|(_, value)| CHANNEL_KEYS.map(|channel| fixed3(value.get(channel))))
        .collect::<Vec<_>>()
        .join("-")
}

fn fixed3(v: f64) -> String {
    let s = format!("{v:.3}");
    if s == "-0.000" { "0.000".to_string() } else { s }
}

pub fn hex_to_palette_value(hex: &str) -> PaletteValue {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return PaletteValue::BLACK;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_string(),
        _ => return PaletteValue::BLACK,
    };
    let byte = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| v as f64 / 255.0)
            .unwrap_or(0.0)
    };
    PaletteValue::new(byte(0), byte(2), byte(4))
}

pub fn palette_value_to_hex(value: PaletteValue) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        to_byte(value.r),
        to_byte(value.g),
        to_byte(value.b)
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEntry {
    Hex(String),
    Channels {
        r: Option<f64>,
        g: Option<f64>,
        b: Option<f64>,
    },
}

impl PaletteEntry {
    fn to_value(&self) -> PaletteValue {
        match self {
            Self::Hex(hex) => hex_to_palette_value(hex),
            Self::Channels { r, g, b } => PaletteValue::new(
                r.unwrap_or(0.0),
                g.unwrap_or(0.0),
                b.unwrap_or(0.0),
            ),
        }
    }
}

impl From<&str> for PaletteEntry {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_string())
    }
}

impl From<PaletteValue> for PaletteEntry {
    fn from(v: PaletteValue) -> Self {
        Self::Channels {
            r: Some(v.r),
            g: Some(v.g),
            b: Some(v.b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteSource {
    HexList(Vec<String>),
    Sections(Vec<(String, PaletteEntry)>),
    Palette(AdvancedPalette),
}

impl PaletteSource {
    pub fn hex_list<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::HexList(colors.into_iter().map(Into::into).collect())
    }
}

impl From<AdvancedPalette> for PaletteSource {
    fn from(p: AdvancedPalette) -> Self {
        Self::Palette(p)
    }
}

pub fn section_key_for_index(index: usize) -> String {
    DEFAULT_SECTION_KEYS
        .get(index)
        .map(|k| k.to_string())
        .unwrap_or_else(|| format!("Color{}", index + 1))
}

pub fn create_advanced_palette(source: Option<&PaletteSource>) -> AdvancedPalette {
    let Some(source) = source else {
        return default_advanced_palette();
    };

    let palette = match source {
        PaletteSource::HexList(colors) => AdvancedPalette::from_sections(
            colors
                .iter()
                .enumerate()
                .map(|(i, hex)| (section_key_for_index(i), hex_to_palette_value(hex))),
        ),
        PaletteSource::Sections(entries) => AdvancedPalette::from_sections(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.to_value())),
        ),
        PaletteSource::Palette(palette) => palette.clone(),
    };

    if palette.is_empty() {
        return default_advanced_palette();
    }
    AdvancedPalette::from_sections(
        palette
            .iter()
            .map(|(key, value)| (key.to_string(), value.clamp01())),
    )
}

#[derive(Debug, Clone, Default)]
pub struct HexColorOptions {
    pub section_order: Option<Vec<String>>,
    pub fallback_palette: Option<AdvancedPalette>,
    pub default_color: Option<String>,
}

pub const DEFAULT_HEX_COLOR: &str = "#000000";

pub fn advanced_palette_to_hex_colors(
    palette: &AdvancedPalette,
    options: &HexColorOptions,
) -> Vec<String> {
    let order: Vec<String> = match &options.section_order {
        Some(order) => order.clone(),
        None => palette.keys().map(str::to_string).collect(),
    };
    let default_color = options
        .default_color
        .clone()
        .unwrap_or_else(|| DEFAULT_HEX_COLOR.to_string());

    order
        .iter()
        .map(|key| {
            palette
                .get(key)
                .or_else(|| options.fallback_palette.as_ref().and_then(|f| f.get(key)))
                .map(|v| palette_value_to_hex(*v))
                .unwrap_or_else(|| default_color.clone())
        })
        .collect()
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn to_byte(v: f64) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}
