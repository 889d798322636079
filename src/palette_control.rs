use crate::palette::{
    AdvancedPalette, CHANNEL_KEYS, DEFAULT_GRADIENT_STEPS, PaletteChannel, PaletteValue,
    compute_palette_gradient,
};
use crate::schema::{ControlDescriptor, FolderPlacement, Schema};
use crate::value::ControlValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub const DEFAULT_HIDDEN_KEY_PREFIX: &str = "palette";
pub const DEFAULT_CONTROL_KEY: &str = "advancedPaletteControl";
const FALLBACK_HELPER: &str = "Palette parameter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSection {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper: Option<String>,
}

impl PaletteSection {
    pub fn new(key: impl Into<String>, label: impl Into<String>, helper: Option<&str>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            helper: helper.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl PaletteRange {
    pub const UNIT: Self = Self {
        min: 0.0,
        max: 1.0,
        step: 0.01,
    };

    pub fn clamp(&self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }
}

pub fn default_sections() -> Vec<PaletteSection> {
    vec![
        PaletteSection::new("A", "Vector A", Some("Base offset")),
        PaletteSection::new("B", "Vector B", Some("Amplitude")),
        PaletteSection::new("C", "Vector C", Some("Frequency")),
        PaletteSection::new("D", "Vector D", Some("Phase shift")),
    ]
}

pub fn default_range(section: &str) -> Option<PaletteRange> {
    let (min, max) = match section {
        "A" => (0.0, 1.0),
        "B" => (-1.0, 1.0),
        "C" => (0.0, 2.0),
        "D" => (0.0, 1.0),
        _ => return None,
    };
    Some(PaletteRange {
        min,
        max,
        step: 0.01,
    })
}

pub fn palette_control_key(prefix: &str, section: &str, channel: PaletteChannel) -> String {
    format!("{prefix}{section}{}", channel.as_str())
}

#[derive(Clone)]
pub struct PaletteCallback(Rc<dyn Fn(&AdvancedPalette)>);

impl PaletteCallback {
    pub fn new(f: impl Fn(&AdvancedPalette) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, palette: &AdvancedPalette) {
        (self.0)(palette)
    }
}

impl fmt::Debug for PaletteCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaletteCallback(..)")
    }
}

impl PartialEq for PaletteCallback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone)]
pub struct InteractionCallback(Rc<dyn Fn()>);

impl InteractionCallback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for InteractionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InteractionCallback(..)")
    }
}

impl PartialEq for InteractionCallback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLabels {
    pub r: String,
    pub g: String,
    pub b: String,
}

impl Default for ChannelLabels {
    fn default() -> Self {
        Self {
            r: PaletteChannel::R.default_label().to_string(),
            g: PaletteChannel::G.default_label().to_string(),
            b: PaletteChannel::B.default_label().to_string(),
        }
    }
}

impl ChannelLabels {
    pub fn get(&self, channel: PaletteChannel) -> &str {
        match channel {
            PaletteChannel::R => &self.r,
            PaletteChannel::G => &self.g,
            PaletteChannel::B => &self.b,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaletteControlConfig {
    pub default_palette: AdvancedPalette,
    pub sections: Option<Vec<PaletteSection>>,
    pub ranges: BTreeMap<String, PaletteRange>,
    pub channel_labels: BTreeMap<PaletteChannel, String>,
    pub hidden_key_prefix: Option<String>,
    pub control_key: Option<String>,
    pub gradient_steps: Option<usize>,
    pub on_palette_change: Option<PaletteCallback>,
    pub on_interaction: Option<InteractionCallback>,
    pub folder: Option<String>,
    pub folder_placement: Option<FolderPlacement>,
}

impl PaletteControlConfig {
    pub fn new(default_palette: AdvancedPalette) -> Self {
        Self {
            default_palette,
            ..Self::default()
        }
    }

    pub fn on_change(mut self, f: impl Fn(&AdvancedPalette) + 'static) -> Self {
        self.on_palette_change = Some(PaletteCallback::new(f));
        self
    }

    pub fn resolve(&self) -> ResolvedPaletteControl {
        let sections = self
            .sections
            .clone()
            .unwrap_or_else(|| sections_from_palette(&self.default_palette));

        let ranges = sections
            .iter()
            .map(|section| {
                let range = self
                    .ranges
                    .get(&section.key)
                    .copied()
                    .or_else(|| default_range(&section.key))
                    .unwrap_or(PaletteRange::UNIT);
                (section.key.clone(), range)
            })
            .collect();

        let mut channel_labels = ChannelLabels::default();
        for (channel, label) in &self.channel_labels {
            match channel {
                PaletteChannel::R => channel_labels.r = label.clone(),
                PaletteChannel::G => channel_labels.g = label.clone(),
                PaletteChannel::B => channel_labels.b = label.clone(),
            }
        }

        ResolvedPaletteControl {
            default_palette: self.default_palette.clone(),
            sections,
            ranges,
            channel_labels,
            hidden_key_prefix: self
                .hidden_key_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_HIDDEN_KEY_PREFIX.to_string()),
            control_key: self
                .control_key
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTROL_KEY.to_string()),
            gradient_steps: self.gradient_steps.unwrap_or(DEFAULT_GRADIENT_STEPS),
            folder: self.folder.clone(),
            folder_placement: self.folder_placement,
            on_palette_change: self.on_palette_change.clone(),
            on_interaction: self.on_interaction.clone(),
        }
    }
}

fn sections_from_palette(palette: &AdvancedPalette) -> Vec<PaletteSection> {
    if palette.is_empty() {
        return default_sections();
    }
    let defaults = default_sections();
    palette
        .keys()
        .enumerate()
        .map(|(index, key)| PaletteSection {
            key: key.to_string(),
            label: format!("Vector {key}"),
            helper: Some(
                defaults
                    .get(index)
                    .and_then(|s| s.helper.clone())
                    .unwrap_or_else(|| FALLBACK_HELPER.to_string()),
            ),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPaletteControl {
    pub default_palette: AdvancedPalette,
    pub sections: Vec<PaletteSection>,
    pub ranges: BTreeMap<String, PaletteRange>,
    pub channel_labels: ChannelLabels,
    pub hidden_key_prefix: String,
    pub control_key: String,
    pub gradient_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_placement: Option<FolderPlacement>,
    #[serde(skip)]
    pub on_palette_change: Option<PaletteCallback>,
    #[serde(skip)]
    pub on_interaction: Option<InteractionCallback>,
}

impl ResolvedPaletteControl {
    pub fn key_for(&self, section: &str, channel: PaletteChannel) -> String {
        palette_control_key(&self.hidden_key_prefix, section, channel)
    }

    pub fn range_for(&self, section: &str) -> PaletteRange {
        self.ranges
            .get(section)
            .copied()
            .or_else(|| default_range(section))
            .unwrap_or(PaletteRange::UNIT)
    }

    pub fn default_channel(&self, section: &str, channel: PaletteChannel) -> f64 {
        self.default_palette
            .get(section)
            .map(|v| v.get(channel))
            .or_else(|| default_range(section).map(|r| r.min))
            .unwrap_or(0.0)
    }

    pub fn schema_entries(&self, mut schema: Schema) -> Schema {
        for section in &self.sections {
            for channel in CHANNEL_KEYS {
                let key = self.key_for(&section.key, channel);
                schema.entry(key).or_insert_with(|| {
                    ControlDescriptor::number(self.default_channel(&section.key, channel)).hidden()
                });
            }
        }
        schema
    }

    pub fn palette_from_values(
        &self,
        values: &BTreeMap<String, ControlValue>,
    ) -> AdvancedPalette {
        AdvancedPalette::from_sections(self.sections.iter().map(|section| {
            let mut value = PaletteValue::default();
            for channel in CHANNEL_KEYS {
                let key = self.key_for(&section.key, channel);
                let fallback = self.default_channel(&section.key, channel);
                value.set(channel, ControlValue::to_number_or(values.get(&key), fallback));
            }
            (section.key.clone(), value)
        }))
    }

    pub fn channel_update(&self, section: &str, channel: PaletteChannel, value: f64) -> (String, f64) {
        if let Some(cb) = &self.on_interaction {
            cb.call();
        }
        let clamped = self.range_for(section).clamp(value);
        (self.key_for(section, channel), clamped)
    }

    pub fn reset_updates(&self) -> Vec<(String, f64)> {
        if let Some(cb) = &self.on_interaction {
            cb.call();
        }
        self.sections
            .iter()
            .flat_map(|section| {
                CHANNEL_KEYS.map(|channel| {
                    (
                        self.key_for(&section.key, channel),
                        self.default_channel(&section.key, channel),
                    )
                })
            })
            .collect()
    }

    pub fn gradient(&self, palette: &AdvancedPalette) -> String {
        compute_palette_gradient(palette, self.gradient_steps)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaletteWatcher {
    last_signature: Option<String>,
}

impl PaletteWatcher {
    pub fn observe(&mut self, palette: &AdvancedPalette) -> bool {
        let signature = palette.signature();
        if self.last_signature.as_deref() == Some(signature.as_str()) {
            return false;
        }
        self.last_signature = Some(signature);
        true
    }
}
