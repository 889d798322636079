use crate::palette::{
    AdvancedPalette, DEFAULT_GRADIENT_STEPS, HexColorOptions, PaletteSource,
    advanced_palette_to_hex_colors, compute_palette_gradient, create_advanced_palette,
};
use crate::palette_control::{PaletteCallback, PaletteControlConfig};

#[derive(Debug, Clone, Default)]
pub struct PaletteControllerOptions {
    pub default_palette: Option<PaletteSource>,
    pub fallback_palette: Option<PaletteSource>,
    pub section_order: Option<Vec<String>>,
    pub default_color: Option<String>,
    pub gradient_steps: Option<usize>,
    pub control: Option<PaletteControlConfig>,
    pub on_change: Option<PaletteCallback>,
}

#[derive(Debug, Clone)]
pub struct PaletteController {
    default_palette: AdvancedPalette,
    fallback_palette: AdvancedPalette,
    palette: AdvancedPalette,
    section_order: Option<Vec<String>>,
    default_color: Option<String>,
    gradient_steps: usize,
    control: Option<PaletteControlConfig>,
    on_change: Option<PaletteCallback>,
}

impl PaletteController {
    pub fn new(options: PaletteControllerOptions) -> Self {
        let default_palette = create_advanced_palette(options.default_palette.as_ref());
        let fallback_palette = match &options.fallback_palette {
            Some(source) => create_advanced_palette(Some(source)),
            None => default_palette.clone(),
        };
        Self {
            palette: default_palette.clone(),
            default_palette,
            fallback_palette,
            section_order: options.section_order,
            default_color: options.default_color,
            gradient_steps: options.gradient_steps.unwrap_or(DEFAULT_GRADIENT_STEPS),
            control: options.control,
            on_change: options.on_change,
        }
    }

    pub fn palette(&self) -> &AdvancedPalette {
        &self.palette
    }

    pub fn default_palette(&self) -> &AdvancedPalette {
        &self.default_palette
    }

    pub fn signature(&self) -> String {
        self.palette.signature()
    }

    pub fn gradient(&self) -> String {
        compute_palette_gradient(&self.palette, self.gradient_steps)
    }

    pub fn hex_colors(&self) -> Vec<String> {
        advanced_palette_to_hex_colors(
            &self.palette,
            &HexColorOptions {
                section_order: self.section_order.clone(),
                fallback_palette: Some(self.fallback_palette.clone()),
                default_color: self.default_color.clone(),
            },
        )
    }

    pub fn set_palette(&mut self, source: Option<&PaletteSource>) {
        let next = match source {
            Some(source) => create_advanced_palette(Some(source)),
            None => self.default_palette.clone(),
        };
        self.replace(next);
    }

    pub fn update_palette(
        &mut self,
        updater: impl FnOnce(AdvancedPalette) -> Option<PaletteSource>,
    ) {
        let next = match updater(self.palette.clone()) {
            Some(source) => create_advanced_palette(Some(&source)),
            None => self.palette.clone(),
        };
        self.replace(next);
    }

    pub fn reset_palette(&mut self) {
        self.replace(self.default_palette.clone());
    }

    pub fn handle_control_change(&mut self, palette: &AdvancedPalette) {
        self.replace(palette.clone());
    }

    /// Swaps the default. The live palette is re-seeded only when the new
    /// default differs by signature; no change is reported.
    pub fn set_default_palette(&mut self, source: Option<&PaletteSource>) {
        let next = create_advanced_palette(source);
        if next.signature() == self.default_palette.signature() {
            return;
        }
        self.palette = next.clone();
        self.default_palette = next;
    }

    pub fn control_config(&self) -> PaletteControlConfig {
        let mut config = self.control.clone().unwrap_or_default();
        config.default_palette = self.default_palette.clone();
        config
    }

    fn replace(&mut self, next: AdvancedPalette) {
        self.palette = next;
        if let Some(cb) = &self.on_change {
            cb.call(&self.palette);
        }
    }
}
