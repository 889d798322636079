use crate::palette_control::{PaletteControlConfig, ResolvedPaletteControl};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteControlSetting {
    Enabled(bool),
    Channel {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(
            default,
            rename = "channelId",
            skip_serializing_if = "Option::is_none"
        )]
        channel_id: Option<String>,
    },
}

impl RemoteControlSetting {
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(on) => *on,
            Self::Channel { .. } => true,
        }
    }

    pub fn channel_id(&self) -> Option<&str> {
        match self {
            Self::Enabled(_) => None,
            Self::Channel { channel_id, .. } => channel_id.as_deref(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Enabled(_) => None,
            Self::Channel { label, .. } => label.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_copy_button: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_control: Option<RemoteControlSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_advanced_palette_control: Option<ResolvedPaletteControl>,
}

impl ControlsConfig {
    pub fn initial() -> Self {
        Self {
            show_copy_button: Some(false),
            ..Self::default()
        }
    }

    pub fn merge_from(&mut self, other: &ControlsConfig) {
        if other.show_copy_button.is_some() {
            self.show_copy_button = other.show_copy_button;
        }
        if other.main_label.is_some() {
            self.main_label = other.main_label.clone();
        }
        if other.show_grid.is_some() {
            self.show_grid = other.show_grid;
        }
        if other.remote_control.is_some() {
            self.remote_control = other.remote_control.clone();
        }
        if other.add_advanced_palette_control.is_some() {
            self.add_advanced_palette_control = other.add_advanced_palette_control.clone();
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote_control
            .as_ref()
            .is_some_and(RemoteControlSetting::is_enabled)
    }

    pub fn remote_channel_id(&self) -> Option<&str> {
        self.remote_control.as_ref().and_then(|r| r.channel_id())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UseControlsConfig {
    pub show_copy_button: Option<bool>,
    pub main_label: Option<String>,
    pub show_grid: Option<bool>,
    pub remote_control: Option<RemoteControlSetting>,
    pub add_advanced_palette_control: Option<PaletteControlConfig>,
}

impl UseControlsConfig {
    pub fn resolve(&self) -> ControlsConfig {
        ControlsConfig {
            show_copy_button: self.show_copy_button,
            main_label: self.main_label.clone(),
            show_grid: self.show_grid,
            remote_control: self.remote_control.clone(),
            add_advanced_palette_control: self
                .add_advanced_palette_control
                .as_ref()
                .map(PaletteControlConfig::resolve),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    pub component_name: Option<String>,
    pub config: Option<UseControlsConfig>,
}

impl RegisterOptions {
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            component_name: Some(name.into()),
            config: None,
        }
    }

    pub fn with_config(mut self, config: UseControlsConfig) -> Self {
        self.config = Some(config);
        self
    }
}
