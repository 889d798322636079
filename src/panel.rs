use crate::config::ControlsConfig;
use crate::registry::{ControlsRegistry, Values};
use crate::schema::{FolderPlacement, RemoteControlKind};
use crate::url_params::preview_url;
use crate::value::ControlValue;

pub const DEFAULT_MAIN_LABEL: &str = "Controls";

pub fn labelize(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(if ch == '-' || ch == '_' { ' ' } else { ch });
    }
    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn jsx_snippet(component_name: Option<&str>, values: &Values) -> String {
    let Some(name) = component_name else {
        return String::new();
    };
    let props = values
        .iter()
        .map(|(key, value)| match value {
            ControlValue::Text(s) => format!("{key}=\"{s}\""),
            ControlValue::Bool(b) => format!("{key}={{{b}}}"),
            ControlValue::Number(n) => format!("{key}={{{n}}}"),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("<{name} {props} />")
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelControl {
    pub key: String,
    pub label: String,
    pub type_name: &'static str,
    pub value: Option<ControlValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelFolder {
    pub name: String,
    pub controls: Vec<PanelControl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalettePanel {
    pub control_key: String,
    pub gradient: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub title: String,
    pub top_folders: Vec<PanelFolder>,
    pub controls: Vec<PanelControl>,
    pub bottom_folders: Vec<PanelFolder>,
    pub buttons: Vec<PanelControl>,
    pub copy_snippet: Option<String>,
    pub preview_url: String,
    pub palette: Option<PalettePanel>,
}

fn push_into_folder(folders: &mut Vec<PanelFolder>, name: &str, control: PanelControl) {
    match folders.iter_mut().find(|f| f.name == name) {
        Some(folder) => folder.controls.push(control),
        None => folders.push(PanelFolder {
            name: name.to_string(),
            controls: vec![control],
        }),
    }
}

pub fn build_panel(registry: &ControlsRegistry, base_path: &str) -> PanelLayout {
    let values = registry.values();
    let config = registry.config();
    let mut layout = PanelLayout {
        title: config
            .main_label
            .clone()
            .unwrap_or_else(|| DEFAULT_MAIN_LABEL.to_string()),
        top_folders: Vec::new(),
        controls: Vec::new(),
        bottom_folders: Vec::new(),
        buttons: Vec::new(),
        copy_snippet: copy_snippet(config, registry.component_name(), values),
        preview_url: preview_url(base_path, values),
        palette: palette_panel(registry),
    };

    if registry.schema().is_empty() {
        for (key, control) in registry.remote_schema() {
            if control.hidden {
                continue;
            }
            let entry = panel_control(key, control.kind.type_name(), values);
            if matches!(control.kind, RemoteControlKind::Button { .. }) {
                layout.buttons.push(entry);
            } else {
                layout.controls.push(entry);
            }
        }
        return layout;
    }

    for (key, control) in registry.schema() {
        if control.hidden {
            continue;
        }
        let entry = panel_control(key, control.type_name(), values);
        if control.is_button() {
            layout.buttons.push(entry);
            continue;
        }
        match (&control.folder, control.folder_placement) {
            (Some(folder), Some(FolderPlacement::Top)) => {
                push_into_folder(&mut layout.top_folders, folder, entry)
            }
            (Some(folder), _) => push_into_folder(&mut layout.bottom_folders, folder, entry),
            (None, _) => layout.controls.push(entry),
        }
    }
    layout
}

fn panel_control(key: &str, type_name: &'static str, values: &Values) -> PanelControl {
    PanelControl {
        key: key.to_string(),
        label: labelize(key),
        type_name,
        value: values.get(key).cloned(),
    }
}

fn copy_snippet(
    config: &ControlsConfig,
    component_name: Option<&str>,
    values: &Values,
) -> Option<String> {
    if config.show_copy_button == Some(false) {
        return None;
    }
    let snippet = jsx_snippet(component_name, values);
    if snippet.is_empty() { None } else { Some(snippet) }
}

fn palette_panel(registry: &ControlsRegistry) -> Option<PalettePanel> {
    let control = registry.config().add_advanced_palette_control.as_ref()?;
    let palette = control.palette_from_values(registry.values());
    Some(PalettePanel {
        control_key: control.control_key.clone(),
        gradient: control.gradient(&palette),
        signature: palette.signature(),
    })
}
