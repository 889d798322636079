use crate::value::{ControlValue, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type Schema = BTreeMap<String, ControlDescriptor>;
pub type RemoteSchema = BTreeMap<String, RemoteControlDefinition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderPlacement {
    Top,
    Bottom,
}

#[derive(Clone)]
pub struct ButtonAction(Rc<dyn Fn()>);

impl ButtonAction {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ButtonAction(..)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlKind {
    Boolean {
        value: bool,
    },
    Number {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    String {
        value: String,
    },
    Color {
        value: String,
    },
    Select {
        value: String,
        #[serde(default)]
        options: Vec<String>,
    },
    Button {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip)]
        on_click: Option<ButtonAction>,
    },
}

impl ControlKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Number { .. } => "number",
            Self::String { .. } => "string",
            Self::Color { .. } => "color",
            Self::Select { .. } => "select",
            Self::Button { .. } => "button",
        }
    }

    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Boolean { .. } => Some(ValueKind::Bool),
            Self::Number { .. } => Some(ValueKind::Number),
            Self::String { .. } | Self::Color { .. } | Self::Select { .. } => Some(ValueKind::Text),
            Self::Button { .. } => None,
        }
    }

    pub fn default_value(&self) -> Option<ControlValue> {
        match self {
            Self::Boolean { value } => Some(ControlValue::Bool(*value)),
            Self::Number { value, .. } => Some(ControlValue::Number(*value)),
            Self::String { value } | Self::Color { value } | Self::Select { value, .. } => {
                Some(ControlValue::Text(value.clone()))
            }
            Self::Button { .. } => None,
        }
    }

    pub fn set_default_value(&mut self, next: ControlValue) {
        match (self, next) {
            (Self::Boolean { value }, ControlValue::Bool(v)) => *value = v,
            (Self::Number { value, .. }, ControlValue::Number(v)) => *value = v,
            (Self::String { value }, ControlValue::Text(v))
            | (Self::Color { value }, ControlValue::Text(v))
            | (Self::Select { value, .. }, ControlValue::Text(v)) => *value = v,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDescriptor {
    #[serde(flatten)]
    pub kind: ControlKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_placement: Option<FolderPlacement>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl From<ControlKind> for ControlDescriptor {
    fn from(kind: ControlKind) -> Self {
        Self {
            kind,
            hidden: false,
            folder: None,
            folder_placement: None,
        }
    }
}

impl ControlDescriptor {
    pub fn boolean(value: bool) -> Self {
        ControlKind::Boolean { value }.into()
    }

    pub fn number(value: f64) -> Self {
        ControlKind::Number {
            value,
            min: None,
            max: None,
            step: None,
        }
        .into()
    }

    pub fn string(value: impl Into<String>) -> Self {
        ControlKind::String {
            value: value.into(),
        }
        .into()
    }

    pub fn color(value: impl Into<String>) -> Self {
        ControlKind::Color {
            value: value.into(),
        }
        .into()
    }

    pub fn select<I, S>(value: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ControlKind::Select {
            value: value.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn button() -> Self {
        ControlKind::Button {
            label: None,
            on_click: None,
        }
        .into()
    }

    pub fn range(mut self, lo: f64, hi: f64) -> Self {
        if let ControlKind::Number { min, max, .. } = &mut self.kind {
            *min = Some(lo);
            *max = Some(hi);
        }
        self
    }

    pub fn step(mut self, by: f64) -> Self {
        if let ControlKind::Number { step, .. } = &mut self.kind {
            *step = Some(by);
        }
        self
    }

    pub fn label(mut self, text: impl Into<String>) -> Self {
        if let ControlKind::Button { label, .. } = &mut self.kind {
            *label = Some(text.into());
        }
        self
    }

    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        if let ControlKind::Button { on_click, .. } = &mut self.kind {
            *on_click = Some(ButtonAction::new(f));
        }
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn folder(mut self, name: impl Into<String>) -> Self {
        self.folder = Some(name.into());
        self
    }

    pub fn placement(mut self, placement: FolderPlacement) -> Self {
        self.folder_placement = Some(placement);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn default_value(&self) -> Option<ControlValue> {
        self.kind.default_value()
    }

    pub fn is_button(&self) -> bool {
        matches!(self.kind, ControlKind::Button { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RemoteControlKind {
    Boolean,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    String,
    Color,
    Select {
        options: Vec<String>,
    },
    Button {
        label: String,
        #[serde(rename = "supportsRemote")]
        supports_remote: bool,
    },
}

impl RemoteControlKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number { .. } => "number",
            Self::String => "string",
            Self::Color => "color",
            Self::Select { .. } => "select",
            Self::Button { .. } => "button",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteControlDefinition {
    #[serde(flatten)]
    pub kind: RemoteControlKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

pub fn serialize_control(key: &str, control: &ControlDescriptor) -> RemoteControlDefinition {
    let kind = match &control.kind {
        ControlKind::Boolean { .. } => RemoteControlKind::Boolean,
        ControlKind::Number { min, max, step, .. } => RemoteControlKind::Number {
            min: *min,
            max: *max,
            step: *step,
        },
        ControlKind::String { .. } => RemoteControlKind::String,
        ControlKind::Color { .. } => RemoteControlKind::Color,
        ControlKind::Select { options, .. } => RemoteControlKind::Select {
            options: options.clone(),
        },
        ControlKind::Button { label, on_click } => RemoteControlKind::Button {
            label: label.clone().unwrap_or_else(|| key.to_string()),
            supports_remote: on_click.is_some(),
        },
    };
    RemoteControlDefinition {
        kind,
        hidden: control.hidden,
    }
}

pub fn serialize_schema(schema: &Schema) -> RemoteSchema {
    schema
        .iter()
        .map(|(key, control)| (key.clone(), serialize_control(key, control)))
        .collect()
}
