use crate::config::{ControlsConfig, RegisterOptions};
use crate::schema::{ButtonAction, ControlKind, RemoteSchema, Schema, serialize_schema};
use crate::value::ControlValue;
use std::collections::BTreeMap;
use std::fmt;

pub type Values = BTreeMap<String, ControlValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlsError {
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    ButtonHasNoValue(String),
    NonFiniteNumber(String),
}

impl fmt::Display for ControlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "control '{key}' expects a {expected} value, got {found}"),
            Self::ButtonHasNoValue(key) => write!(f, "control '{key}' is a button and holds no value"),
            Self::NonFiniteNumber(key) => write!(f, "control '{key}' only takes finite numbers"),
        }
    }
}

impl std::error::Error for ControlsError {}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    ValueChanged { key: String, value: ControlValue },
    SchemaChanged { keys: Vec<String> },
    ConfigChanged,
}

type Listener = Box<dyn FnMut(&RegistryEvent)>;

pub struct ControlsRegistry {
    schema: Schema,
    remote_schema: RemoteSchema,
    values: Values,
    config: ControlsConfig,
    component_name: Option<String>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl Default for ControlsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ControlsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlsRegistry")
            .field("schema", &self.schema)
            .field("values", &self.values)
            .field("config", &self.config)
            .field("component_name", &self.component_name)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl ControlsRegistry {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(),
            remote_schema: RemoteSchema::new(),
            values: Values::new(),
            config: ControlsConfig::initial(),
            component_name: None,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RegistryEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn remote_schema(&self) -> &RemoteSchema {
        &self.remote_schema
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&ControlValue> {
        self.values.get(key)
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn component_name(&self) -> Option<&str> {
        self.component_name.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn register_schema(&mut self, partial: Schema, options: &RegisterOptions) {
        if let Some(name) = &options.component_name {
            self.component_name = Some(name.clone());
        }
        if let Some(config) = &options.config {
            self.merge_config(&config.resolve());
        }

        let keys: Vec<String> = partial.keys().cloned().collect();
        let serialized = serialize_schema(&partial);
        for (key, control) in partial {
            if let Some(prev) = self.schema.get(&key) {
                if prev.type_name() != control.type_name() {
                    log::warn!(
                        "control '{key}' re-registered as {} (was {})",
                        control.type_name(),
                        prev.type_name()
                    );
                }
            }
            if !self.values.contains_key(&key) {
                match control.default_value() {
                    Some(ControlValue::Number(n)) if !n.is_finite() => {
                        log::warn!("control '{key}' has a non-finite default; left unset")
                    }
                    Some(default) => {
                        self.values.insert(key.clone(), default);
                    }
                    None => {}
                }
            }
            self.schema.insert(key, control);
        }
        self.remote_schema.extend(serialized);

        log::debug!("registered {} control(s): {:?}", keys.len(), keys);
        self.emit(RegistryEvent::SchemaChanged { keys });
    }

    /// Unknown keys are accepted and become phantom entries.
    pub fn check_value(&self, key: &str, value: &ControlValue) -> Result<(), ControlsError> {
        if value.as_f64().is_some_and(|n| !n.is_finite()) {
            return Err(ControlsError::NonFiniteNumber(key.to_string()));
        }
        let Some(control) = self.schema.get(key) else {
            return Ok(());
        };
        match control.kind.value_kind() {
            None => Err(ControlsError::ButtonHasNoValue(key.to_string())),
            Some(expected) if expected != value.kind() => Err(ControlsError::TypeMismatch {
                key: key.to_string(),
                expected: expected.as_str(),
                found: value.kind().as_str(),
            }),
            Some(_) => Ok(()),
        }
    }

    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ControlValue>,
    ) -> Result<bool, ControlsError> {
        let value = value.into();
        self.check_value(key, &value)?;
        if self.values.get(key) == Some(&value) {
            return Ok(false);
        }
        self.values.insert(key.to_string(), value.clone());
        self.emit(RegistryEvent::ValueChanged {
            key: key.to_string(),
            value,
        });
        Ok(true)
    }

    pub fn merge_values(&mut self, incoming: Values) -> bool {
        let mut changed = false;
        for (key, value) in incoming {
            match self.set_value(&key, value) {
                Ok(c) => changed |= c,
                Err(err) => log::warn!("dropping synced value: {err}"),
            }
        }
        changed
    }

    pub fn replace_remote_schema(&mut self, schema: RemoteSchema) {
        if self.remote_schema == schema {
            return;
        }
        let keys = schema.keys().cloned().collect();
        self.remote_schema = schema;
        self.emit(RegistryEvent::SchemaChanged { keys });
    }

    pub fn merge_config(&mut self, patch: &ControlsConfig) -> bool {
        let mut next = self.config.clone();
        next.merge_from(patch);
        if next == self.config {
            return false;
        }
        self.config = next;
        self.emit(RegistryEvent::ConfigChanged);
        true
    }

    pub fn button_action(&self, key: &str) -> Option<ButtonAction> {
        match self.schema.get(key).map(|c| &c.kind) {
            Some(ControlKind::Button { on_click, .. }) => on_click.clone(),
            _ => None,
        }
    }

    fn emit(&mut self, event: RegistryEvent) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
