use crate::config::RegisterOptions;
use crate::palette_control::{PaletteWatcher, ResolvedPaletteControl};
use crate::panel::jsx_snippet;
use crate::playground::Playground;
use crate::remote::SyncTransport;
use crate::schema::Schema;
use crate::url_params::{QueryParams, merge_url_params};
use crate::value::ControlValue;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct ControlsBinding {
    schema: Schema,
    options: RegisterOptions,
    palette: Option<ResolvedPaletteControl>,
    registered_shape: Option<String>,
    palette_watcher: PaletteWatcher,
}

impl ControlsBinding {
    pub fn new(schema: Schema, options: RegisterOptions) -> Self {
        Self {
            schema,
            palette: resolve_palette(&options),
            options,
            registered_shape: None,
            palette_watcher: PaletteWatcher::default(),
        }
    }

    pub fn set_options(&mut self, options: RegisterOptions) {
        self.palette = resolve_palette(&options);
        self.options = options;
    }

    pub fn set_schema(&mut self, schema: Schema) {
        self.schema = schema;
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn merged_schema(&self, params: &QueryParams) -> Schema {
        let base = match &self.palette {
            Some(palette) => palette.schema_entries(self.schema.clone()),
            None => self.schema.clone(),
        };
        merge_url_params(&base, params)
    }

    pub fn sync<T: SyncTransport>(&mut self, playground: &mut Playground<T>) -> bool {
        let merged = self.merged_schema(&playground.location().query);
        let shape = shape_key(&merged, &self.options);
        let registered = self.registered_shape.as_deref() != Some(shape.as_str());
        if registered {
            playground.register_schema(merged, &self.options);
            self.registered_shape = Some(shape);
        }
        self.report_palette(playground);
        registered
    }

    fn report_palette<T: SyncTransport>(&mut self, playground: &Playground<T>) {
        let Some(palette) = &self.palette else {
            return;
        };
        let Some(callback) = &palette.on_palette_change else {
            return;
        };
        let current = palette.palette_from_values(playground.registry().values());
        if self.palette_watcher.observe(&current) {
            callback.call(&current);
        }
    }

    pub fn values<'a, T: SyncTransport>(
        &self,
        playground: &'a Playground<T>,
    ) -> BTreeMap<&'a str, &'a ControlValue> {
        playground
            .registry()
            .values()
            .iter()
            .filter(|(key, _)| self.schema.contains_key(key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }

    pub fn jsx<T: SyncTransport>(&self, playground: &Playground<T>) -> String {
        jsx_snippet(
            self.options.component_name.as_deref(),
            playground.registry().values(),
        )
    }
}

fn resolve_palette(options: &RegisterOptions) -> Option<ResolvedPaletteControl> {
    options
        .config
        .as_ref()
        .and_then(|c| c.add_advanced_palette_control.as_ref())
        .map(|c| c.resolve())
}

// Callbacks do not serialize, so swapping only a callback is not a new shape.
fn shape_key(schema: &Schema, options: &RegisterOptions) -> String {
    let config = options.config.as_ref().map(|c| c.resolve());
    serde_json::to_string(&(&options.component_name, &config, schema)).unwrap_or_else(|_| {
        schema
            .iter()
            .map(|(k, c)| format!("{k}:{}", c.type_name()))
            .collect::<Vec<_>>()
            .join(",")
    })
}
