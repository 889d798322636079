use crate::binding::ControlsBinding;
use crate::cli::Cli;
use crate::config::{RegisterOptions, RemoteControlSetting, UseControlsConfig};
use crate::palette::{
    HexColorOptions, PaletteSource, advanced_palette_to_hex_colors, create_advanced_palette,
};
use crate::palette_control::PaletteControlConfig;
use crate::panel::build_panel;
use crate::playground::Playground;
use crate::remote::{MemoryBus, SyncTransport};
use crate::schema::{ControlDescriptor, Schema};
use crate::snapshot::ValuesSnapshot;
use crate::url_params::{PageLocation, QueryParams, REMOTE_CONTROLS_CONTROLLER, REMOTE_CONTROLS_PARAM, parse_param};
use crate::value::ControlValue;
use anyhow::{Context, bail};
use std::path::Path;

const MAX_PUMP_ROUNDS: usize = 16;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let location = PageLocation::parse(&cli.url);
    let schema = match &cli.schema {
        Some(path) => load_schema(path)?,
        None => demo_schema(),
    };
    let options = RegisterOptions::component(cli.component.clone()).with_config(controls_config(&cli));

    let bus = MemoryBus::new();
    let mut host = Playground::new(location.clone(), bus.clone());
    let mut host_binding = ControlsBinding::new(schema.clone(), options.clone());
    host_binding.sync(&mut host);

    if let Some(path) = &cli.snapshot {
        let snapshot = ValuesSnapshot::load(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        if !snapshot.values.is_empty() {
            log::info!("restoring {} value(s) from {}", snapshot.values.len(), path.display());
            host.restore_values(snapshot.values);
        }
    }

    if cli.simulate_controller {
        let mut query = QueryParams::default();
        query.set(REMOTE_CONTROLS_PARAM, REMOTE_CONTROLS_CONTROLLER);
        let controller_location = PageLocation {
            path: location.path.clone(),
            query,
        };
        let mut controller = Playground::new(controller_location, bus.clone());
        let mut controller_binding = ControlsBinding::new(schema, options);
        controller_binding.sync(&mut controller);
        settle(&mut host, &mut controller);

        apply_edits(&mut controller, &cli.edits)?;
        settle(&mut host, &mut controller);

        println!("controller view:");
        print_values(&controller);
    } else {
        apply_edits(&mut host, &cli.edits)?;
    }

    println!("host values:");
    print_values(&host);
    print_summary(&host, &host_binding);

    if let Some(path) = &cli.snapshot {
        ValuesSnapshot::new(host.registry().values().clone())
            .save(path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        log::info!("saved values to {}", path.display());
    }
    Ok(())
}

fn controls_config(cli: &Cli) -> UseControlsConfig {
    let remote_control = match cli.remote.as_deref() {
        Some("true") => Some(RemoteControlSetting::Enabled(true)),
        Some("false") => Some(RemoteControlSetting::Enabled(false)),
        Some(id) => Some(RemoteControlSetting::Channel {
            label: None,
            channel_id: Some(id.to_string()),
        }),
        None if cli.simulate_controller => Some(RemoteControlSetting::Enabled(true)),
        None => None,
    };

    let add_advanced_palette_control = if cli.no_palette {
        None
    } else {
        let source = (!cli.palette.is_empty()).then(|| PaletteSource::hex_list(&cli.palette));
        let mut palette = PaletteControlConfig::new(create_advanced_palette(source.as_ref()));
        palette.gradient_steps = cli.gradient_steps;
        Some(palette)
    };

    UseControlsConfig {
        show_copy_button: Some(true),
        remote_control,
        add_advanced_palette_control,
        ..UseControlsConfig::default()
    }
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid schema {}", path.display()))
}

fn demo_schema() -> Schema {
    Schema::from([
        ("speed".to_string(), ControlDescriptor::number(1.0).range(0.0, 5.0).step(0.1)),
        ("wireframe".to_string(), ControlDescriptor::boolean(false)),
        ("title".to_string(), ControlDescriptor::string("Waves")),
        ("tint".to_string(), ControlDescriptor::color("#ff8800")),
        (
            "mode".to_string(),
            ControlDescriptor::select("smooth", ["smooth", "stepped"]).folder("Shading"),
        ),
        (
            "reset".to_string(),
            ControlDescriptor::button()
                .label("Reset view")
                .on_click(|| log::info!("reset pressed")),
        ),
    ])
}

fn apply_edits<T: SyncTransport>(playground: &mut Playground<T>, edits: &[String]) -> anyhow::Result<()> {
    for edit in edits {
        let Some((key, raw)) = edit.split_once('=') else {
            bail!("expected KEY=VALUE, got '{edit}'");
        };
        let key = key.trim();
        if playground.registry().schema().get(key).is_some_and(|c| c.is_button())
            || playground
                .registry()
                .remote_schema()
                .get(key)
                .is_some_and(|c| c.kind.type_name() == "button")
        {
            playground.trigger_button(key);
            continue;
        }
        let current = playground
            .value(key)
            .cloned()
            .unwrap_or_else(|| ControlValue::Text(String::new()));
        let value = parse_param(raw, &current);
        playground
            .set_value(key, value)
            .with_context(|| format!("cannot set '{key}'"))?;
    }
    Ok(())
}

fn settle<A: SyncTransport, B: SyncTransport>(host: &mut Playground<A>, controller: &mut Playground<B>) {
    for _ in 0..MAX_PUMP_ROUNDS {
        if host.pump() + controller.pump() == 0 {
            return;
        }
    }
    log::warn!("sync did not settle after {MAX_PUMP_ROUNDS} rounds");
}

fn print_values<T: SyncTransport>(playground: &Playground<T>) {
    for (key, value) in playground.registry().values() {
        println!("  {key} = {value}");
    }
}

fn print_summary<T: SyncTransport>(host: &Playground<T>, binding: &ControlsBinding) {
    let layout = build_panel(host.registry(), &host.location().path);
    println!("panel: {}", layout.title);
    if let Some(snippet) = &layout.copy_snippet {
        println!("snippet: {snippet}");
    } else {
        println!("jsx: {}", binding.jsx(host));
    }
    println!("preview: {}", layout.preview_url);
    if let Some(palette) = host.current_palette() {
        let hex = advanced_palette_to_hex_colors(&palette, &HexColorOptions::default());
        println!("palette: {}", hex.join(", "));
        if let Some(panel) = &layout.palette {
            println!("gradient: {}", panel.gradient);
        }
    }
}
