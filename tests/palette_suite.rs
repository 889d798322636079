use playground_canvas::palette::{
    AdvancedPalette, HexColorOptions, PaletteChannel, PaletteEntry, PaletteSource, PaletteValue,
    advanced_palette_to_hex_colors, compute_palette_gradient, create_advanced_palette,
    default_advanced_palette, hex_to_palette_value, palette_color_at, palette_value_to_hex,
    section_key_for_index, to_rgba,
};
use playground_canvas::palette_control::{
    DEFAULT_CONTROL_KEY, InteractionCallback, PaletteCallback, PaletteControlConfig, PaletteRange,
    PaletteWatcher, default_range,
};
use playground_canvas::palette_controller::{PaletteController, PaletteControllerOptions};
use playground_canvas::value::ControlValue;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_gradient_starts_and_ends_on_the_same_colour() {
    let gradient = compute_palette_gradient(&default_advanced_palette(), 12);
    assert!(gradient.starts_with("linear-gradient(to right, rgba(255, 66, 66, 0.5) 0.0%, "));
    assert!(gradient.ends_with("rgba(255, 66, 66, 0.5) 100.0%)"));
    assert_eq!(gradient.matches("rgba(").count(), 12);
}

#[test]
fn gradient_widens_single_step_to_both_ends() {
    let gradient = compute_palette_gradient(&default_advanced_palette(), 1);
    assert_eq!(gradient.matches("rgba(").count(), 2);
    assert!(gradient.contains(" 0.0%"));
    assert!(gradient.contains(" 100.0%"));
}

#[test]
fn colour_at_midpoint_follows_cosine_formula() {
    let mid = palette_color_at(&default_advanced_palette(), 0.5);
    assert_eq!(to_rgba(mid, 0.5), "rgba(0, 189, 189, 0.5)");
}

#[test]
fn colour_is_clamped_into_unit_range() {
    let hot = AdvancedPalette::from_sections([
        ("A", PaletteValue::new(1.0, 1.0, 1.0)),
        ("B", PaletteValue::new(1.0, 1.0, 1.0)),
        ("C", PaletteValue::new(0.0, 0.0, 0.0)),
        ("D", PaletteValue::new(0.0, 0.0, 0.0)),
    ]);
    assert_eq!(palette_color_at(&hot, 0.3), PaletteValue::new(1.0, 1.0, 1.0));
}

#[test]
fn signature_is_order_independent_and_fixed_precision() {
    let forward = default_advanced_palette();
    let reversed = AdvancedPalette::from_sections(
        forward
            .iter()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|(k, v)| (k.to_string(), *v)),
    );
    assert_eq!(
        forward.signature(),
        "0.500-0.500-0.500-0.500-0.500-0.500-1.000-1.000-1.000-0.000-0.330-0.670"
    );
    assert_eq!(forward.signature(), reversed.signature());

    let mut jitter = forward.clone();
    if let Some(d) = jitter.get_mut("D") {
        d.g += 0.0001;
    }
    assert_eq!(forward.signature(), jitter.signature());
}

#[test]
fn signature_treats_negative_zero_as_zero() {
    let a = AdvancedPalette::from_sections([("A", PaletteValue::new(-0.0001, 0.0, 0.0))]);
    let b = AdvancedPalette::from_sections([("A", PaletteValue::new(0.0, 0.0, 0.0))]);
    assert_eq!(a.signature(), b.signature());
}

#[test]
fn hex_parsing_handles_short_long_and_malformed_input() {
    let v = hex_to_palette_value("#001a33");
    assert!(close(v.r, 0.0));
    assert!(close(v.g, 26.0 / 255.0));
    assert!(close(v.b, 0.2));

    assert_eq!(palette_value_to_hex(hex_to_palette_value("#abc")), "#aabbcc");
    assert_eq!(palette_value_to_hex(hex_to_palette_value("FF8800")), "#ff8800");
    assert_eq!(hex_to_palette_value("#12345"), PaletteValue::BLACK);
    assert_eq!(hex_to_palette_value("#zzzzzz"), PaletteValue::BLACK);
}

#[test]
fn hex_list_source_fills_sections_in_order() {
    let source = PaletteSource::hex_list(["#ff0000", "#00ff00", "#0000ff", "#ffffff", "#000000"]);
    let palette = create_advanced_palette(Some(&source));
    let keys: Vec<&str> = palette.keys().collect();
    assert_eq!(keys, ["A", "B", "C", "D", "Color5"]);
    assert_eq!(palette.get("B"), Some(&PaletteValue::new(0.0, 1.0, 0.0)));
    assert_eq!(section_key_for_index(7), "Color8");
}

#[test]
fn empty_or_missing_source_yields_default_palette() {
    assert_eq!(create_advanced_palette(None), default_advanced_palette());
    let empty = PaletteSource::hex_list(Vec::<String>::new());
    assert_eq!(create_advanced_palette(Some(&empty)), default_advanced_palette());
}

#[test]
fn section_source_clamps_channels() {
    let source = PaletteSource::Sections(vec![
        (
            "A".to_string(),
            PaletteEntry::Channels {
                r: Some(1.7),
                g: Some(-0.3),
                b: None,
            },
        ),
        ("B".to_string(), PaletteEntry::from("#ffffff")),
    ]);
    let palette = create_advanced_palette(Some(&source));
    assert_eq!(palette.get("A"), Some(&PaletteValue::new(1.0, 0.0, 0.0)));
    assert_eq!(palette.get("B"), Some(&PaletteValue::new(1.0, 1.0, 1.0)));
}

#[test]
fn hex_colours_use_order_then_fallback_then_default() {
    let palette = create_advanced_palette(Some(&PaletteSource::hex_list(["#102030"])));
    let fallback = create_advanced_palette(Some(&PaletteSource::hex_list(["#000000", "#aabbcc"])));
    let colours = advanced_palette_to_hex_colors(
        &palette,
        &HexColorOptions {
            section_order: Some(vec!["A".into(), "B".into(), "Z".into()]),
            fallback_palette: Some(fallback),
            default_color: Some("#123456".into()),
        },
    );
    assert_eq!(colours, ["#102030", "#aabbcc", "#123456"]);
}

#[test]
fn palette_serializes_as_ordered_map() {
    let palette = AdvancedPalette::from_sections([
        ("D", PaletteValue::new(0.0, 0.0, 0.0)),
        ("A", PaletteValue::new(1.0, 0.5, 0.25)),
    ]);
    let json = serde_json::to_string(&palette).expect("palette should serialize");
    assert_eq!(json, r#"{"D":{"r":0.0,"g":0.0,"b":0.0},"A":{"r":1.0,"g":0.5,"b":0.25}}"#);
    let back: AdvancedPalette = serde_json::from_str(&json).expect("palette should deserialize");
    assert_eq!(back, palette);
}

#[test]
fn control_resolution_fills_defaults() {
    let control = PaletteControlConfig::new(default_advanced_palette()).resolve();
    assert_eq!(control.control_key, DEFAULT_CONTROL_KEY);
    assert_eq!(control.hidden_key_prefix, "palette");
    assert_eq!(control.gradient_steps, 12);
    assert_eq!(control.sections.len(), 4);
    assert_eq!(control.sections[1].label, "Vector B");
    assert_eq!(control.range_for("B"), PaletteRange { min: -1.0, max: 1.0, step: 0.01 });
    assert_eq!(control.range_for("Color5"), PaletteRange::UNIT);
    assert_eq!(default_range("C").map(|r| r.max), Some(2.0));
    assert_eq!(control.channel_labels.get(PaletteChannel::G), "Green");
}

#[test]
fn control_adds_hidden_number_per_channel() {
    let control = PaletteControlConfig::new(default_advanced_palette()).resolve();
    let schema = control.schema_entries(BTreeMap::new());
    assert_eq!(schema.len(), 12);
    let d_blue = schema.get("paletteDb").expect("paletteDb should exist");
    assert!(d_blue.hidden);
    assert_eq!(d_blue.default_value(), Some(ControlValue::Number(0.67)));
}

#[test]
fn control_reads_palette_back_from_values() {
    let control = PaletteControlConfig::new(default_advanced_palette()).resolve();
    let mut values = BTreeMap::new();
    values.insert("paletteAr".to_string(), ControlValue::Text("0.25px".into()));
    values.insert("paletteAg".to_string(), ControlValue::Text("nope".into()));
    values.insert("paletteCb".to_string(), ControlValue::Number(2.0));
    let palette = control.palette_from_values(&values);
    assert_eq!(palette.channel("A", PaletteChannel::R), 0.25);
    assert_eq!(palette.channel("A", PaletteChannel::G), 0.5);
    assert_eq!(palette.channel("C", PaletteChannel::B), 2.0);
}

#[test]
fn channel_update_clamps_to_section_range_and_reports_interaction() {
    let touched = Rc::new(Cell::new(0));
    let seen = Rc::clone(&touched);
    let mut config = PaletteControlConfig::new(default_advanced_palette());
    config.on_interaction = Some(InteractionCallback::new(move || seen.set(seen.get() + 1)));
    let control = config.resolve();

    assert_eq!(control.channel_update("B", PaletteChannel::R, -4.0), ("paletteBr".to_string(), -1.0));
    assert_eq!(control.channel_update("C", PaletteChannel::G, 1.5), ("paletteCg".to_string(), 1.5));
    let resets = control.reset_updates();
    assert_eq!(resets.len(), 12);
    assert!(resets.contains(&("paletteDg".to_string(), 0.33)));
    assert_eq!(touched.get(), 3);
}

#[test]
fn watcher_reports_only_meaningful_changes() {
    let mut watcher = PaletteWatcher::default();
    let mut palette = default_advanced_palette();
    assert!(watcher.observe(&palette));
    assert!(!watcher.observe(&palette));
    if let Some(a) = palette.get_mut("A") {
        a.r = 0.9;
    }
    assert!(watcher.observe(&palette));
}

#[test]
fn controller_set_update_reset_notify() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let mut controller = PaletteController::new(PaletteControllerOptions {
        on_change: Some(PaletteCallback::new(move |_| seen.set(seen.get() + 1))),
        ..PaletteControllerOptions::default()
    });
    assert_eq!(controller.palette(), &default_advanced_palette());

    controller.set_palette(Some(&PaletteSource::hex_list(["#ffffff"])));
    assert_eq!(controller.hex_colors(), ["#ffffff"]);

    controller.update_palette(|mut current| {
        current.insert("B", PaletteValue::new(0.0, 0.0, 1.0));
        Some(PaletteSource::Palette(current))
    });
    assert_eq!(controller.hex_colors(), ["#ffffff", "#0000ff"]);

    controller.update_palette(|_| None);
    assert_eq!(controller.palette().len(), 2);

    controller.reset_palette();
    assert_eq!(controller.palette(), &default_advanced_palette());
    assert_eq!(calls.get(), 4);
}

#[test]
fn controller_reseeds_only_when_default_signature_changes() {
    let mut controller = PaletteController::new(PaletteControllerOptions::default());
    controller.set_palette(Some(&PaletteSource::hex_list(["#ff0000"])));

    controller.set_default_palette(None);
    assert_eq!(controller.hex_colors(), ["#ff0000"]);

    let blue = PaletteSource::hex_list(["#0000ff", "#0000ff"]);
    controller.set_default_palette(Some(&blue));
    assert_eq!(controller.hex_colors(), ["#0000ff", "#0000ff"]);
    assert_eq!(controller.control_config().default_palette, create_advanced_palette(Some(&blue)));
}

#[test]
fn controller_hex_colours_fall_back_for_missing_sections() {
    let controller = PaletteController::new(PaletteControllerOptions {
        default_palette: Some(PaletteSource::hex_list(["#ff0000"])),
        fallback_palette: Some(PaletteSource::hex_list(["#000000", "#00ff00"])),
        section_order: Some(vec!["A".into(), "B".into(), "C".into()]),
        default_color: Some("#ffffff".into()),
        ..PaletteControllerOptions::default()
    });
    assert_eq!(controller.hex_colors(), ["#ff0000", "#00ff00", "#ffffff"]);
    assert!(controller.gradient().starts_with("linear-gradient(to right, "));
}

#[test]
fn value_to_hex_and_back_stays_within_one_step() {
    let samples = [0.0, 0.001, 0.1234, 1.0 / 3.0, 0.5, 0.66, 0.998, 1.0];
    for &r in &samples {
        for &g in &samples {
            let b = 1.0 - r;
            let original = PaletteValue::new(r, g, b);
            let back = hex_to_palette_value(&palette_value_to_hex(original));
            for channel in [PaletteChannel::R, PaletteChannel::G, PaletteChannel::B] {
                let delta = (original.get(channel) - back.get(channel)).abs();
                assert!(delta <= 1.0 / 255.0, "{original:?} -> {back:?}");
            }
        }
    }
}

#[test]
fn four_hex_colours_map_to_sections_a_through_d() {
    let source = PaletteSource::hex_list(["#808080", "#808080", "#ffffff", "#001a33"]);
    let palette = create_advanced_palette(Some(&source));
    assert_eq!(palette.keys().collect::<Vec<_>>(), ["A", "B", "C", "D"]);

    let grey = 128.0 / 255.0;
    for section in ["A", "B"] {
        let v = palette.get(section).expect("grey section");
        assert!(close(v.r, grey) && close(v.g, grey) && close(v.b, grey));
    }
    assert_eq!(palette.get("C"), Some(&PaletteValue::new(1.0, 1.0, 1.0)));
    let d = palette.get("D").expect("section D");
    assert!(close(d.r, 0.0));
    assert!(close(d.g, 26.0 / 255.0));
    assert!(close(d.b, 0.2));
}
