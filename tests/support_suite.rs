use clap::Parser;
use playground_canvas::camera::{CAMERA_LOG_DELAY, CameraLogger, CameraPosition};
use playground_canvas::cli::{Cli, LogStyle};
use playground_canvas::debounce::Debouncer;
use playground_canvas::logging::{DEFAULT_FILTER, LoggingConfig, init_logging};
use playground_canvas::registry::Values;
use playground_canvas::snapshot::{SnapshotError, ValuesSnapshot};
use playground_canvas::value::ControlValue;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("playground_canvas_{}_{name}", std::process::id()))
        .join("values.txt")
}

#[test]
fn debouncer_fires_last_payload_once() {
    let start = Instant::now();
    let mut debounce = Debouncer::new(Duration::from_millis(200));
    debounce.call(start, 1);
    debounce.call(start + Duration::from_millis(150), 2);

    assert_eq!(debounce.poll(start + Duration::from_millis(300)), None);
    assert_eq!(debounce.poll(start + Duration::from_millis(350)), Some(2));
    assert_eq!(debounce.poll(start + Duration::from_millis(900)), None);
    assert!(!debounce.is_pending());
}

#[test]
fn debouncer_cancel_drops_pending_payload() {
    let start = Instant::now();
    let mut debounce = Debouncer::new(Duration::from_millis(10));
    debounce.call(start, "x");
    assert_eq!(debounce.deadline(), Some(start + Duration::from_millis(10)));
    assert_eq!(debounce.cancel(), Some("x"));
    assert_eq!(debounce.poll(start + Duration::from_secs(1)), None);
}

#[test]
fn camera_logger_reports_settled_position() {
    let start = Instant::now();
    let mut camera = CameraLogger::default();
    camera.camera_moved(start, CameraPosition::new(0.0, 1.0, 5.0));
    camera.camera_moved(start + Duration::from_millis(50), CameraPosition::new(1.0, 2.0, 3.0));

    assert_eq!(camera.tick(start + Duration::from_millis(100)), None);
    let settled = camera.tick(start + Duration::from_millis(50) + CAMERA_LOG_DELAY);
    assert_eq!(settled, Some(CameraPosition::new(1.0, 2.0, 3.0)));
    assert_eq!(settled.map(|p| p.to_string()).as_deref(), Some("[1.000, 2.000, 3.000]"));
}

#[test]
fn snapshot_saves_and_loads_values() {
    let path = scratch_path("roundtrip");
    let values = Values::from([
        ("speed".to_string(), ControlValue::Number(2.5)),
        ("wireframe".to_string(), ControlValue::Bool(true)),
        ("title".to_string(), ControlValue::Text("a = b".into())),
    ]);
    ValuesSnapshot::new(values.clone())
        .save(&path)
        .expect("snapshot save should succeed");

    let text = std::fs::read_to_string(&path).expect("snapshot file should exist");
    assert!(text.starts_with("# playground-canvas values v1\n"));
    assert!(text.contains("title=\"a = b\"\n"));
    assert!(!path.with_extension("tmp").exists());

    let loaded = ValuesSnapshot::load(&path).expect("snapshot load should succeed");
    assert_eq!(loaded.values, values);
    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[test]
fn snapshot_missing_file_is_empty() {
    let loaded = ValuesSnapshot::load(&scratch_path("missing")).expect("missing file is not an error");
    assert!(loaded.values.is_empty());
}

#[test]
fn snapshot_parse_reports_line_numbers() {
    let err = ValuesSnapshot::parse("# header\nspeed=1\nbroken line\n")
        .expect_err("line without '=' must fail");
    assert!(matches!(err, SnapshotError::Parse { line: 3, .. }));

    let err = ValuesSnapshot::parse("speed={oops}\n").expect_err("invalid json must fail");
    assert!(matches!(err, SnapshotError::Parse { line: 1, .. }));
}

#[test]
fn snapshot_refuses_entries_it_could_not_read_back() {
    for key in ["a=b", "#note", " padded", "multi\nline", ""] {
        let snapshot = ValuesSnapshot::new(Values::from([(key.to_string(), ControlValue::Number(1.0))]));
        let err = snapshot.render().expect_err("key must be rejected");
        assert!(matches!(err, SnapshotError::Unstorable { .. }), "{key:?}");
    }

    let path = scratch_path("non_finite");
    let snapshot = ValuesSnapshot::new(Values::from([("speed".to_string(), ControlValue::Number(f64::NAN))]));
    let err = snapshot.save(&path).expect_err("NaN must be rejected");
    assert!(matches!(err, SnapshotError::Unstorable { reason: "non-finite number", .. }));
    assert!(!path.exists());
    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[test]
fn logging_filter_precedence_and_cli_wiring() {
    let cli = Cli::parse_from([
        "playground-canvas",
        "--log-filter",
        "playground_canvas=debug",
        "--log-style",
        "never",
        "--log-timestamps",
        "false",
    ]);
    let config = LoggingConfig::from_cli(&cli);
    assert_eq!(config.style, LogStyle::Never);
    assert!(!config.timestamps);
    assert_eq!(config.resolved_filter(Some("trace")), "playground_canvas=debug");

    let defaults = LoggingConfig::default();
    assert_eq!(defaults.resolved_filter(Some("trace")), "trace");
    assert_eq!(defaults.resolved_filter(None), DEFAULT_FILTER);

    assert!(init_logging(&config));
    assert!(!init_logging(&defaults));
}
