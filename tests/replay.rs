//! Replay driver scenarios, loaded from files the way the CLI loads them.

use chrono::Utc;
use food_lookup::app::CloseReason;
use food_lookup::lookup::{JsonCatalog, LookupWorker};
use food_lookup::replay::{ReplayDriver, ReplayReport, Script};
use food_lookup::{initialize, Action, Config, FoodLookupError, ModalView};
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "foods": [
        { "id": "egg", "name": "Egg, whole", "calories": 155, "barcodes": ["4006381333931"] },
        { "id": "banana", "name": "Banana", "calories": 89 },
        { "id": "oats", "name": "Rolled oats", "calories": 389 }
    ]
}"#;

fn replay(dir: &TempDir, script_json: &str) -> food_lookup::Result<ReplayReport> {
    let catalog_path = dir.path().join("foods.json");
    let script_path = dir.path().join("script.json");
    fs::write(&catalog_path, CATALOG).unwrap();
    fs::write(&script_path, script_json).unwrap();

    let config = Config::default();
    let catalog = JsonCatalog::from_file(&catalog_path, config.max_results)?;
    let script = Script::from_file(&script_path)?;

    ReplayDriver::new(LookupWorker::new(catalog), initialize(&config), Utc::now()).run(&script)
}

#[test]
fn lifo_delivery_keeps_newest_query() {
    let dir = tempfile::tempdir().unwrap();
    let report = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":0,"do":"open"},
            {"at_ms":10,"do":"type","text":"banana"},
            {"at_ms":400,"do":"type","text":"egg"},
            {"at_ms":800,"do":"wait"},
            {"do":"deliver","order":"lifo"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(report.lookups_dispatched, 2);
    let names: Vec<&str> = report.final_view.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Egg, whole"]);
    assert_eq!(report.final_view.search_text, "egg");
}

#[test]
fn scan_and_select_reports_callbacks_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let report = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":0,"do":"open"},
            {"at_ms":100,"do":"tap_scan"},
            {"at_ms":200,"do":"permission","granted":true},
            {"at_ms":900,"do":"scan","barcode":"4006381333931"},
            {"at_ms":950,"do":"scan","barcode":"4006381333931"},
            {"do":"deliver"},
            {"do":"select","index":0}
        ]}"#,
    )
    .unwrap();

    assert_eq!(report.lookups_dispatched, 1);
    assert_eq!(report.callbacks.len(), 4);
    assert_eq!(report.callbacks[0], Action::RequestCameraPermission);
    assert_eq!(report.callbacks[1], Action::StartCamera);
    assert_eq!(report.callbacks[2], Action::StopCamera);
    assert!(matches!(&report.callbacks[3], Action::FoodSelected(record) if record.id == "egg"));
    assert_eq!(report.final_view.view, ModalView::Closed);
}

#[test]
fn close_then_reopen_drops_old_response() {
    let dir = tempfile::tempdir().unwrap();
    let report = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":0,"do":"open"},
            {"at_ms":10,"do":"type","text":"banana"},
            {"at_ms":400,"do":"close","reason":"backdrop"},
            {"at_ms":500,"do":"open","recent_foods":[{"id":"oats","name":"Rolled oats","calories":389}]},
            {"do":"deliver"}
        ]}"#,
    )
    .unwrap();

    assert!(report
        .callbacks
        .contains(&Action::Dismissed { reason: CloseReason::Backdrop }));
    assert!(report.final_view.showing_recent);
    let names: Vec<&str> = report.final_view.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Rolled oats"]);
}

#[test]
fn pending_timers_fire_at_end_of_script() {
    let dir = tempfile::tempdir().unwrap();
    let report = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":0,"do":"open"},
            {"at_ms":10,"do":"type","text":"oats"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(report.lookups_dispatched, 1);
    assert_eq!(report.final_view.items.len(), 1);
    assert!(report.transcript.iter().any(|line| line.contains("[")));
}

#[test]
fn later_input_replaces_earlier_wake_up() {
    let dir = tempfile::tempdir().unwrap();
    let report = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":0,"do":"open"},
            {"at_ms":10,"do":"type","text":"ban"},
            {"at_ms":100,"do":"type","text":"banana"},
            {"at_ms":1000,"do":"wait"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(report.wakes_fired, 1);
    assert_eq!(report.lookups_dispatched, 1);
    assert_eq!(report.final_view.search_text, "banana");
}

#[test]
fn time_going_backwards_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = replay(
        &dir,
        r#"{"steps":[
            {"at_ms":100,"do":"open"},
            {"at_ms":50,"do":"close"}
        ]}"#,
    )
    .unwrap_err();

    assert!(matches!(err, FoodLookupError::Script(_)));
}
