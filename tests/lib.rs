// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use std::sync::Arc;
use trajectory_loader::*;

mod binary_exit_status_tests;
mod cli_argument_parsing_tests;

#[test]
fn test_document_id_format() {
    let id = DocumentId::composed(1_700_000_000, 3);
    assert_eq!(id.to_string(), "1700000000_3");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000_3\"");
    assert_eq!("1700000000_3".parse::<DocumentId>().unwrap(), id);
}

#[test]
fn test_enum_wire_names() {
    let sources: Vec<String> = Source::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(sources, ["RS1", "RS2", "RS3", "RS4", "RS5", "RS6"]);

    assert_eq!(serde_json::to_string(&ItemType::T).unwrap(), "\"T\"");
    assert_eq!(serde_json::to_string(&ItemType::R).unwrap(), "\"R\"");

    for schema in [RecordSchema::Tagged, RecordSchema::SingleSource, RecordSchema::Untagged] {
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, format!("\"{}\"", schema));
    }
}

#[test]
fn test_schema_policies() {
    assert_eq!(RecordSchema::Tagged.id_policy(), IdPolicy::BackendAssigned);
    assert_eq!(RecordSchema::SingleSource.id_policy(), IdPolicy::Composed);
    assert_eq!(RecordSchema::SingleSource.time_field_format(), TimeFieldFormat::Integer);
    assert_eq!(RecordSchema::Untagged.time_field_format(), TimeFieldFormat::EpochSecondDate);
}

#[test]
fn test_end_to_end_item_document() {
    let config = SimulationConfig {
        start_time: 0,
        end_time: 0,
        items_concurrent: 1,
        item_min_time: 60,
        item_max_time: 60,
        path_resolution: 10,
        seed: Some(1),
        ..Default::default()
    };

    let mut simulator = TrajectorySimulator::new(&config);
    let created: Vec<Arc<TrackedItem>> = simulator.advance(0);
    assert_eq!(created.len(), 1);

    let document = serde_json::to_value(created[0].as_ref()).unwrap();
    assert_eq!(document["startTime"], 0);
    assert_eq!(document["endTime"], 60);

    let coordinates = document["path"]["coordinates"].as_array().unwrap();
    assert_eq!(coordinates.len(), 7);
    let timestamps: Vec<i64> = coordinates.iter().map(|c| c[3].as_i64().unwrap()).collect();
    assert_eq!(timestamps, vec![0, 10, 20, 30, 40, 50, 60]);
    assert!(coordinates.iter().all(|c| c[2].as_f64() == Some(0.0)));
}

#[test]
fn test_backend_error_kinds() {
    assert_eq!(
        BackendErrorKind::from_error_type("index_not_found_exception"),
        BackendErrorKind::IndexNotFound
    );
    let error = BackendError::rejected(
        "create index",
        400,
        r#"{"error":{"type":"resource_already_exists_exception","reason":"exists"},"status":400}"#,
    );
    assert!(error.is_index_already_exists());
}
