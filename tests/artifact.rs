//! Tests for persisting and exporting parsed flows.
mod common;
use common::*;
use msgflow::prelude::*;

#[test]
fn test_save_and_reload_artifact() {
    let flow = parse_fixture("OrderProcessing.msgflow")
        .into_result()
        .expect("fixture parses");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("order.flowbin");
    flow.save(&path).expect("save artifact");

    let reloaded = MessageFlow::from_file(&path).expect("load artifact");
    assert_eq!(reloaded, flow);
}

#[test]
fn test_loading_missing_artifact_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = MessageFlow::from_file(dir.path().join("absent.flowbin"));
    assert!(matches!(result, Err(ArtifactError::Io { .. })));
}

#[test]
fn test_loading_garbage_bytes_fails() {
    let result = MessageFlow::from_bytes(&[0xff, 0xff, 0xff]);
    assert!(matches!(result, Err(ArtifactError::Decode(_))));
}

#[test]
fn test_json_export_shape() {
    let flow = parse_fixture("OrderProcessing.msgflow").flow;
    let json: serde_json::Value =
        serde_json::from_str(&flow.to_json().expect("json export")).expect("valid json");

    assert_eq!(json["connections"].as_array().map(Vec::len), Some(8));
    assert_eq!(json["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        json["description"]["short_description"],
        "Processes incoming orders"
    );
    let compute = &json["buckets"]["Compute"][0];
    assert_eq!(compute["tag"], "Compute");
    assert_eq!(
        compute["properties"]["computeExpression"]["Text"],
        "EnrichOrder"
    );
}
