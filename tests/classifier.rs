//! Tests for node type classification and the monitoring rule.
mod common;
use common::*;
use msgflow::parser::TypeClassifier;
use msgflow::parser::classifier::monitoring_enabled;
use msgflow::prelude::*;

#[test]
fn test_compute_token_classifies_as_compute() {
    let classification = TypeClassifier::new().classify("ComIbmCompute.msgnode:FCMComposite_1");
    assert_eq!(classification.tag, "Compute");
    assert_eq!(classification.category, NodeCategory::Compute);
    assert_eq!(classification.origin, NodeOrigin::Builtin);
}

#[test]
fn test_embedded_token_keeps_prefix_before_colon() {
    let classification = TypeClassifier::new().classify("myLib:SubflowNode");
    assert_eq!(classification.tag, "myLib");
    assert_eq!(classification.category, NodeCategory::Miscellaneous);
    assert_eq!(classification.origin, NodeOrigin::Subflow);
}

#[test]
fn test_every_builtin_tag_reaches_its_bucket() {
    let classifier = TypeClassifier::new();
    for category in NodeCategory::ALL {
        if *category == NodeCategory::Miscellaneous {
            continue;
        }
        let token = format!("ComIbm{}.msgnode:FCMComposite_1", category.as_str());
        assert_eq!(classifier.classify(&token).category, *category, "token {}", token);
    }
}

#[test]
fn test_tag_lookup_is_case_sensitive() {
    let classifier = TypeClassifier::new();
    let classification = classifier.classify("ComIbmWsInput.msgnode:FCMComposite_1");
    assert_eq!(classification.tag, "WsInput");
    assert_eq!(classification.category, NodeCategory::Miscellaneous);
    assert_eq!(
        classifier.classify("ComIbmWSInput.msgnode:FCMComposite_1").category,
        NodeCategory::WsInput
    );
}

#[test]
fn test_alias_routes_tag_into_existing_bucket() {
    let classifier = TypeClassifier::new().with_alias("JavaCompute", NodeCategory::Compute);
    let classification = classifier.classify("ComIbmJavaCompute.msgnode:FCMComposite_1");
    assert_eq!(classification.tag, "JavaCompute");
    assert_eq!(classification.category, NodeCategory::Compute);
}

#[test]
fn test_monitoring_rule() {
    assert!(!monitoring_enabled(0, ""));
    assert!(monitoring_enabled(1, "true"));
    assert!(monitoring_enabled(1, ""));
    assert!(!monitoring_enabled(3, "false"));
}

#[test]
fn test_monitoring_reads_first_event_only() {
    let nodes = node_xml(
        "ComIbmTrace.msgnode:FCMComposite_1",
        "t1",
        "Trace",
        "",
    )
    .replace(
        "</nodes>",
        r#"  <monitorEvents eventEnabled="false"/>
        <monitorEvents eventEnabled="true"/>
      </nodes>"#,
    );
    let flow = parse_ok(&flow_document(&nodes, "", ""));
    assert!(!flow.node("t1").unwrap().config.monitoring_enabled);
}

#[test]
fn test_absent_monitor_events_means_disabled() {
    let nodes = node_xml("ComIbmTrace.msgnode:FCMComposite_1", "t1", "Trace", "");
    let flow = parse_ok(&flow_document(&nodes, "", ""));
    assert!(!flow.node("t1").unwrap().config.monitoring_enabled);
}
