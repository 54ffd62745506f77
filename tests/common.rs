//! Common test utilities for building flow documents and parsing fixtures.
use msgflow::prelude::*;
use std::path::PathBuf;

/// Absolute path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Parses a fixture with the default parser.
#[allow(dead_code)]
pub fn parse_fixture(name: &str) -> ParseReport {
    FlowParser::new().parse_file(fixture_path(name))
}

/// Wraps node, connection and sticky note markup into a complete flow document.
#[allow(dead_code)]
pub fn flow_document(nodes: &str, connections: &str, notes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ecore:EPackage xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI" xmlns:ecore="http://www.eclipse.org/emf/2002/Ecore" xmlns:eflow="http://www.ibm.com/wbi/2005/eflow" xmlns:utility="http://www.ibm.com/wbi/2005/eflow_utility">
  <eClassifiers xmi:type="eflow:FCMComposite" name="FCMComposite_1">
    <composition>
{nodes}
{connections}
    </composition>
    <stickyBoard>
{notes}
    </stickyBoard>
  </eClassifiers>
</ecore:EPackage>
"#
    )
}

/// A single `nodes` element with the given type token, id, display name and extra attributes.
#[allow(dead_code)]
pub fn node_xml(type_token: &str, id: &str, name: &str, attributes: &str) -> String {
    format!(
        r#"      <nodes xmi:type="{type_token}" xmi:id="{id}" location="10,10" {attributes}>
        <translation xmi:type="utility:ConstantString" string="{name}"/>
      </nodes>"#
    )
}

/// A single `connections` element.
#[allow(dead_code)]
pub fn connection_xml(source: &str, source_terminal: &str, target: &str, target_terminal: &str) -> String {
    format!(
        r#"      <connections xmi:type="eflow:FCMConnection" targetNode="{target}" sourceNode="{source}" sourceTerminalName="{source_terminal}" targetTerminalName="{target_terminal}"/>"#
    )
}

/// Parses an in-memory document with the default parser.
#[allow(dead_code)]
pub fn parse(xml: &str) -> ParseReport {
    FlowParser::new().parse_str(xml)
}

/// Parses and asserts that every phase completed.
#[allow(dead_code)]
pub fn parse_ok(xml: &str) -> MessageFlow {
    let report = parse(xml);
    assert!(report.is_success(), "parse failed: {:?}", report.status);
    report.flow
}

/// Sorted copy of a terminal list; terminal order is not meaningful.
#[allow(dead_code)]
pub fn sorted(items: &[String]) -> Vec<String> {
    let mut items = items.to_vec();
    items.sort();
    items
}
