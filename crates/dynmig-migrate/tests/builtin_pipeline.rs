//! End-to-end migration of workspace files with the built-in rule set:
//! parse XML, migrate, check connector integrity, write XML back out.

use std::sync::Arc;

use dynmig_core::{parse_document, write_document, Connector, NodeGuid, PortId, Version};
use dynmig_migrate::builtin::geometry::{ARC_CENTER, ARC_START_MIDDLE_END};
use dynmig_migrate::element::{CANONICAL_TYPE, FUNCTION_ATTRIBUTE};
use dynmig_migrate::{
    builtin_registry, find_dangling_connectors, ConnectorGraph, MigrationConfig,
    MigrationManager,
};

fn builtin_manager(stamp: bool) -> MigrationManager {
    MigrationManager::new(
        Arc::new(builtin_registry().unwrap()),
        MigrationConfig::default().with_stamp_version(stamp),
    )
}

const ARC_WORKSPACE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Workspace Version="0.6.3.20048" X="0" Y="0" zoom="1" Name="Home">
  <Elements>
    <Dynamo.Nodes.Point type="Dynamo.Nodes.Point" guid="center" nickname="Point" x="10" y="10" />
    <Dynamo.Nodes.Double type="Dynamo.Nodes.Double" guid="radius" nickname="Number" x="10" y="60" />
    <Dynamo.Nodes.Double type="Dynamo.Nodes.Double" guid="start" nickname="Number" x="10" y="110" />
    <Dynamo.Nodes.Double type="Dynamo.Nodes.Double" guid="end" nickname="Number" x="10" y="160" />
    <Dynamo.Nodes.ArcCenter type="Dynamo.Nodes.ArcCenter" guid="arc" nickname="Arc by Center" x="200" y="80" />
    <Dynamo.Nodes.ArcStartMiddleEnd type="Dynamo.Nodes.ArcStartMiddleEnd" guid="arc3" nickname="Arc 3pt" x="200" y="200" />
  </Elements>
  <Connectors>
    <Dynamo.Models.ConnectorModel start="center" start_index="0" end="arc" end_index="0" portType="0" />
    <Dynamo.Models.ConnectorModel start="radius" start_index="0" end="arc" end_index="1" portType="0" />
    <Dynamo.Models.ConnectorModel start="start" start_index="0" end="arc" end_index="2" portType="0" />
    <Dynamo.Models.ConnectorModel start="end" start_index="0" end="arc" end_index="3" portType="0" />
    <Dynamo.Models.ConnectorModel start="center" start_index="0" end="arc3" end_index="1" portType="0" />
  </Connectors>
  <Notes />
</Workspace>"#;

#[test]
fn arc_workspace_migrates_and_stays_consistent() {
    let mut doc = parse_document(ARC_WORKSPACE).unwrap();
    let report = builtin_manager(true).migrate_document(&mut doc).unwrap();

    assert_eq!(report.declared, Version::new(0, 6, 3));
    assert!(report.changed());
    assert!(report.stamped);
    assert_eq!(doc.declared_version_text(), Some("0.7.0.0"));

    // Four plain nodes + (arc, identity, zAxis, subtraction) + arc3.
    assert_eq!(doc.nodes().len(), 9);
    let migrated: Vec<&str> = report.nodes.iter().map(|n| n.node_type.as_str()).collect();
    assert_eq!(migrated, vec![ARC_CENTER, ARC_START_MIDDLE_END]);
    assert_eq!(report.nodes[0].produced, 4);
    assert_eq!(report.nodes[1].produced, 1);

    let arc3 = doc.find_node(&NodeGuid::from("arc3")).unwrap();
    assert_eq!(arc3.node_type(), Some(CANONICAL_TYPE));
    assert_eq!(
        arc3.attribute(FUNCTION_ATTRIBUTE),
        Some("Arc.ByPointsOnCurve@Point,Point,Point")
    );

    let graph = ConnectorGraph::from_document(&doc);
    assert!(graph.is_consistent(), "{:?}", graph.issues());
    // The arc now takes a sweep from the subtraction and a normal from zAxis.
    assert_eq!(graph.upstream(&NodeGuid::from("arc")).len(), 5);
}

#[test]
fn arc_center_end_input_feeds_subtraction() {
    let mut doc = parse_document(ARC_WORKSPACE).unwrap();
    builtin_manager(false).migrate_document(&mut doc).unwrap();

    let subtraction = doc
        .nodes()
        .iter()
        .find(|n| n.attribute("nickname") == Some("-"))
        .and_then(|n| n.guid())
        .unwrap();
    let wires: Vec<Connector> = doc
        .connectors()
        .iter()
        .map(|c| Connector::from_element(c).unwrap())
        .collect();

    let into_subtraction: Vec<(&str, usize)> = wires
        .iter()
        .filter(|w| w.end == subtraction)
        .map(|w| (w.start.as_str(), w.end_index))
        .collect();
    assert_eq!(into_subtraction, vec![("end", 0), ("start", 1)]);
    assert!(wires
        .iter()
        .any(|w| w.start_port() == PortId::output(subtraction.clone(), 0)
            && w.end_port() == PortId::input("arc", 3)));
}

#[test]
fn current_workspace_is_untouched() {
    let text = ARC_WORKSPACE.replace("0.6.3.20048", "0.7.0.0");
    let mut doc = parse_document(&text).unwrap();
    let before = doc.clone();
    let report = builtin_manager(true).migrate_document(&mut doc).unwrap();
    assert!(!report.changed());
    assert!(!report.stamped);
    assert_eq!(doc, before);
}

#[test]
fn legacy_workspace_runs_both_workspace_and_node_rules() {
    let legacy = r#"<dynWorkspace Version="0.5.3.0">
  <dynElements>
    <Dynamo.Nodes.dynAddition type="Dynamo.Nodes.dynAddition" guid="add" />
    <Dynamo.Nodes.ArcStartMiddleEnd type="Dynamo.Nodes.ArcStartMiddleEnd" guid="arc3" />
  </dynElements>
  <dynConnectors>
    <Dynamo.Connectors.dynConnector start="add" start_index="0" end="arc3" end_index="0" portType="0" />
  </dynConnectors>
</dynWorkspace>"#;
    let mut doc = parse_document(legacy).unwrap();
    let report = builtin_manager(false).migrate_document(&mut doc).unwrap();

    assert_eq!(report.workspace.fired, vec!["drop legacy dyn prefix"]);
    assert_eq!(doc.root().name(), "Workspace");
    assert_eq!(doc.nodes()[0].node_type(), Some("Dynamo.Nodes.Addition"));
    assert_eq!(doc.nodes()[1].node_type(), Some(CANONICAL_TYPE));
    assert!(find_dangling_connectors(&doc).is_empty());
}

#[test]
fn migrated_document_round_trips_through_xml() {
    let mut doc = parse_document(ARC_WORKSPACE).unwrap();
    builtin_manager(true).migrate_document(&mut doc).unwrap();

    let xml = write_document(&doc).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    let reparsed = parse_document(&xml).unwrap();
    assert_eq!(reparsed, doc);
}
